use lubm::dataset::queries::{self, BenchmarkQuery};
use lubm::rdf::{encode, NamedNode, RdfStore, Term, TriplePattern, TripleStore, RDF_TYPE};
use lubm::{load_dataset, run_queries, BenchmarkConfig, QueryEngine};
use serde_json::json;
use std::collections::HashSet;
use std::sync::OnceLock;

fn dataset() -> &'static RdfStore {
    static STORE: OnceLock<RdfStore> = OnceLock::new();
    STORE.get_or_init(|| load_dataset(&BenchmarkConfig::default()).unwrap().store)
}

fn iri(s: &str) -> NamedNode {
    NamedNode::new(s).unwrap()
}

fn count(store: &RdfStore, subject: Option<&str>, predicate: &str, object: Option<Term>) -> usize {
    let pattern = TriplePattern::new(subject.map(iri), Some(iri(predicate)), object);
    store.match_pattern(&pattern).count()
}

#[test]
fn test_all_queries_run() {
    let reports = run_queries(&QueryEngine::new(), dataset(), &queries::all());
    assert_eq!(reports.len(), 9);
    for report in &reports {
        assert!(report.is_ok(), "{}: {:?}", report.name, report.error);
    }

    // Query5 (one department) is a subset of Query6 (all undergraduates)
    let rows: Vec<usize> = reports.iter().map(|r| r.rows.unwrap()).collect();
    assert!(rows[4] > 0);
    assert!(rows[4] <= rows[5]);
}

#[test]
fn test_query6_counts_every_undergraduate() {
    let store = dataset();
    let expected = count(
        store,
        None,
        RDF_TYPE,
        Some(iri("ub:UndergraduateStudent").into()),
    );
    let rows = QueryEngine::new().count(&queries::query6(), store).unwrap();
    assert_eq!(rows, expected);
}

#[test]
fn test_query4_one_row_per_member() {
    let store = dataset();
    let department = iri(queries::DEFAULT_DEPARTMENT);
    let members = count(store, None, "ub:worksFor", Some(department.into()));

    let rows = QueryEngine::new().execute(&queries::query4(None), store).unwrap();
    assert_eq!(rows.len(), members);
    for row in &rows {
        assert_eq!(row.len(), 4);
        assert!(row[0].is_named_node());
        assert!(row[1..].iter().all(Term::is_literal));
    }
}

#[test]
fn test_query8_covers_the_university() {
    let store = dataset();
    let rows = QueryEngine::new().execute(&queries::query8(None), store).unwrap();
    let departments: HashSet<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    let expected = count(
        store,
        None,
        "ub:subOrganizationOf",
        Some(iri(queries::DEFAULT_UNIVERSITY).into()),
    );
    // research groups are sub-organizations of departments, not of the university
    assert_eq!(departments.len(), expected);
}

#[test]
fn test_query9_rows_satisfy_the_triangle() {
    let store = dataset();
    let text = "f(s, p, o).
        q(x, y, z) :-
            f(x, ub:advisor, y),
            f(y, ub:teacherOf, z),
            f(x, ub:takesCourse, z).";
    let rows = QueryEngine::new().execute(text, store).unwrap();
    let plain = QueryEngine::new().count(&queries::query9(), store).unwrap();
    assert_eq!(rows.len(), plain);

    for row in rows.iter().take(50) {
        let (x, y, z) = (row[0].as_str(), row[1].as_str(), row[2].clone());
        assert_eq!(count(store, Some(x), "ub:advisor", Some(row[1].clone())), 1);
        assert_eq!(count(store, Some(y), "ub:teacherOf", Some(z.clone())), 1);
        assert_eq!(count(store, Some(x), "ub:takesCourse", Some(z)), 1);
    }
}

#[test]
fn test_students_by_course_without_courses_is_empty() {
    // A department whose faculty teach nothing
    let mut store = RdfStore::new();
    let bag = encode(&json!([
        {
            "@id": "edu:University0.Department0",
            "@type": "ub:Department",
            "ub:name": "Department0",
            "ub:subOrganizationOf": { "@id": "edu:University0" }
        },
        {
            "@id": "edu:University0.Department0/AssistantProfessor0",
            "@type": "ub:AssistantProfessor",
            "ub:worksFor": { "@id": "edu:University0.Department0" },
            "ub:teacherOf": []
        },
        {
            "@id": "edu:University0.Department0/UndergraduateStudent0",
            "@type": "ub:UndergraduateStudent",
            "ub:memberOf": { "@id": "edu:University0.Department0" },
            "ub:takesCourse": []
        }
    ]))
    .unwrap();
    store.add(bag).unwrap();

    let engine = QueryEngine::new();
    assert!(engine.execute(&queries::query1(None), &store).unwrap().is_empty());
    assert!(engine.execute(&queries::query7(None), &store).unwrap().is_empty());
}

#[test]
fn test_unknown_course_is_empty() {
    let text = queries::query1(Some("edu:University0.Department0/GraduateCourse9999"));
    assert_eq!(QueryEngine::new().count(&text, dataset()).unwrap(), 0);
}

#[test]
fn test_parse_failure_is_isolated() {
    let mut batch = vec![BenchmarkQuery::new("broken", "q(x) :- f(x, ub:advisor".to_string())];
    batch.extend(queries::all());

    let reports = run_queries(&QueryEngine::new(), dataset(), &batch);
    assert_eq!(reports.len(), 10);

    assert!(!reports[0].is_ok());
    assert!(reports[0].error.as_deref().unwrap().contains("Parse error"));
    assert!(reports[1..].iter().all(|r| r.is_ok()));
}

#[test]
fn test_compile_failure_is_isolated() {
    let batch = vec![
        BenchmarkQuery::new("no goal", "f(s, p, o). r(x) :- f(x, p, o).".to_string()),
        BenchmarkQuery::new("Query6", queries::query6()),
    ];
    let reports = run_queries(&QueryEngine::new(), dataset(), &batch);
    assert!(reports[0].error.as_deref().unwrap().contains("Goal not found"));
    assert!(reports[1].rows.unwrap() > 0);
}
