//! LUBM benchmark queries
//!
//! See http://swat.cse.lehigh.edu/projects/lubm/queries-sparql.txt
//!
//! The texts cover the stored vocabulary only: there is no class or property
//! hierarchy, so queries that rely on inference (`ub:Professor`,
//! `ub:Student`, ...) are narrowed to the concrete classes the generator
//! emits. Each text declares the store-backed relation `f(s, p, o)` and
//! defines the goal `q`.

/// Default course of Query1
pub const DEFAULT_COURSE: &str = "edu:University0.Department0/GraduateCourse5";

/// Default publication author of Query3 and teacher of Query7
pub const DEFAULT_FACULTY: &str = "edu:University0.Department0/AssistantProfessor0";

/// Default department of Query4 and Query5
pub const DEFAULT_DEPARTMENT: &str = "edu:University0.Department0";

/// Default university of Query8
pub const DEFAULT_UNIVERSITY: &str = "edu:University0";

/// A named query text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkQuery {
    pub name: &'static str,
    pub text: String,
}

impl BenchmarkQuery {
    pub fn new(name: &'static str, text: String) -> Self {
        Self { name, text }
    }
}

/// Graduate students taking a course.
/// Large input, high selectivity.
pub fn query1(course: Option<&str>) -> String {
    let course = course.unwrap_or(DEFAULT_COURSE);
    format!(
        r#"
        f(s, p, o).

        q(x) :-
            f(x, ub:takesCourse, <{course}>),
            f(x, rdf:type, ub:GraduateStudent).
        "#
    )
}

/// Graduate students who are members of a department of the university
/// they took their undergraduate degree from. Triangular pattern.
pub fn query2() -> String {
    r#"
        f(s, p, o).

        q(y, z, x) :-
            f(y, rdf:type, ub:University),

            f(x, ub:undergraduateDegreeFrom, y),
            f(x, rdf:type, ub:GraduateStudent),
            f(x, ub:memberOf, z),

            f(z, rdf:type, ub:Department),
            f(z, ub:subOrganizationOf, y).
        "#
    .to_string()
}

/// Publications of one author
pub fn query3(author: Option<&str>) -> String {
    let author = author.unwrap_or(DEFAULT_FACULTY);
    format!(
        r#"
        f(s, p, o).

        q(x) :-
            f(x, ub:publicationAuthor, <{author}>),
            f(x, rdf:type, ub:Publication).
        "#
    )
}

/// Name, email and telephone of everyone working for a department.
/// Small input, several properties of one class.
pub fn query4(department: Option<&str>) -> String {
    let department = department.unwrap_or(DEFAULT_DEPARTMENT);
    format!(
        r#"
        f(s, p, o).

        q(x, name, email, phone) :-
            f(x, ub:worksFor, <{department}>),
            f(x, ub:name, name),
            f(x, ub:emailAddress, email),
            f(x, ub:telephone, phone).
        "#
    )
}

/// Undergraduate members of a department
pub fn query5(department: Option<&str>) -> String {
    let department = department.unwrap_or(DEFAULT_DEPARTMENT);
    format!(
        r#"
        f(s, p, o).

        q(x) :-
            f(x, ub:memberOf, <{department}>),
            f(x, rdf:type, ub:UndergraduateStudent).
        "#
    )
}

/// Every undergraduate student. Large input, low selectivity.
pub fn query6() -> String {
    r#"
        f(s, p, o).

        q(x) :-
            f(x, rdf:type, ub:UndergraduateStudent).
        "#
    .to_string()
}

/// Undergraduates taking a course taught by one faculty member
pub fn query7(teacher: Option<&str>) -> String {
    let teacher = teacher.unwrap_or(DEFAULT_FACULTY);
    format!(
        r#"
        f(s, p, o).

        q(x, y) :-
            f(<{teacher}>, ub:teacherOf, y),
            f(y, rdf:type, ub:Course),
            f(x, ub:takesCourse, y),
            f(x, rdf:type, ub:UndergraduateStudent).
        "#
    )
}

/// Members of every department of a university, with their email
pub fn query8(university: Option<&str>) -> String {
    let university = university.unwrap_or(DEFAULT_UNIVERSITY);
    format!(
        r#"
        f(s, p, o).

        q(y, x, email) :-
            f(y, ub:subOrganizationOf, <{university}>),
            f(y, rdf:type, ub:Department),
            f(x, ub:memberOf, y),
            f(x, ub:emailAddress, email).
        "#
    )
}

/// Students taking a course taught by their advisor. Triangular pattern.
pub fn query9() -> String {
    r#"
        f(s, p, o).

        q(x) :-
            f(x, ub:advisor, y),
            f(y, ub:teacherOf, z),
            f(x, ub:takesCourse, z).
        "#
    .to_string()
}

/// The nine queries with their default constants, in benchmark order
pub fn all() -> Vec<BenchmarkQuery> {
    vec![
        BenchmarkQuery::new("Query1", query1(None)),
        BenchmarkQuery::new("Query2", query2()),
        BenchmarkQuery::new("Query3", query3(None)),
        BenchmarkQuery::new("Query4", query4(None)),
        BenchmarkQuery::new("Query5", query5(None)),
        BenchmarkQuery::new("Query6", query6()),
        BenchmarkQuery::new("Query7", query7(None)),
        BenchmarkQuery::new("Query8", query8(None)),
        BenchmarkQuery::new("Query9", query9()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryEngine;

    #[test]
    fn test_all_queries_compile() {
        let engine = QueryEngine::new();
        for query in all() {
            let machine = engine
                .prepare(&query.text)
                .unwrap_or_else(|e| panic!("{} failed: {}", query.name, e));
            assert_eq!(machine.relations, vec![("f".to_string(), 3)]);
        }
    }

    #[test]
    fn test_overrides() {
        let text = query1(Some("edu:University1.Department2/GraduateCourse0"));
        assert!(text.contains("<edu:University1.Department2/GraduateCourse0>"));
        assert!(!text.contains(DEFAULT_COURSE));

        assert!(query4(None).contains(DEFAULT_DEPARTMENT));
        assert!(query7(Some("edu:X/Lecturer1")).contains("<edu:X/Lecturer1>"));
        assert!(query8(None).contains("<edu:University0>"));
    }

    #[test]
    fn test_goal_arities() {
        let engine = QueryEngine::new();
        let arities: Vec<usize> = all()
            .iter()
            .map(|q| engine.prepare(&q.text).unwrap().arity)
            .collect();
        assert_eq!(arities, vec![1, 3, 1, 4, 1, 1, 2, 3, 1]);
    }
}
