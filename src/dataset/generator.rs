//! Seeded LUBM dataset generator
//!
//! See http://swat.cse.lehigh.edu/projects/lubm/profile.htm
//!
//! One call to [`DataSet::generate`] emits a university, then each of its
//! departments in turn. A department is built completely in memory (later
//! steps reference earlier ones) and then flushed as seven bags, one per
//! collection, in a fixed order.
//!
//! Every random choice is drawn from the single `StdRng` owned by the
//! generator, so a seed and a unit count fully determine the output.

use super::entity::{
    Course, CourseLevel, Department, Faculty, Publication, Rank, ResearchGroup, Student,
    StudentLevel, University,
};
use super::curie::{Iri, Uid};
use crate::ingest::{BagSink, IngestError};
use crate::rdf::{encode_entity, EncodeError};
use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Generation errors
#[derive(Error, Debug)]
pub enum GenerateError {
    /// University index outside `[0, max_university_id)`
    #[error("University index {index} out of range (max {max})")]
    UniversityOutOfRange { index: usize, max: usize },

    /// Entity could not be encoded into a bag
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// Bag could not be handed to the ingestion pipeline
    #[error("Write failed: {0}")]
    Ingest(#[from] IngestError),
}

pub type GenerateResult<T> = Result<T, GenerateError>;

/// Uniform count in the half-open range `[lo, lo + spread)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spread {
    pub lo: usize,
    pub spread: usize,
}

impl Spread {
    pub const fn new(lo: usize, spread: usize) -> Self {
        Self { lo, spread }
    }

    /// Largest value `draw` can return
    pub const fn hi(self) -> usize {
        self.lo + self.spread - 1
    }

    pub fn draw(self, rng: &mut impl Rng) -> usize {
        self.lo + rng.gen_range(0..self.spread)
    }

    pub fn contains(self, n: usize) -> bool {
        n >= self.lo && n <= self.hi()
    }
}

/// 15~25 Departments per University
pub const DEPARTMENTS: Spread = Spread::new(15, 11);

/// Faculty per Department, indexed like [`Rank::ALL`]:
/// 7~10 Full, 10~14 Associate, 8~11 Assistant, 5~7 Lecturers
pub const FACULTY: [Spread; 4] = [
    Spread::new(7, 4),
    Spread::new(10, 5),
    Spread::new(8, 4),
    Spread::new(5, 3),
];

/// UndergraduateStudent : Faculty = 8~14 : 1
pub const UNDERGRADUATES_PER_FACULTY: Spread = Spread::new(8, 7);

/// GraduateStudent : Faculty = 3~4 : 1
pub const GRADUATES_PER_FACULTY: Spread = Spread::new(3, 2);

/// Every Faculty teaches 1~2 Courses and 1~2 GraduateCourses
pub const COURSES_PER_FACULTY: Spread = Spread::new(1, 2);

/// Every UndergraduateStudent takes 2~4 Courses
pub const UNDERGRADUATE_COURSE_LOAD: Spread = Spread::new(2, 3);

/// Every GraduateStudent takes 1~3 GraduateCourses
pub const GRADUATE_COURSE_LOAD: Spread = Spread::new(1, 3);

/// Publications per faculty member, indexed like [`Rank::ALL`]:
/// 15~20 Full, 10~18 Associate, 5~10 Assistant, 0~5 Lecturer
pub const PUBLICATIONS: [Spread; 4] = [
    Spread::new(15, 6),
    Spread::new(10, 9),
    Spread::new(5, 6),
    Spread::new(0, 6),
];

/// Sampling attempts when a GraduateStudent co-authors existing publications
pub const CO_AUTHORED: Spread = Spread::new(0, 6);

/// 10~30 ResearchGroups per Department
pub const RESEARCH_GROUPS: Spread = Spread::new(10, 21);

/// About 1/5 of students get an advisor (undergraduates) or a TA post
pub const FRACTION_DENOMINATOR: usize = 5;

/// Everything built for one department before it is flushed
#[derive(Debug, Clone, Default)]
pub struct DepartmentBatch {
    pub faculty: Vec<Faculty>,
    /// End index (exclusive) of each faculty tier, in [`Rank::ALL`] order
    pub tier_ends: [usize; 4],
    pub undergraduates: Vec<Student>,
    pub graduates: Vec<Student>,
    pub courses: Vec<Course>,
    pub graduate_courses: Vec<Course>,
    pub publications: Vec<Publication>,
    pub research_groups: Vec<ResearchGroup>,
}

impl DepartmentBatch {
    /// Faculty eligible to advise students: every professor, no lecturers
    pub fn advisors(&self) -> &[Faculty] {
        let end = Rank::ALL
            .iter()
            .zip(self.tier_ends)
            .filter(|(rank, _)| rank.is_professor())
            .map(|(_, end)| end)
            .max()
            .unwrap_or(0);
        &self.faculty[..end]
    }

    /// Members of one tier
    pub fn tier(&self, rank: Rank) -> &[Faculty] {
        let index = Rank::ALL.iter().position(|r| *r == rank).unwrap_or(0);
        let start = if index == 0 { 0 } else { self.tier_ends[index - 1] };
        &self.faculty[start..self.tier_ends[index]]
    }
}

/// Seeded generator writing encoded entities to a [`BagSink`]
pub struct DataSet<W> {
    writer: W,
    rng: StdRng,
    max_university_id: usize,
}

impl<W: BagSink> DataSet<W> {
    /// `max_university_id` bounds both the accepted unit indices and the
    /// universities that degree references may point at.
    pub fn new(seed: u64, max_university_id: usize, writer: W) -> Self {
        Self {
            writer,
            rng: StdRng::seed_from_u64(seed),
            max_university_id: max_university_id.max(1),
        }
    }

    pub fn max_university_id(&self) -> usize {
        self.max_university_id
    }

    /// Give the sink back, e.g. to close the ingestion queue
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Emit university `index` with all of its departments and dependents
    pub fn generate(&mut self, index: usize) -> GenerateResult<()> {
        if index >= self.max_university_id {
            return Err(GenerateError::UniversityOutOfRange {
                index,
                max: self.max_university_id,
            });
        }

        let university = University::new(index);
        self.write(&university)?;

        let departments = DEPARTMENTS.draw(&mut self.rng);
        for id in 0..departments {
            let department = Department::new(&university, id);
            self.write(&department)?;

            let batch = self.build_department(&department);
            self.flush(&batch)?;
        }

        info!("Generated {} with {} departments", university.id, departments);
        Ok(())
    }

    fn write<T: Serialize + ?Sized>(&mut self, entity: &T) -> GenerateResult<()> {
        let bag = encode_entity(entity)?;
        if bag.is_empty() {
            return Ok(());
        }
        self.writer.write(bag)?;
        Ok(())
    }

    fn flush(&mut self, batch: &DepartmentBatch) -> GenerateResult<()> {
        self.write(&batch.faculty)?;
        self.write(&batch.undergraduates)?;
        self.write(&batch.graduates)?;
        self.write(&batch.courses)?;
        self.write(&batch.graduate_courses)?;
        self.write(&batch.publications)?;
        self.write(&batch.research_groups)?;
        Ok(())
    }

    /// Build every dependent of one department, in reference order
    pub fn build_department(&mut self, department: &Department) -> DepartmentBatch {
        let mut batch = DepartmentBatch::default();

        // Faculty tiers: Full, Associate, Assistant, Lecturer
        for (tier, rank) in Rank::ALL.iter().enumerate() {
            let count = FACULTY[tier].draw(&mut self.rng);
            for i in 0..count {
                let telephone = self.telephone();
                batch
                    .faculty
                    .push(Faculty::new(*rank, i, department, telephone));
            }
            batch.tier_ends[tier] = batch.faculty.len();
        }

        // one of the FullProfessors is headOf the Department
        let head = self.rng.gen_range(0..batch.tier_ends[0]);
        batch.faculty[head].head_of = Some(department.id.reference());

        // undergraduate, masters and doctoral degree from some University
        for i in 0..batch.faculty.len() {
            let undergraduate = self.degree_from();
            let masters = self.degree_from();
            let doctoral = self.degree_from();
            let member = &mut batch.faculty[i];
            member.undergraduate_degree_from = Some(undergraduate);
            member.masters_degree_from = Some(masters);
            member.doctoral_degree_from = Some(doctoral);
        }

        for _ in 0..batch.faculty.len() {
            for _ in 0..UNDERGRADUATES_PER_FACULTY.draw(&mut self.rng) {
                let telephone = self.telephone();
                let index = batch.undergraduates.len();
                batch.undergraduates.push(Student::new(
                    StudentLevel::Undergraduate,
                    index,
                    department,
                    telephone,
                ));
            }
        }

        // 1/5 of the UndergraduateStudents have a Professor as their advisor
        for i in self.fraction(batch.undergraduates.len()) {
            let advisor = self.pick(batch.advisors().len());
            batch.undergraduates[i].advisor = Some(batch.faculty[advisor].id.reference());
        }

        // every GraduateStudent has a degree and a Professor as advisor
        for _ in 0..batch.faculty.len() {
            for _ in 0..GRADUATES_PER_FACULTY.draw(&mut self.rng) {
                let telephone = self.telephone();
                let index = batch.graduates.len();
                let mut student =
                    Student::new(StudentLevel::Graduate, index, department, telephone);
                student.undergraduate_degree_from = Some(self.degree_from());
                let advisor = self.pick(batch.advisors().len());
                student.advisor = Some(batch.faculty[advisor].id.reference());
                batch.graduates.push(student);
            }
        }

        batch.courses = self.teach(&mut batch.faculty, CourseLevel::Course, department);

        for i in 0..batch.undergraduates.len() {
            let courses = self.take_courses(UNDERGRADUATE_COURSE_LOAD, &batch.courses);
            batch.undergraduates[i].takes_course = courses;
        }

        batch.graduate_courses =
            self.teach(&mut batch.faculty, CourseLevel::GraduateCourse, department);

        for i in 0..batch.graduates.len() {
            let courses = self.take_courses(GRADUATE_COURSE_LOAD, &batch.graduate_courses);
            batch.graduates[i].takes_course = courses;
        }

        // 1/5~1/4 of the GraduateStudents are TeachingAssistant for one Course
        if !batch.courses.is_empty() {
            for i in self.fraction(batch.graduates.len()) {
                let course = self.pick(batch.courses.len());
                batch.graduates[i].teaching_assistant_of = Some(batch.courses[course].id.reference());
            }
        }

        for (tier, spread) in PUBLICATIONS.iter().enumerate() {
            let start = if tier == 0 { 0 } else { batch.tier_ends[tier - 1] };
            for author in start..batch.tier_ends[tier] {
                for _ in 0..spread.draw(&mut self.rng) {
                    let index = batch.publications.len();
                    let publication = Publication::new(index, department, &batch.faculty[author]);
                    batch.publications.push(publication);
                }
            }
        }

        // GraduateStudents co-author a few Publications with some Professors
        for i in 0..batch.graduates.len() {
            let author = batch.graduates[i].id.reference();
            for publication in self.co_authored(batch.publications.len()) {
                batch.publications[publication]
                    .publication_author
                    .push(author.clone());
            }
        }

        for i in 0..RESEARCH_GROUPS.draw(&mut self.rng) {
            batch.research_groups.push(ResearchGroup::new(department, i));
        }

        debug!(
            "Built {}: {} faculty, {} undergraduates, {} graduates, {} courses, {} graduate courses, {} publications",
            department.id,
            batch.faculty.len(),
            batch.undergraduates.len(),
            batch.graduates.len(),
            batch.courses.len(),
            batch.graduate_courses.len(),
            batch.publications.len()
        );

        batch
    }

    /// Every faculty member teaches 1~2 courses of the given level
    fn teach(&mut self, faculty: &mut [Faculty], level: CourseLevel, department: &Department) -> Vec<Course> {
        let mut courses = Vec::new();
        for member in faculty.iter_mut() {
            for _ in 0..COURSES_PER_FACULTY.draw(&mut self.rng) {
                let course = Course::new(level, courses.len(), department);
                member.teacher_of.push(course.id.reference());
                courses.push(course);
            }
        }
        courses
    }

    fn degree_from(&mut self) -> Iri {
        Uid::university(self.rng.gen_range(0..self.max_university_id)).reference()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// `load` distinct courses drawn uniformly from `courses`
    fn take_courses(&mut self, load: Spread, courses: &[Course]) -> Vec<Iri> {
        if courses.is_empty() {
            return Vec::new();
        }
        let amount = load.draw(&mut self.rng).min(courses.len());
        rand::seq::index::sample(&mut self.rng, courses.len(), amount)
            .into_iter()
            .map(|i| courses[i].id.reference())
            .collect()
    }

    /// About `len / 5` indices, drawn with replacement and deduplicated
    fn fraction(&mut self, len: usize) -> Vec<usize> {
        let mut picked = IndexSet::new();
        for _ in 0..len / FRACTION_DENOMINATOR {
            picked.insert(self.rng.gen_range(0..len));
        }
        picked.into_iter().collect()
    }

    /// Up to 5 distinct publication indices
    fn co_authored(&mut self, len: usize) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }
        let mut picked = IndexSet::new();
        for _ in 0..CO_AUTHORED.draw(&mut self.rng) {
            picked.insert(self.rng.gen_range(0..len));
        }
        picked.into_iter().collect()
    }

    fn telephone(&mut self) -> String {
        format!(
            "{:03}-{:03}-{:03}",
            self.rng.gen_range(0..1000),
            self.rng.gen_range(0..1000),
            self.rng.gen_range(0..1000)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Bag;
    use std::collections::HashSet;

    fn department() -> Department {
        Department::new(&University::new(0), 0)
    }

    fn build(seed: u64) -> DepartmentBatch {
        let mut dataset = DataSet::new(seed, 4, Vec::<Bag>::new());
        dataset.build_department(&department())
    }

    #[test]
    fn test_spread_bounds() {
        assert_eq!(DEPARTMENTS.hi(), 25);
        assert_eq!(FACULTY[0].hi(), 10);
        assert_eq!(FACULTY[1].hi(), 14);
        assert_eq!(FACULTY[2].hi(), 11);
        assert_eq!(FACULTY[3].hi(), 7);
        assert_eq!(RESEARCH_GROUPS.hi(), 30);
        assert_eq!(PUBLICATIONS[3].hi(), 5);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(UNDERGRADUATES_PER_FACULTY.contains(UNDERGRADUATES_PER_FACULTY.draw(&mut rng)));
        }
    }

    #[test]
    fn test_faculty_tiers_in_range() {
        for seed in 0..20 {
            let batch = build(seed);
            for (tier, rank) in Rank::ALL.iter().enumerate() {
                let members = batch.tier(*rank);
                assert!(FACULTY[tier].contains(members.len()), "{rank:?}: {}", members.len());
                assert!(members.iter().all(|f| f.rank == *rank));
            }
        }
    }

    #[test]
    fn test_exactly_one_head_among_full_professors() {
        for seed in 0..20 {
            let batch = build(seed);
            let heads: Vec<_> = batch.faculty.iter().filter(|f| f.head_of.is_some()).collect();
            assert_eq!(heads.len(), 1);
            assert_eq!(heads[0].rank, Rank::FullProfessor);
            assert_eq!(heads[0].head_of, Some(department().id.reference()));
        }
    }

    #[test]
    fn test_faculty_degrees_point_at_addressed_universities() {
        let batch = build(3);
        let valid: HashSet<Iri> = (0..4).map(|i| Uid::university(i).reference()).collect();
        for member in &batch.faculty {
            for degree in [
                &member.undergraduate_degree_from,
                &member.masters_degree_from,
                &member.doctoral_degree_from,
            ] {
                assert!(valid.contains(degree.as_ref().unwrap()));
            }
        }
    }

    #[test]
    fn test_student_ratios() {
        let batch = build(11);
        let faculty = batch.faculty.len();
        assert!(batch.undergraduates.len() >= faculty * UNDERGRADUATES_PER_FACULTY.lo);
        assert!(batch.undergraduates.len() <= faculty * UNDERGRADUATES_PER_FACULTY.hi());
        assert!(batch.graduates.len() >= faculty * GRADUATES_PER_FACULTY.lo);
        assert!(batch.graduates.len() <= faculty * GRADUATES_PER_FACULTY.hi());
    }

    #[test]
    fn test_advisor_pool_is_every_professor() {
        for seed in 0..10 {
            let batch = build(seed);
            let pool = batch.advisors();
            assert!(pool.iter().all(|f| f.rank.is_professor()));
            assert_eq!(
                pool.len(),
                batch.faculty.iter().filter(|f| f.rank.is_professor()).count()
            );
            assert_eq!(pool.len() + batch.tier(Rank::Lecturer).len(), batch.faculty.len());
        }
    }

    #[test]
    fn test_advisors_are_professors() {
        let batch = build(5);
        let professors: HashSet<Iri> = batch.advisors().iter().map(|f| f.id.reference()).collect();

        let advised = batch.undergraduates.iter().filter(|s| s.advisor.is_some()).count();
        assert!(advised <= batch.undergraduates.len() / FRACTION_DENOMINATOR);
        assert!(advised > 0);

        for student in batch.undergraduates.iter().chain(&batch.graduates) {
            if let Some(advisor) = &student.advisor {
                assert!(professors.contains(advisor));
            }
        }
        assert!(batch.graduates.iter().all(|s| s.advisor.is_some()));
        assert!(batch.graduates.iter().all(|s| s.undergraduate_degree_from.is_some()));
    }

    #[test]
    fn test_course_loads_are_distinct_and_bounded() {
        let batch = build(9);
        let courses: HashSet<Iri> = batch.courses.iter().map(|c| c.id.reference()).collect();
        let graduate_courses: HashSet<Iri> =
            batch.graduate_courses.iter().map(|c| c.id.reference()).collect();

        for student in &batch.undergraduates {
            let taken: HashSet<_> = student.takes_course.iter().collect();
            assert_eq!(taken.len(), student.takes_course.len());
            assert!(UNDERGRADUATE_COURSE_LOAD.contains(taken.len()));
            assert!(taken.iter().all(|c| courses.contains(*c)));
        }
        for student in &batch.graduates {
            let taken: HashSet<_> = student.takes_course.iter().collect();
            assert_eq!(taken.len(), student.takes_course.len());
            assert!(GRADUATE_COURSE_LOAD.contains(taken.len()));
            assert!(taken.iter().all(|c| graduate_courses.contains(*c)));
        }
    }

    #[test]
    fn test_every_faculty_teaches_both_levels() {
        let batch = build(2);
        for member in &batch.faculty {
            let regular = member
                .teacher_of
                .iter()
                .filter(|c| !c.as_str().contains("/GraduateCourse"))
                .count();
            let graduate = member.teacher_of.len() - regular;
            assert!(COURSES_PER_FACULTY.contains(regular));
            assert!(COURSES_PER_FACULTY.contains(graduate));
        }
        let taught: usize = batch.faculty.iter().map(|f| f.teacher_of.len()).sum();
        assert_eq!(taught, batch.courses.len() + batch.graduate_courses.len());
    }

    #[test]
    fn test_teaching_assistants_reference_regular_courses() {
        let batch = build(4);
        let courses: HashSet<Iri> = batch.courses.iter().map(|c| c.id.reference()).collect();
        let assistants: Vec<_> = batch
            .graduates
            .iter()
            .filter_map(|s| s.teaching_assistant_of.as_ref())
            .collect();
        assert!(assistants.len() <= batch.graduates.len() / FRACTION_DENOMINATOR);
        assert!(assistants.iter().all(|c| courses.contains(*c)));
    }

    #[test]
    fn test_publications_per_tier_and_co_authors() {
        let batch = build(6);
        let graduates: HashSet<Iri> = batch.graduates.iter().map(|s| s.id.reference()).collect();

        for (tier, rank) in Rank::ALL.iter().enumerate() {
            for member in batch.tier(*rank) {
                let owned = batch
                    .publications
                    .iter()
                    .filter(|p| p.publication_author[0] == member.id.reference())
                    .count();
                assert!(PUBLICATIONS[tier].contains(owned));
            }
        }

        for publication in &batch.publications {
            let authors: HashSet<_> = publication.publication_author.iter().collect();
            assert_eq!(authors.len(), publication.publication_author.len());
            assert!(publication.publication_author[1..]
                .iter()
                .all(|a| graduates.contains(a)));
        }
    }

    #[test]
    fn test_research_groups_in_range() {
        let batch = build(8);
        assert!(RESEARCH_GROUPS.contains(batch.research_groups.len()));
    }

    #[test]
    fn test_generate_rejects_out_of_range_index() {
        let mut dataset = DataSet::new(1, 2, Vec::<Bag>::new());
        assert!(matches!(
            dataset.generate(2),
            Err(GenerateError::UniversityOutOfRange { index: 2, max: 2 })
        ));
        assert!(dataset.into_writer().is_empty());
    }

    #[test]
    fn test_generate_flush_order() {
        let mut dataset = DataSet::new(42, 1, Vec::<Bag>::new());
        dataset.generate(0).unwrap();
        let bags = dataset.into_writer();

        // university, then department followed by its seven collections
        assert_eq!(bags[0][0].subject.as_str(), "edu:University0");
        assert_eq!(bags[1][0].subject.as_str(), "edu:University0.Department0");
        assert!(bags[2][0].subject.as_str().contains("/FullProfessor0"));
        assert!(bags[3][0].subject.as_str().contains("/UndergraduateStudent0"));
        assert!(bags[4][0].subject.as_str().contains("/GraduateStudent0"));
        assert!(bags[5][0].subject.as_str().contains("/Course0"));
        assert!(bags[6][0].subject.as_str().contains("/GraduateCourse0"));
        assert!(bags[7][0].subject.as_str().contains("/Publication"));
        assert!(bags[8][0].subject.as_str().contains("/ResearchGroup0"));
        assert_eq!(bags[9][0].subject.as_str(), "edu:University0.Department1");
    }

    #[test]
    fn test_same_seed_same_output() {
        let run = |seed| {
            let mut dataset = DataSet::new(seed, 2, Vec::<Bag>::new());
            dataset.generate(1).unwrap();
            dataset.into_writer()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }
}
