//! LUBM dataset: identifiers, entity records, the seeded generator and the
//! benchmark query texts.

pub mod curie;
pub mod entity;
pub mod generator;
pub mod queries;

pub use curie::{Iri, Uid, INSTANCE_PREFIX, ONTOLOGY_PREFIX};
pub use entity::{
    Course, CourseLevel, Department, Faculty, Publication, Rank, ResearchGroup, Student,
    StudentLevel, University,
};
pub use generator::{DataSet, DepartmentBatch, GenerateError, GenerateResult, Spread};
pub use queries::BenchmarkQuery;
