//! LUBM entity records
//!
//! See http://swat.cse.lehigh.edu/projects/lubm/profile.htm
//!
//! Each record serializes to a flat JSON-LD node: the own identifier under
//! `@id`, the class under `@type`, literals as strings and references as
//! `{"@id": ...}`. Unset optional references are omitted.

use super::curie::{Iri, Uid};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct University {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:name")]
    pub name: String,
}

impl University {
    pub fn new(index: usize) -> Self {
        Self {
            id: Uid::university(index),
            class: Uid::class("University"),
            name: format!("University{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:name")]
    pub name: String,
    #[serde(rename = "ub:subOrganizationOf")]
    pub sub_organization_of: Iri,
}

impl Department {
    pub fn new(university: &University, index: usize) -> Self {
        let name = format!("Department{index}");
        Self {
            id: university.id.child('.', &name),
            class: Uid::class("Department"),
            name,
            sub_organization_of: university.id.reference(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchGroup {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:subOrganizationOf")]
    pub sub_organization_of: Iri,
}

impl ResearchGroup {
    pub fn new(department: &Department, index: usize) -> Self {
        Self {
            id: department.id.child('/', &format!("ResearchGroup{index}")),
            class: Uid::class("ResearchGroup"),
            sub_organization_of: department.id.reference(),
        }
    }
}

/// Faculty tier, in the order tiers are built for a department
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    FullProfessor,
    AssociateProfessor,
    AssistantProfessor,
    Lecturer,
}

impl Rank {
    pub const ALL: [Rank; 4] = [
        Rank::FullProfessor,
        Rank::AssociateProfessor,
        Rank::AssistantProfessor,
        Rank::Lecturer,
    ];

    /// Local class name, also the prefix of member names
    pub fn class_name(self) -> &'static str {
        match self {
            Rank::FullProfessor => "FullProfessor",
            Rank::AssociateProfessor => "AssociateProfessor",
            Rank::AssistantProfessor => "AssistantProfessor",
            Rank::Lecturer => "Lecturer",
        }
    }

    /// Lecturers never advise students
    pub fn is_professor(self) -> bool {
        !matches!(self, Rank::Lecturer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faculty {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:name")]
    pub name: String,
    #[serde(rename = "ub:headOf", skip_serializing_if = "Option::is_none")]
    pub head_of: Option<Iri>,
    #[serde(rename = "ub:teacherOf")]
    pub teacher_of: Vec<Iri>,
    #[serde(rename = "ub:undergraduateDegreeFrom", skip_serializing_if = "Option::is_none")]
    pub undergraduate_degree_from: Option<Iri>,
    #[serde(rename = "ub:mastersDegreeFrom", skip_serializing_if = "Option::is_none")]
    pub masters_degree_from: Option<Iri>,
    #[serde(rename = "ub:doctoralDegreeFrom", skip_serializing_if = "Option::is_none")]
    pub doctoral_degree_from: Option<Iri>,
    #[serde(rename = "ub:worksFor")]
    pub works_for: Iri,
    #[serde(rename = "ub:emailAddress")]
    pub email_address: String,
    #[serde(rename = "ub:telephone")]
    pub telephone: String,
    #[serde(rename = "ub:researchInterest")]
    pub research_interest: String,
    #[serde(skip)]
    pub rank: Rank,
}

impl Faculty {
    pub fn new(rank: Rank, index: usize, department: &Department, telephone: String) -> Self {
        let name = format!("{}{index}", rank.class_name());
        Self {
            id: department.id.child('/', &name),
            class: Uid::class(rank.class_name()),
            email_address: format!("{}@{name}", department.id),
            name,
            head_of: None,
            teacher_of: Vec::new(),
            undergraduate_degree_from: None,
            masters_degree_from: None,
            doctoral_degree_from: None,
            works_for: department.id.reference(),
            telephone,
            research_interest: "Research0".to_string(),
            rank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentLevel {
    Undergraduate,
    Graduate,
}

impl StudentLevel {
    pub fn class_name(self) -> &'static str {
        match self {
            StudentLevel::Undergraduate => "UndergraduateStudent",
            StudentLevel::Graduate => "GraduateStudent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:name")]
    pub name: String,
    #[serde(rename = "ub:memberOf")]
    pub member_of: Iri,
    #[serde(rename = "ub:emailAddress")]
    pub email_address: String,
    #[serde(rename = "ub:telephone")]
    pub telephone: String,
    #[serde(rename = "ub:takesCourse")]
    pub takes_course: Vec<Iri>,
    #[serde(rename = "ub:undergraduateDegreeFrom", skip_serializing_if = "Option::is_none")]
    pub undergraduate_degree_from: Option<Iri>,
    #[serde(rename = "ub:advisor", skip_serializing_if = "Option::is_none")]
    pub advisor: Option<Iri>,
    #[serde(rename = "ub:teachingAssistantOf", skip_serializing_if = "Option::is_none")]
    pub teaching_assistant_of: Option<Iri>,
    #[serde(skip)]
    pub level: StudentLevel,
}

impl Student {
    pub fn new(level: StudentLevel, index: usize, department: &Department, telephone: String) -> Self {
        let name = format!("{}{index}", level.class_name());
        Self {
            id: department.id.child('/', &name),
            class: Uid::class(level.class_name()),
            email_address: format!("{}@{name}", department.id),
            name,
            member_of: department.id.reference(),
            telephone,
            takes_course: Vec::new(),
            undergraduate_degree_from: None,
            advisor: None,
            teaching_assistant_of: None,
            level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseLevel {
    Course,
    GraduateCourse,
}

impl CourseLevel {
    pub fn class_name(self) -> &'static str {
        match self {
            CourseLevel::Course => "Course",
            CourseLevel::GraduateCourse => "GraduateCourse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:name")]
    pub name: String,
}

impl Course {
    pub fn new(level: CourseLevel, index: usize, department: &Department) -> Self {
        let name = format!("{}{index}", level.class_name());
        Self {
            id: department.id.child('/', &name),
            class: Uid::class(level.class_name()),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    #[serde(rename = "@id")]
    pub id: Uid,
    #[serde(rename = "@type")]
    pub class: Uid,
    #[serde(rename = "ub:name")]
    pub name: String,
    #[serde(rename = "ub:publicationAuthor")]
    pub publication_author: Vec<Iri>,
}

impl Publication {
    /// Publication owned by `author`; the id nests under the author's name
    pub fn new(index: usize, department: &Department, author: &Faculty) -> Self {
        let name = format!("Publication{index}");
        Self {
            id: department
                .id
                .child('/', &author.name)
                .child('/', &name),
            class: Uid::class("Publication"),
            name,
            publication_author: vec![author.id.reference()],
        }
    }
}
