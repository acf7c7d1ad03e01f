// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::ids::*;

// Dates serialize as YYYY-MM-DD strings so serialized records order
// chronologically under plain string comparison.
pub mod iso_date {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(&format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, &format_description!("[year]-[month]-[day]")).map_err(D::Error::custom)
    }
}

pub mod iso_date_option {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    pub fn serialize<S: Serializer>(
        date: &Option<Date>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::iso_date::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        text.map(|text| {
            Date::parse(&text, &format_description!("[year]-[month]-[day]"))
                .map_err(D::Error::custom)
        })
        .transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    First,
    Second,
    Third,
}

impl Term {
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first" => Some(Self::First),
            "second" => Some(Self::Second),
            "third" => Some(Self::Third),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "term 1",
            Self::Second => "term 2",
            Self::Third => "term 3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassLevel {
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl ClassLevel {
    pub const ALL: [Self; 7] = [
        Self::Sixth,
        Self::Seventh,
        Self::Eighth,
        Self::Ninth,
        Self::Tenth,
        Self::Eleventh,
        Self::Twelfth,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sixth => "sixth",
            Self::Seventh => "seventh",
            Self::Eighth => "eighth",
            Self::Ninth => "ninth",
            Self::Tenth => "tenth",
            Self::Eleventh => "eleventh",
            Self::Twelfth => "twelfth",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sixth" => Some(Self::Sixth),
            "seventh" => Some(Self::Seventh),
            "eighth" => Some(Self::Eighth),
            "ninth" => Some(Self::Ninth),
            "tenth" => Some(Self::Tenth),
            "eleventh" => Some(Self::Eleventh),
            "twelfth" => Some(Self::Twelfth),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sixth => "6th",
            Self::Seventh => "7th",
            Self::Eighth => "8th",
            Self::Ninth => "9th",
            Self::Tenth => "10th",
            Self::Eleventh => "11th",
            Self::Twelfth => "12th",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    Teacher,
    Parent,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "administrator" | "admin" => Some(Self::Administrator),
            "teacher" => Some(Self::Teacher),
            "parent" => Some(Self::Parent),
            _ => None,
        }
    }

    // In display order.
    pub const fn sections(self) -> &'static [Section] {
        match self {
            Self::Administrator => &Section::ALL,
            Self::Teacher => &[
                Section::Dashboard,
                Section::Students,
                Section::Teachers,
                Section::Classes,
                Section::Subjects,
                Section::Grades,
                Section::Bulletins,
            ],
            Self::Parent => &[Section::Dashboard, Section::Grades, Section::Bulletins],
        }
    }

    pub fn allows(self, section: Section) -> bool {
        self.sections().contains(&section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Dashboard,
    Students,
    Teachers,
    Classes,
    Subjects,
    Grades,
    Bulletins,
    Settings,
}

impl Section {
    pub const ALL: [Self; 8] = [
        Self::Dashboard,
        Self::Students,
        Self::Teachers,
        Self::Classes,
        Self::Subjects,
        Self::Grades,
        Self::Bulletins,
        Self::Settings,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Students => "students",
            Self::Teachers => "teachers",
            Self::Classes => "classes",
            Self::Subjects => "subjects",
            Self::Grades => "grades",
            Self::Bulletins => "bulletins",
            Self::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Student,
    Teacher,
    SchoolClass,
    Subject,
    Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Search,
    Form(FormKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "iso_date")]
    pub birth_date: Date,
    pub class_id: SchoolClassId,
    pub class_name: String,
    pub guardian: Guardian,
    #[serde(with = "iso_date")]
    pub enrolled_on: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub archived_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subjects: String,
    #[serde(with = "iso_date")]
    pub hired_on: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub archived_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: SchoolClassId,
    pub name: String,
    pub level: ClassLevel,
    pub homeroom_teacher_id: TeacherId,
    pub homeroom_teacher_name: String,
    pub capacity: i32,
    pub enrolled: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub archived_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    pub coefficient: i32,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub id: GradeEntryId,
    pub student_id: StudentId,
    pub student_name: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub term: Term,
    pub score: f64,
    pub out_of: f64,
    pub coefficient: i32,
    pub comment: String,
    #[serde(with = "iso_date")]
    pub graded_on: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinLine {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub coefficient: i32,
    pub average: f64,
    pub class_average: f64,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bulletin {
    pub id: BulletinId,
    pub student_id: StudentId,
    pub student_name: String,
    pub class_name: String,
    pub term: Term,
    pub school_year: String,
    pub lines: Vec<BulletinLine>,
    pub overall_average: f64,
    pub rank: i32,
    pub class_size: i32,
    pub observation: String,
    #[serde(with = "iso_date_option")]
    pub published_on: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardCounts {
    pub students: usize,
    pub teachers: usize,
    pub classes: usize,
    pub graded_this_term: usize,
}

#[cfg(test)]
mod tests {
    use super::{ClassLevel, Role, Section, Term};

    #[test]
    fn role_sections_respect_role_boundaries() {
        assert_eq!(Role::Administrator.sections().len(), Section::ALL.len());
        assert!(!Role::Teacher.allows(Section::Settings));
        assert!(Role::Parent.allows(Section::Bulletins));
        assert!(!Role::Parent.allows(Section::Students));
    }

    #[test]
    fn enum_string_round_trips() {
        for term in Term::ALL {
            assert_eq!(Term::parse(term.as_str()), Some(term));
        }
        for level in ClassLevel::ALL {
            assert_eq!(ClassLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(Role::parse("admin"), Some(Role::Administrator));
        assert_eq!(Role::parse("principal"), None);
    }

    #[test]
    fn dates_serialize_as_sortable_strings() {
        use super::{Guardian, SchoolClassId, Student, StudentId};
        use time::macros::{date, datetime};

        let student = Student {
            id: StudentId::new(1),
            first_name: "Ana".to_owned(),
            last_name: "Durand".to_owned(),
            birth_date: date!(2012 - 03 - 09),
            class_id: SchoolClassId::new(1),
            class_name: "6A".to_owned(),
            guardian: Guardian {
                name: "Marie Durand".to_owned(),
                email: "marie@example.org".to_owned(),
                phone: String::new(),
            },
            enrolled_on: date!(2024 - 09 - 02),
            created_at: datetime!(2026-01-05 08:00 UTC),
            updated_at: datetime!(2026-01-05 08:00 UTC),
            archived_at: None,
        };

        let value = serde_json::to_value(&student).expect("serialize student");
        assert_eq!(value["birth_date"], serde_json::json!("2012-03-09"));
        assert_eq!(value["enrolled_on"], serde_json::json!("2024-09-02"));
        assert!(
            value["created_at"]
                .as_str()
                .expect("created_at is a string")
                .starts_with("2026-01-05")
        );
    }
}
