// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::Date;

use crate::{ClassLevel, FormKind, SchoolClassId, StudentId, SubjectId, TeacherId, Term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFormInput {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<Date>,
    pub class_id: SchoolClassId,
    pub guardian_name: String,
    pub guardian_email: String,
    pub guardian_phone: String,
    pub enrolled_on: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherFormInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subjects: String,
    pub hired_on: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFormInput {
    pub name: String,
    pub level: ClassLevel,
    pub homeroom_teacher_id: TeacherId,
    pub capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFormInput {
    pub name: String,
    pub code: String,
    pub coefficient: i32,
    pub teacher_id: TeacherId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeFormInput {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub term: Term,
    pub score: f64,
    pub out_of: f64,
    pub coefficient: i32,
    pub comment: String,
    pub graded_on: Option<Date>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPayload {
    Student(StudentFormInput),
    Teacher(TeacherFormInput),
    SchoolClass(ClassFormInput),
    Subject(SubjectFormInput),
    Grade(GradeFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Student(_) => FormKind::Student,
            Self::Teacher(_) => FormKind::Teacher,
            Self::SchoolClass(_) => FormKind::SchoolClass,
            Self::Subject(_) => FormKind::Subject,
            Self::Grade(_) => FormKind::Grade,
        }
    }

    pub fn blank_for(kind: FormKind) -> Self {
        match kind {
            FormKind::Student => Self::Student(StudentFormInput {
                first_name: String::new(),
                last_name: String::new(),
                birth_date: None,
                class_id: SchoolClassId::new(0),
                guardian_name: String::new(),
                guardian_email: String::new(),
                guardian_phone: String::new(),
                enrolled_on: None,
            }),
            FormKind::Teacher => Self::Teacher(TeacherFormInput {
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                phone: String::new(),
                subjects: String::new(),
                hired_on: None,
            }),
            FormKind::SchoolClass => Self::SchoolClass(ClassFormInput {
                name: String::new(),
                level: ClassLevel::Sixth,
                homeroom_teacher_id: TeacherId::new(0),
                capacity: 0,
            }),
            FormKind::Subject => Self::Subject(SubjectFormInput {
                name: String::new(),
                code: String::new(),
                coefficient: 1,
                teacher_id: TeacherId::new(0),
            }),
            FormKind::Grade => Self::Grade(GradeFormInput {
                student_id: StudentId::new(0),
                subject_id: SubjectId::new(0),
                term: Term::First,
                score: 0.0,
                out_of: 20.0,
                coefficient: 1,
                comment: String::new(),
                graded_on: None,
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Student(student) => student.validate(),
            Self::Teacher(teacher) => teacher.validate(),
            Self::SchoolClass(class) => class.validate(),
            Self::Subject(subject) => subject.validate(),
            Self::Grade(grade) => grade.validate(),
        }
    }
}

impl StudentFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            bail!("student first name is required -- enter a first name and retry");
        }
        if self.last_name.trim().is_empty() {
            bail!("student last name is required -- enter a last name and retry");
        }
        if self.class_id.get() <= 0 {
            bail!("student class is required -- choose a class and retry");
        }
        if !self.guardian_email.trim().is_empty() && !email_looks_valid(&self.guardian_email) {
            bail!("guardian e-mail does not look like an address");
        }
        if let (Some(birth_date), Some(enrolled_on)) = (self.birth_date, self.enrolled_on)
            && enrolled_on < birth_date
        {
            bail!("student enrollment date must be on/after birth date");
        }
        Ok(())
    }
}

impl TeacherFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            bail!("teacher first name is required -- enter a first name and retry");
        }
        if self.last_name.trim().is_empty() {
            bail!("teacher last name is required -- enter a last name and retry");
        }
        if !self.email.trim().is_empty() && !email_looks_valid(&self.email) {
            bail!("teacher e-mail does not look like an address");
        }
        Ok(())
    }
}

impl ClassFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("class name is required -- enter a class name and retry");
        }
        if self.homeroom_teacher_id.get() <= 0 {
            bail!("homeroom teacher is required -- choose a teacher and retry");
        }
        if self.capacity <= 0 {
            bail!("class capacity must be positive");
        }
        Ok(())
    }
}

impl SubjectFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("subject name is required -- enter a subject name and retry");
        }
        if self.code.trim().is_empty() {
            bail!("subject code is required -- enter a code and retry");
        }
        if self.coefficient < 1 {
            bail!("subject coefficient must be at least 1");
        }
        if self.teacher_id.get() <= 0 {
            bail!("subject teacher is required -- choose a teacher and retry");
        }
        Ok(())
    }
}

impl GradeFormInput {
    // The grade date is deliberately not checked against "today": the client
    // cannot know server time.
    pub fn validate(&self) -> Result<()> {
        if self.student_id.get() <= 0 {
            bail!("grade student is required -- choose a student and retry");
        }
        if self.subject_id.get() <= 0 {
            bail!("grade subject is required -- choose a subject and retry");
        }
        if self.out_of <= 0.0 {
            bail!("grade scale must be positive");
        }
        if self.score < 0.0 || self.score > self.out_of {
            bail!(
                "grade score must be between 0 and {} inclusive",
                self.out_of
            );
        }
        if self.coefficient < 1 {
            bail!("grade coefficient must be at least 1");
        }
        Ok(())
    }
}

fn email_looks_valid(email: &str) -> bool {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
