// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use cartable_app::{
    Bulletin, BulletinId, BulletinLine, ClassLevel, DashboardCounts, FormPayload, GradeEntry,
    GradeEntryId, Guardian, Role, SchoolClass, SchoolClassId, Section, Session, Student, StudentId,
    Subject, SubjectId, Teacher, TeacherId, Term,
};
use cartable_views::{
    DashboardClassStanding, DashboardRecentGrade, DashboardSnapshot, DashboardStudentContact,
    DataSource, SectionSnapshot, weighted_average,
};
use time::{Date, Duration, Month, OffsetDateTime, Time};

const FIRST_NAMES: [&str; 16] = [
    "Ana", "Bintou", "Camille", "Diego", "Elena", "Farid", "Gabriel", "Hana", "Ines", "Jules",
    "Khadija", "Lea", "Mateo", "Noor", "Oscar", "Priya",
];
const LAST_NAMES: [&str; 16] = [
    "Durand", "Moreau", "Lefevre", "Okafor", "Petit", "Roux", "Silva", "Traore", "Vidal",
    "Weber", "Nguyen", "Haddad", "Kone", "Lambert", "Marchand", "Diallo",
];

const SUBJECT_POOL: [(&str, &str, i32); 10] = [
    ("Mathematics", "MATH", 4),
    ("French", "FR", 4),
    ("History-Geography", "HIST", 3),
    ("English", "EN", 3),
    ("Physics-Chemistry", "PHCH", 3),
    ("Biology", "BIO", 2),
    ("Technology", "TECH", 2),
    ("Music", "MUS", 1),
    ("Art", "ART", 1),
    ("Physical Education", "PE", 2),
];

const GRADE_COMMENTS: [&str; 8] = [
    "good effort",
    "needs revision",
    "excellent work",
    "careless mistakes",
    "strong progress",
    "incomplete answers",
    "very thorough",
    "",
];

const BULLETIN_REMARKS: [&str; 6] = [
    "solid term",
    "can do better",
    "very good results",
    "participation improving",
    "irregular work",
    "keep it up",
];

const OBSERVATIONS: [&str; 5] = [
    "A serious and steady term.",
    "Results are uneven across subjects.",
    "Excellent attitude in class.",
    "More regular homework is needed.",
    "Real progress since last term.",
];

const EMAIL_DOMAINS: [&str; 4] = [
    "example-mail.org",
    "familynet.example",
    "courrier.example",
    "boites.example",
];

const REFERENCE_YEAR: i32 = 2026;
const SCHOOL_YEAR: &str = "2025-2026";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

// Same seed, same data.
#[derive(Debug, Clone)]
pub struct SchoolFaker {
    rng: DeterministicRng,
}

impl SchoolFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn first_name(&mut self) -> &'static str {
        self.pick(&FIRST_NAMES)
    }

    pub fn last_name(&mut self) -> &'static str {
        self.pick(&LAST_NAMES)
    }

    pub fn phone(&mut self) -> String {
        format!(
            "+33 6 {:02} {:02} {:02} {:02}",
            self.int_range(10, 99),
            self.int_range(10, 99),
            self.int_range(10, 99),
            self.int_range(10, 99),
        )
    }

    pub fn email(&mut self, first: &str, last: &str) -> String {
        let domain = self.pick(&EMAIL_DOMAINS);
        format!(
            "{}.{}@{domain}",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        )
    }

    // Roughly one in six guardians has no e-mail on file, which feeds the
    // dashboard contact list.
    pub fn guardian(&mut self, family_name: &str) -> Guardian {
        let first = self.first_name();
        let email = if self.int_range(1, 6) == 1 {
            String::new()
        } else {
            self.email(first, family_name)
        };
        Guardian {
            name: format!("{first} {family_name}"),
            email,
            phone: self.phone(),
        }
    }

    // 0..=20 in half-point steps.
    pub fn score(&mut self) -> f64 {
        (self.rng.int_n(41) as f64) / 2.0
    }

    pub fn grade_comment(&mut self) -> String {
        self.pick(&GRADE_COMMENTS).to_owned()
    }

    pub fn bulletin_remark(&mut self) -> String {
        self.pick(&BULLETIN_REMARKS).to_owned()
    }

    pub fn observation(&mut self) -> String {
        self.pick(&OBSERVATIONS).to_owned()
    }

    pub fn date_between(&mut self, start: Date, end: Date) -> Date {
        let span = (end - start).whole_days();
        if span <= 0 {
            return start;
        }
        start + Duration::days((self.rng.next_u64() % (span as u64 + 1)) as i64)
    }

    pub fn timestamp_between(&mut self, start: OffsetDateTime, end: OffsetDateTime) -> OffsetDateTime {
        let start_ts = start.unix_timestamp();
        let end_ts = end.unix_timestamp();
        if end_ts <= start_ts {
            return start;
        }
        let span = (end_ts - start_ts) as u64;
        let offset = self.rng.next_u64() % (span + 1);
        OffsetDateTime::from_unix_timestamp(start_ts + offset as i64).expect("valid unix timestamp")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

// Fully linked: students belong to generated classes, grades reference
// generated students and subjects, bulletins aggregate the grades.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolDataset {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<SchoolClass>,
    pub subjects: Vec<Subject>,
    pub grades: Vec<GradeEntry>,
    pub bulletins: Vec<Bulletin>,
    pub current_term: Term,
}

const STUDENTS_PER_CLASS: usize = 6;
const CLASS_LEVELS: [ClassLevel; 4] = [
    ClassLevel::Sixth,
    ClassLevel::Seventh,
    ClassLevel::Eighth,
    ClassLevel::Ninth,
];

impl SchoolDataset {
    pub fn seed(seed: u64) -> Self {
        let mut faker = SchoolFaker::new(seed);
        let year_start = calendar_date(REFERENCE_YEAR - 1, Month::September, 1);
        let now = reference_now();
        let created_window_start = now - Duration::days(365);

        let mut teachers = Vec::new();
        for index in 0..6_i64 {
            let first = faker.first_name().to_owned();
            let last = faker.last_name().to_owned();
            let email = faker.email(&first, &last);
            let created_at = faker.timestamp_between(created_window_start, now);
            teachers.push(Teacher {
                id: TeacherId::new(index + 1),
                email,
                phone: faker.phone(),
                subjects: String::new(),
                hired_on: faker.date_between(
                    calendar_date(REFERENCE_YEAR - 12, Month::September, 1),
                    year_start,
                ),
                first_name: first,
                last_name: last,
                created_at,
                updated_at: created_at,
                archived_at: None,
            });
        }

        let mut subjects = Vec::new();
        for (index, (name, code, coefficient)) in SUBJECT_POOL.iter().take(8).enumerate() {
            let teacher = &teachers[index % teachers.len()];
            let created_at = faker.timestamp_between(created_window_start, now);
            subjects.push(Subject {
                id: SubjectId::new(index as i64 + 1),
                name: (*name).to_owned(),
                code: (*code).to_owned(),
                coefficient: *coefficient,
                teacher_id: teacher.id,
                teacher_name: format!("{} {}", teacher.first_name, teacher.last_name),
                created_at,
                updated_at: created_at,
            });
        }
        for teacher in &mut teachers {
            teacher.subjects = subjects
                .iter()
                .filter(|subject| subject.teacher_id == teacher.id)
                .map(|subject| subject.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
        }

        let mut classes = Vec::new();
        for (index, level) in CLASS_LEVELS.iter().enumerate() {
            let teacher = &teachers[index % teachers.len()];
            let created_at = faker.timestamp_between(created_window_start, now);
            classes.push(SchoolClass {
                id: SchoolClassId::new(index as i64 + 1),
                name: format!("{}A", level.label()),
                level: *level,
                homeroom_teacher_id: teacher.id,
                homeroom_teacher_name: format!("{} {}", teacher.first_name, teacher.last_name),
                capacity: 28,
                enrolled: 0,
                created_at,
                updated_at: created_at,
                archived_at: None,
            });
        }

        let mut students = Vec::new();
        for class in &mut classes {
            for _ in 0..STUDENTS_PER_CLASS {
                let id = students.len() as i64 + 1;
                let first = faker.first_name().to_owned();
                let last = faker.last_name().to_owned();
                let guardian = faker.guardian(&last);
                let created_at = faker.timestamp_between(created_window_start, now);
                let birth_year = REFERENCE_YEAR - 11 - CLASS_LEVELS.iter().position(|l| *l == class.level).unwrap_or(0) as i32;
                // An occasional student is archived (moved away), exercising
                // the archived filter.
                let archived_at = if id % 13 == 0 {
                    Some(faker.timestamp_between(created_at, now))
                } else {
                    None
                };
                students.push(Student {
                    id: StudentId::new(id),
                    first_name: first,
                    last_name: last,
                    birth_date: faker.date_between(
                        calendar_date(birth_year, Month::January, 1),
                        calendar_date(birth_year, Month::December, 31),
                    ),
                    class_id: class.id,
                    class_name: class.name.clone(),
                    guardian,
                    enrolled_on: faker.date_between(
                        year_start,
                        calendar_date(REFERENCE_YEAR - 1, Month::September, 15),
                    ),
                    created_at,
                    updated_at: created_at,
                    archived_at,
                });
                if archived_at.is_none() {
                    class.enrolled += 1;
                }
            }
        }

        let current_term = Term::Second;
        let mut grades = Vec::new();
        for student in &students {
            if student.archived_at.is_some() {
                continue;
            }
            for subject in &subjects {
                for term in [Term::First, Term::Second] {
                    let (window_start, window_end) = term_window(term);
                    let graded_on = faker.date_between(window_start, window_end);
                    let created_at = faker.timestamp_between(created_window_start, now);
                    grades.push(GradeEntry {
                        id: GradeEntryId::new(grades.len() as i64 + 1),
                        student_id: student.id,
                        student_name: format!("{} {}", student.first_name, student.last_name),
                        subject_id: subject.id,
                        subject_name: subject.name.clone(),
                        term,
                        score: faker.score(),
                        out_of: 20.0,
                        coefficient: subject.coefficient,
                        comment: faker.grade_comment(),
                        graded_on,
                        created_at,
                        updated_at: created_at,
                    });
                }
            }
        }

        let bulletins = build_bulletins(&mut faker, &students, &classes, &subjects, &grades);

        Self {
            students,
            teachers,
            classes,
            subjects,
            grades,
            bulletins,
            current_term,
        }
    }
}

// First-term report cards, one per active student, with ranks computed
// within each class.
fn build_bulletins(
    faker: &mut SchoolFaker,
    students: &[Student],
    classes: &[SchoolClass],
    subjects: &[Subject],
    grades: &[GradeEntry],
) -> Vec<Bulletin> {
    let term = Term::First;
    let mut bulletins = Vec::new();

    for class in classes {
        let mut class_entries: Vec<(StudentId, String, Vec<BulletinLine>, f64)> = Vec::new();

        for student in students
            .iter()
            .filter(|student| student.class_id == class.id && student.archived_at.is_none())
        {
            let mut lines = Vec::new();
            for subject in subjects {
                let scores: Vec<f64> = grades
                    .iter()
                    .filter(|grade| {
                        grade.student_id == student.id
                            && grade.subject_id == subject.id
                            && grade.term == term
                    })
                    .map(|grade| grade.score / grade.out_of * 20.0)
                    .collect();
                if scores.is_empty() {
                    continue;
                }
                let average = round2(scores.iter().sum::<f64>() / scores.len() as f64);
                let class_scores: Vec<f64> = grades
                    .iter()
                    .filter(|grade| {
                        grade.subject_id == subject.id
                            && grade.term == term
                            && students.iter().any(|peer| {
                                peer.id == grade.student_id && peer.class_id == class.id
                            })
                    })
                    .map(|grade| grade.score / grade.out_of * 20.0)
                    .collect();
                let class_average =
                    round2(class_scores.iter().sum::<f64>() / class_scores.len() as f64);
                lines.push(BulletinLine {
                    subject_id: subject.id,
                    subject_name: subject.name.clone(),
                    coefficient: subject.coefficient,
                    average,
                    class_average,
                    remark: faker.bulletin_remark(),
                });
            }

            let overall = weighted_average(
                lines
                    .iter()
                    .map(|line| (line.average, f64::from(line.coefficient))),
            )
            .unwrap_or(0.0);
            class_entries.push((
                student.id,
                format!("{} {}", student.first_name, student.last_name),
                lines,
                overall,
            ));
        }

        let mut ranked: Vec<f64> = class_entries.iter().map(|entry| entry.3).collect();
        ranked.sort_by(|left, right| right.total_cmp(left));
        let class_size = class_entries.len() as i32;

        for (student_id, student_name, lines, overall) in class_entries {
            let rank = ranked
                .iter()
                .position(|value| (*value - overall).abs() < f64::EPSILON)
                .unwrap_or(0) as i32
                + 1;
            bulletins.push(Bulletin {
                id: BulletinId::new(bulletins.len() as i64 + 1),
                student_id,
                student_name,
                class_name: class.name.clone(),
                term,
                school_year: SCHOOL_YEAR.to_owned(),
                lines,
                overall_average: overall,
                rank,
                class_size,
                observation: faker.observation(),
                published_on: Some(calendar_date(REFERENCE_YEAR, Month::January, 20)),
            });
        }
    }

    bulletins
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn term_window(term: Term) -> (Date, Date) {
    match term {
        Term::First => (
            calendar_date(REFERENCE_YEAR - 1, Month::September, 15),
            calendar_date(REFERENCE_YEAR - 1, Month::December, 15),
        ),
        Term::Second => (
            calendar_date(REFERENCE_YEAR, Month::January, 5),
            calendar_date(REFERENCE_YEAR, Month::March, 20),
        ),
        Term::Third => (
            calendar_date(REFERENCE_YEAR, Month::April, 1),
            calendar_date(REFERENCE_YEAR, Month::June, 20),
        ),
    }
}

fn reference_now() -> OffsetDateTime {
    calendar_date(REFERENCE_YEAR, Month::February, 1)
        .with_time(Time::from_hms(0, 0, 0).expect("valid midnight"))
        .assume_utc()
}

fn calendar_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid calendar date")
}

// In-memory DataSource over a seeded dataset. Refuses anonymous sessions,
// scopes parents to their linked students, honors the archived filter.
#[derive(Debug, Clone)]
pub struct InMemoryDirectory {
    dataset: SchoolDataset,
}

impl InMemoryDirectory {
    pub fn seeded(seed: u64) -> Self {
        Self {
            dataset: SchoolDataset::seed(seed),
        }
    }

    pub fn new(dataset: SchoolDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &SchoolDataset {
        &self.dataset
    }

    fn guard(&self, session: &Session) -> Result<()> {
        if session.is_anonymous() {
            bail!("session token is empty -- sign in and retry");
        }
        Ok(())
    }

    fn scoped_to_parent(&self, session: &Session, student_id: StudentId) -> bool {
        session.role != Role::Parent || session.student_ids.contains(&student_id)
    }

    fn next_id(current_max: i64) -> i64 {
        current_max + 1
    }
}

impl DataSource for InMemoryDirectory {
    fn load_counts(&mut self, session: &Session) -> Result<DashboardCounts> {
        self.guard(session)?;
        Ok(DashboardCounts {
            students: self
                .dataset
                .students
                .iter()
                .filter(|student| student.archived_at.is_none())
                .count(),
            teachers: self
                .dataset
                .teachers
                .iter()
                .filter(|teacher| teacher.archived_at.is_none())
                .count(),
            classes: self
                .dataset
                .classes
                .iter()
                .filter(|class| class.archived_at.is_none())
                .count(),
            graded_this_term: self
                .dataset
                .grades
                .iter()
                .filter(|grade| grade.term == self.dataset.current_term)
                .count(),
        })
    }

    fn load_dashboard(&mut self, session: &Session) -> Result<DashboardSnapshot> {
        self.guard(session)?;

        let mut recent: Vec<&GradeEntry> = self
            .dataset
            .grades
            .iter()
            .filter(|grade| self.scoped_to_parent(session, grade.student_id))
            .collect();
        recent.sort_by(|left, right| right.graded_on.cmp(&left.graded_on));
        let recent_grades = recent
            .into_iter()
            .take(5)
            .map(|grade| DashboardRecentGrade {
                grade_entry_id: grade.id,
                student_name: grade.student_name.clone(),
                subject_name: grade.subject_name.clone(),
                score: grade.score,
                out_of: grade.out_of,
                graded_on: grade.graded_on,
            })
            .collect();

        let class_standings = self
            .dataset
            .classes
            .iter()
            .filter(|class| class.archived_at.is_none())
            .map(|class| DashboardClassStanding {
                school_class_id: class.id,
                class_name: class.name.clone(),
                enrolled: class.enrolled,
                capacity: class.capacity,
            })
            .collect();

        let missing_guardian_email = if session.role == Role::Parent {
            Vec::new()
        } else {
            self.dataset
                .students
                .iter()
                .filter(|student| {
                    student.archived_at.is_none() && student.guardian.email.is_empty()
                })
                .map(|student| DashboardStudentContact {
                    student_id: student.id,
                    student_name: format!("{} {}", student.first_name, student.last_name),
                    class_name: student.class_name.clone(),
                })
                .collect()
        };

        Ok(DashboardSnapshot {
            recent_grades,
            class_standings,
            missing_guardian_email,
        })
    }

    fn load_section(
        &mut self,
        session: &Session,
        section: Section,
        include_archived: bool,
    ) -> Result<Option<SectionSnapshot>> {
        self.guard(session)?;

        let snapshot = match section {
            Section::Dashboard | Section::Settings => None,
            Section::Students => Some(SectionSnapshot::Students(
                self.dataset
                    .students
                    .iter()
                    .filter(|student| include_archived || student.archived_at.is_none())
                    .filter(|student| self.scoped_to_parent(session, student.id))
                    .cloned()
                    .collect(),
            )),
            Section::Teachers => Some(SectionSnapshot::Teachers(
                self.dataset
                    .teachers
                    .iter()
                    .filter(|teacher| include_archived || teacher.archived_at.is_none())
                    .cloned()
                    .collect(),
            )),
            Section::Classes => Some(SectionSnapshot::Classes(
                self.dataset
                    .classes
                    .iter()
                    .filter(|class| include_archived || class.archived_at.is_none())
                    .cloned()
                    .collect(),
            )),
            Section::Subjects => Some(SectionSnapshot::Subjects(self.dataset.subjects.clone())),
            Section::Grades => Some(SectionSnapshot::Grades(
                self.dataset
                    .grades
                    .iter()
                    .filter(|grade| self.scoped_to_parent(session, grade.student_id))
                    .cloned()
                    .collect(),
            )),
            Section::Bulletins => Some(SectionSnapshot::Bulletins(
                self.dataset
                    .bulletins
                    .iter()
                    .filter(|bulletin| self.scoped_to_parent(session, bulletin.student_id))
                    .cloned()
                    .collect(),
            )),
        };
        Ok(snapshot)
    }

    fn submit_form(&mut self, session: &Session, payload: &FormPayload) -> Result<()> {
        self.guard(session)?;
        if session.role == Role::Parent {
            bail!("parents cannot submit forms");
        }
        payload.validate()?;

        let now = reference_now();
        match payload {
            FormPayload::Student(form) => {
                let class = self
                    .dataset
                    .classes
                    .iter()
                    .find(|class| class.id == form.class_id)
                    .ok_or_else(|| anyhow::anyhow!("unknown class id {}", form.class_id.get()))?
                    .clone();
                let max = self
                    .dataset
                    .students
                    .iter()
                    .map(|student| student.id.get())
                    .max()
                    .unwrap_or(0);
                self.dataset.students.push(Student {
                    id: StudentId::new(Self::next_id(max)),
                    first_name: form.first_name.clone(),
                    last_name: form.last_name.clone(),
                    birth_date: form
                        .birth_date
                        .unwrap_or_else(|| calendar_date(REFERENCE_YEAR - 12, Month::January, 1)),
                    class_id: class.id,
                    class_name: class.name.clone(),
                    guardian: Guardian {
                        name: form.guardian_name.clone(),
                        email: form.guardian_email.clone(),
                        phone: form.guardian_phone.clone(),
                    },
                    enrolled_on: form
                        .enrolled_on
                        .unwrap_or_else(|| calendar_date(REFERENCE_YEAR - 1, Month::September, 1)),
                    created_at: now,
                    updated_at: now,
                    archived_at: None,
                });
                if let Some(class) = self
                    .dataset
                    .classes
                    .iter_mut()
                    .find(|candidate| candidate.id == form.class_id)
                {
                    class.enrolled += 1;
                }
            }
            FormPayload::Teacher(form) => {
                let max = self
                    .dataset
                    .teachers
                    .iter()
                    .map(|teacher| teacher.id.get())
                    .max()
                    .unwrap_or(0);
                self.dataset.teachers.push(Teacher {
                    id: TeacherId::new(Self::next_id(max)),
                    first_name: form.first_name.clone(),
                    last_name: form.last_name.clone(),
                    email: form.email.clone(),
                    phone: form.phone.clone(),
                    subjects: form.subjects.clone(),
                    hired_on: form
                        .hired_on
                        .unwrap_or_else(|| calendar_date(REFERENCE_YEAR - 1, Month::September, 1)),
                    created_at: now,
                    updated_at: now,
                    archived_at: None,
                });
            }
            FormPayload::SchoolClass(form) => {
                let teacher = self
                    .dataset
                    .teachers
                    .iter()
                    .find(|teacher| teacher.id == form.homeroom_teacher_id)
                    .ok_or_else(|| {
                        anyhow::anyhow!("unknown teacher id {}", form.homeroom_teacher_id.get())
                    })?;
                let max = self
                    .dataset
                    .classes
                    .iter()
                    .map(|class| class.id.get())
                    .max()
                    .unwrap_or(0);
                self.dataset.classes.push(SchoolClass {
                    id: SchoolClassId::new(Self::next_id(max)),
                    name: form.name.clone(),
                    level: form.level,
                    homeroom_teacher_id: teacher.id,
                    homeroom_teacher_name: format!(
                        "{} {}",
                        teacher.first_name, teacher.last_name
                    ),
                    capacity: form.capacity,
                    enrolled: 0,
                    created_at: now,
                    updated_at: now,
                    archived_at: None,
                });
            }
            FormPayload::Subject(form) => {
                let teacher = self
                    .dataset
                    .teachers
                    .iter()
                    .find(|teacher| teacher.id == form.teacher_id)
                    .ok_or_else(|| {
                        anyhow::anyhow!("unknown teacher id {}", form.teacher_id.get())
                    })?;
                let max = self
                    .dataset
                    .subjects
                    .iter()
                    .map(|subject| subject.id.get())
                    .max()
                    .unwrap_or(0);
                self.dataset.subjects.push(Subject {
                    id: SubjectId::new(Self::next_id(max)),
                    name: form.name.clone(),
                    code: form.code.clone(),
                    coefficient: form.coefficient,
                    teacher_id: teacher.id,
                    teacher_name: format!("{} {}", teacher.first_name, teacher.last_name),
                    created_at: now,
                    updated_at: now,
                });
            }
            FormPayload::Grade(form) => {
                let student = self
                    .dataset
                    .students
                    .iter()
                    .find(|student| student.id == form.student_id)
                    .ok_or_else(|| {
                        anyhow::anyhow!("unknown student id {}", form.student_id.get())
                    })?;
                let subject = self
                    .dataset
                    .subjects
                    .iter()
                    .find(|subject| subject.id == form.subject_id)
                    .ok_or_else(|| {
                        anyhow::anyhow!("unknown subject id {}", form.subject_id.get())
                    })?;
                let entry = GradeEntry {
                    id: GradeEntryId::new(Self::next_id(
                        self.dataset
                            .grades
                            .iter()
                            .map(|grade| grade.id.get())
                            .max()
                            .unwrap_or(0),
                    )),
                    student_id: student.id,
                    student_name: format!("{} {}", student.first_name, student.last_name),
                    subject_id: subject.id,
                    subject_name: subject.name.clone(),
                    term: form.term,
                    score: form.score,
                    out_of: form.out_of,
                    coefficient: form.coefficient,
                    comment: form.comment.clone(),
                    graded_on: form.graded_on.unwrap_or_else(|| now.date()),
                    created_at: now,
                    updated_at: now,
                };
                self.dataset.grades.push(entry);
            }
        }
        Ok(())
    }
}
