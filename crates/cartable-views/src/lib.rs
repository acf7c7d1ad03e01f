// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cartable_app::{
    AppCommand, AppEvent, AppState, Bulletin, DashboardCounts, FormPayload, GradeEntryId, Role,
    SchoolClass, SchoolClassId, Section, Session, Student, StudentId, Subject, Teacher, Term,
};
use cartable_table::{QueryStatus, Record, SortDirection, TableOptions, TableQuery, TableView};
use serde::Serialize;
use serde_json::Value;
use time::Date;

pub const DEFAULT_PAGE_SIZE: usize = 10;

// The seam to the remote REST collaborator. Every call receives the session
// explicitly; implementations own scoping and archived filtering.
pub trait DataSource {
    fn load_counts(&mut self, session: &Session) -> Result<DashboardCounts>;
    fn load_dashboard(&mut self, session: &Session) -> Result<DashboardSnapshot>;
    fn load_section(
        &mut self,
        session: &Session,
        section: Section,
        include_archived: bool,
    ) -> Result<Option<SectionSnapshot>>;
    fn submit_form(&mut self, session: &Session, payload: &FormPayload) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionSnapshot {
    Students(Vec<Student>),
    Teachers(Vec<Teacher>),
    Classes(Vec<SchoolClass>),
    Subjects(Vec<Subject>),
    Grades(Vec<cartable_app::GradeEntry>),
    Bulletins(Vec<Bulletin>),
}

impl SectionSnapshot {
    pub const fn section(&self) -> Section {
        match self {
            Self::Students(_) => Section::Students,
            Self::Teachers(_) => Section::Teachers,
            Self::Classes(_) => Section::Classes,
            Self::Subjects(_) => Section::Subjects,
            Self::Grades(_) => Section::Grades,
            Self::Bulletins(_) => Section::Bulletins,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Self::Students(rows) => rows.len(),
            Self::Teachers(rows) => rows.len(),
            Self::Classes(rows) => rows.len(),
            Self::Subjects(rows) => rows.len(),
            Self::Grades(rows) => rows.len(),
            Self::Bulletins(rows) => rows.len(),
        }
    }

    pub fn to_records(&self) -> Result<Vec<Record>> {
        match self {
            Self::Students(rows) => records_of(rows),
            Self::Teachers(rows) => records_of(rows),
            Self::Classes(rows) => records_of(rows),
            Self::Subjects(rows) => records_of(rows),
            Self::Grades(rows) => records_of(rows),
            Self::Bulletins(rows) => records_of(rows),
        }
    }
}

fn records_of<T: Serialize>(rows: &[T]) -> Result<Vec<Record>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).context("serialize row to record"))
        .collect()
}

// A sortable column of a section table: header label plus the record field
// path it sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub field: &'static str,
}

macro_rules! column_list {
    ($(($label:literal, $field:literal)),+ $(,)?) => {
        &[$(ColumnSpec { label: $label, field: $field }),+]
    };
}

const STUDENT_COLUMNS: &[ColumnSpec] = column_list![
    ("last name", "last_name"),
    ("first name", "first_name"),
    ("class", "class_name"),
    ("guardian", "guardian.name"),
    ("guardian e-mail", "guardian.email"),
    ("enrolled", "enrolled_on"),
];
const TEACHER_COLUMNS: &[ColumnSpec] = column_list![
    ("last name", "last_name"),
    ("first name", "first_name"),
    ("e-mail", "email"),
    ("subjects", "subjects"),
    ("hired", "hired_on"),
];
const CLASS_COLUMNS: &[ColumnSpec] = column_list![
    ("name", "name"),
    ("level", "level"),
    ("homeroom", "homeroom_teacher_name"),
    ("enrolled", "enrolled"),
    ("capacity", "capacity"),
];
const SUBJECT_COLUMNS: &[ColumnSpec] = column_list![
    ("name", "name"),
    ("code", "code"),
    ("coeff", "coefficient"),
    ("teacher", "teacher_name"),
];
const GRADE_COLUMNS: &[ColumnSpec] = column_list![
    ("student", "student_name"),
    ("subject", "subject_name"),
    ("score", "score"),
    ("out of", "out_of"),
    ("coeff", "coefficient"),
    ("graded", "graded_on"),
];
const BULLETIN_COLUMNS: &[ColumnSpec] = column_list![
    ("student", "student_name"),
    ("class", "class_name"),
    ("year", "school_year"),
    ("average", "overall_average"),
    ("rank", "rank"),
];

pub const fn columns(section: Section) -> &'static [ColumnSpec] {
    match section {
        Section::Students => STUDENT_COLUMNS,
        Section::Teachers => TEACHER_COLUMNS,
        Section::Classes => CLASS_COLUMNS,
        Section::Subjects => SUBJECT_COLUMNS,
        Section::Grades => GRADE_COLUMNS,
        Section::Bulletins => BULLETIN_COLUMNS,
        Section::Dashboard | Section::Settings => &[],
    }
}

pub const fn search_fields(section: Section) -> &'static [&'static str] {
    match section {
        Section::Students => &[
            "first_name",
            "last_name",
            "class_name",
            "guardian.name",
            "guardian.email",
        ],
        Section::Teachers => &["first_name", "last_name", "email", "subjects"],
        Section::Classes => &["name", "homeroom_teacher_name"],
        Section::Subjects => &["name", "code", "teacher_name"],
        Section::Grades => &["student_name", "subject_name", "comment"],
        Section::Bulletins => &["student_name", "class_name", "school_year"],
        Section::Dashboard | Section::Settings => &[],
    }
}

pub fn default_options(section: Section) -> TableOptions {
    let (initial_sort, initial_direction) = match section {
        Section::Students | Section::Teachers => (Some("last_name"), SortDirection::Asc),
        Section::Classes | Section::Subjects => (Some("name"), SortDirection::Asc),
        Section::Grades => (Some("graded_on"), SortDirection::Desc),
        Section::Bulletins => (Some("student_name"), SortDirection::Asc),
        Section::Dashboard | Section::Settings => (None, SortDirection::Asc),
    };
    TableOptions {
        page_size: DEFAULT_PAGE_SIZE,
        initial_sort: initial_sort.map(str::to_owned),
        initial_direction,
    }
}

// Missing fields and containers render empty.
pub fn cell_text(record: &Record, field: &str) -> String {
    match cartable_table::lookup(record, field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => (if *flag { "yes" } else { "no" }).to_owned(),
        Some(Value::Null) | Some(Value::Object(_)) | Some(Value::Array(_)) | None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionTable {
    section: Section,
    records: Vec<Record>,
    query: TableQuery,
}

impl SectionTable {
    pub fn new(section: Section) -> Self {
        Self::sized(section, DEFAULT_PAGE_SIZE)
    }

    pub fn sized(section: Section, page_size: usize) -> Self {
        let options = TableOptions {
            page_size,
            ..default_options(section)
        };
        Self {
            section,
            records: Vec::new(),
            query: TableQuery::new(search_fields(section).to_vec(), options),
        }
    }

    pub const fn section(&self) -> Section {
        self.section
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    // Query state survives a refresh; the next view re-clamps the page
    // against the new row count.
    pub fn refresh(&mut self, snapshot: &SectionSnapshot) -> Result<()> {
        self.records = snapshot.to_records()?;
        Ok(())
    }

    pub fn search(&mut self, term: &str) -> QueryStatus {
        self.query.set_search_term(term)
    }

    pub fn sort_by(&mut self, field: &str) -> QueryStatus {
        self.query.set_sort(field)
    }

    pub fn go_to_page(&mut self, page: usize) -> QueryStatus {
        self.query.set_page(&self.records, page)
    }

    pub fn view(&self) -> TableView {
        self.query.view(&self.records)
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRecentGrade {
    pub grade_entry_id: GradeEntryId,
    pub student_name: String,
    pub subject_name: String,
    pub score: f64,
    pub out_of: f64,
    pub graded_on: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardClassStanding {
    pub school_class_id: SchoolClassId,
    pub class_name: String,
    pub enrolled: i32,
    pub capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStudentContact {
    pub student_id: StudentId,
    pub student_name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSnapshot {
    pub recent_grades: Vec<DashboardRecentGrade>,
    pub class_standings: Vec<DashboardClassStanding>,
    pub missing_guardian_email: Vec<DashboardStudentContact>,
}

impl DashboardSnapshot {
    pub fn has_rows(&self) -> bool {
        !(self.recent_grades.is_empty()
            && self.class_standings.is_empty()
            && self.missing_guardian_email.is_empty())
    }
}

// Navigation state plus one table for the active section, loading through
// any DataSource. Role gating happens in the state machine.
#[derive(Debug)]
pub struct Workspace {
    pub state: AppState,
    page_size: usize,
    table: Option<SectionTable>,
}

impl Workspace {
    pub fn new(role: Role) -> Self {
        Self::sized(role, DEFAULT_PAGE_SIZE)
    }

    pub fn sized(role: Role, page_size: usize) -> Self {
        Self {
            state: AppState::for_role(role),
            page_size: page_size.max(1),
            table: None,
        }
    }

    pub fn table(&self) -> Option<&SectionTable> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut SectionTable> {
        self.table.as_mut()
    }

    pub fn activate(
        &mut self,
        source: &mut dyn DataSource,
        session: &Session,
        section: Section,
    ) -> Result<Vec<AppEvent>> {
        self.dispatch(source, session, AppCommand::JumpToSection(section))
    }

    pub fn dispatch(
        &mut self,
        source: &mut dyn DataSource,
        session: &Session,
        command: AppCommand,
    ) -> Result<Vec<AppEvent>> {
        let events = self.state.dispatch(command);
        let needs_reload = events.iter().any(|event| {
            matches!(
                event,
                AppEvent::SectionChanged(_) | AppEvent::ArchivedFilterChanged(_)
            )
        });
        if needs_reload {
            self.reload(source, session)?;
        }
        Ok(events)
    }

    // Keeps the existing query state when the section is unchanged so a
    // refresh does not lose the user's search or sort.
    pub fn reload(&mut self, source: &mut dyn DataSource, session: &Session) -> Result<()> {
        let section = self.state.active_section;
        let snapshot = source.load_section(session, section, self.state.show_archived)?;
        match snapshot {
            Some(snapshot) => {
                let same_section = self
                    .table
                    .as_ref()
                    .is_some_and(|table| table.section() == section);
                if !same_section {
                    self.table = Some(SectionTable::sized(section, self.page_size));
                }
                if let Some(table) = self.table.as_mut() {
                    table.refresh(&snapshot)?;
                }
            }
            None => self.table = None,
        }
        Ok(())
    }

    pub fn submit(
        &mut self,
        source: &mut dyn DataSource,
        session: &Session,
        payload: &FormPayload,
    ) -> Result<()> {
        source.submit_form(session, payload)?;
        self.reload(source, session)
    }
}

// Coefficient-weighted mean, rounded half-up to two decimals. None when the
// weights sum to zero.
pub fn weighted_average<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut total = 0.0;
    let mut weights = 0.0;
    for (value, weight) in pairs {
        total += value * weight;
        weights += weight;
    }
    if weights <= 0.0 {
        return None;
    }
    Some(((total / weights) * 100.0).round() / 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletinRow {
    pub subject_name: String,
    pub coefficient: i32,
    pub average: f64,
    pub class_average: f64,
    pub remark: String,
}

// The server's overall average is authoritative; the locally recomputed
// value only feeds the mismatch flag.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletinView {
    pub student_name: String,
    pub class_name: String,
    pub term: Term,
    pub school_year: String,
    pub rank: i32,
    pub class_size: i32,
    pub observation: String,
    pub published_on: Option<Date>,
    pub overall_average: f64,
    pub computed_overall: Option<f64>,
    pub rows: Vec<BulletinRow>,
}

impl BulletinView {
    pub fn build(bulletin: &Bulletin) -> Self {
        let rows = bulletin
            .lines
            .iter()
            .map(|line| BulletinRow {
                subject_name: line.subject_name.clone(),
                coefficient: line.coefficient,
                average: line.average,
                class_average: line.class_average,
                remark: line.remark.clone(),
            })
            .collect();
        let computed_overall = weighted_average(
            bulletin
                .lines
                .iter()
                .map(|line| (line.average, f64::from(line.coefficient))),
        );
        Self {
            student_name: bulletin.student_name.clone(),
            class_name: bulletin.class_name.clone(),
            term: bulletin.term,
            school_year: bulletin.school_year.clone(),
            rank: bulletin.rank,
            class_size: bulletin.class_size,
            observation: bulletin.observation.clone(),
            published_on: bulletin.published_on,
            overall_average: bulletin.overall_average,
            computed_overall,
            rows,
        }
    }

    pub fn average_mismatch(&self) -> bool {
        match self.computed_overall {
            Some(computed) => (computed - self.overall_average).abs() > 0.005,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BulletinView, DataSource, DashboardSnapshot, SectionSnapshot, SectionTable, Workspace,
        cell_text, columns, search_fields, weighted_average,
    };
    use anyhow::{Result, bail};
    use cartable_app::{
        AppCommand, AppEvent, Bulletin, BulletinId, BulletinLine, DashboardCounts, FormPayload,
        Guardian, Role, SchoolClassId, Section, Session, Student, StudentId, SubjectId, Term,
    };
    use time::macros::{date, datetime};

    fn student(id: i64, first: &str, last: &str, class_name: &str) -> Student {
        Student {
            id: StudentId::new(id),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            birth_date: date!(2012 - 05 - 14),
            class_id: SchoolClassId::new(1),
            class_name: class_name.to_owned(),
            guardian: Guardian {
                name: format!("Guardian {last}"),
                email: format!("{}@example.org", last.to_lowercase()),
                phone: String::new(),
            },
            enrolled_on: date!(2024 - 09 - 02),
            created_at: datetime!(2026-01-05 08:00 UTC),
            updated_at: datetime!(2026-01-05 08:00 UTC),
            archived_at: None,
        }
    }

    struct StubSource {
        students: Vec<Student>,
        loads: usize,
    }

    impl DataSource for StubSource {
        fn load_counts(&mut self, _session: &Session) -> Result<DashboardCounts> {
            Ok(DashboardCounts::default())
        }

        fn load_dashboard(&mut self, _session: &Session) -> Result<DashboardSnapshot> {
            Ok(DashboardSnapshot::default())
        }

        fn load_section(
            &mut self,
            _session: &Session,
            section: Section,
            _include_archived: bool,
        ) -> Result<Option<SectionSnapshot>> {
            self.loads += 1;
            match section {
                Section::Students => Ok(Some(SectionSnapshot::Students(self.students.clone()))),
                Section::Dashboard | Section::Settings => Ok(None),
                _ => Ok(Some(SectionSnapshot::Grades(Vec::new()))),
            }
        }

        fn submit_form(&mut self, session: &Session, payload: &FormPayload) -> Result<()> {
            if session.is_anonymous() {
                bail!("anonymous session");
            }
            payload.validate()
        }
    }

    #[test]
    fn every_listable_section_has_columns_and_search_fields() {
        for section in Section::ALL {
            let listable = !matches!(section, Section::Dashboard | Section::Settings);
            assert_eq!(!columns(section).is_empty(), listable, "{section:?}");
            assert_eq!(!search_fields(section).is_empty(), listable, "{section:?}");
        }
    }

    #[test]
    fn student_column_fields_resolve_against_serialized_records() -> Result<()> {
        let record = serde_json::to_value(student(1, "Ana", "Durand", "6A"))?;
        for spec in columns(Section::Students) {
            assert!(
                cartable_table::lookup(&record, spec.field).is_some(),
                "column field {} resolves",
                spec.field
            );
        }
        Ok(())
    }

    #[test]
    fn section_table_searches_and_sorts_students() -> Result<()> {
        let snapshot = SectionSnapshot::Students(vec![
            student(1, "Ana", "Zimmer", "6A"),
            student(2, "Bob", "Arnold", "6B"),
            student(3, "Chloe", "Morel", "6A"),
        ]);
        let mut table = SectionTable::new(Section::Students);
        table.refresh(&snapshot)?;

        // Default sort: last name ascending.
        let view = table.view();
        assert_eq!(cell_text(&view.rows[0], "last_name"), "Arnold");
        assert_eq!(cell_text(&view.rows[2], "last_name"), "Zimmer");

        table.search("6a");
        let filtered = table.view();
        assert_eq!(filtered.total_records, 2);
        assert_eq!(filtered.page, 1);
        Ok(())
    }

    #[test]
    fn workspace_reloads_on_section_change_and_drops_table_on_dashboard() -> Result<()> {
        let mut source = StubSource {
            students: vec![student(1, "Ana", "Durand", "6A")],
            loads: 0,
        };
        let session = Session::new("tok", Role::Administrator, "Admin");
        let mut workspace = Workspace::new(Role::Administrator);

        let events = workspace.activate(&mut source, &session, Section::Students)?;
        assert_eq!(events, vec![AppEvent::SectionChanged(Section::Students)]);
        assert_eq!(
            workspace.table().map(|table| table.record_count()),
            Some(1)
        );

        workspace.dispatch(&mut source, &session, AppCommand::JumpToSection(Section::Dashboard))?;
        assert!(workspace.table().is_none());
        assert_eq!(source.loads, 2);
        Ok(())
    }

    #[test]
    fn workspace_denies_sections_outside_the_role() -> Result<()> {
        let mut source = StubSource {
            students: Vec::new(),
            loads: 0,
        };
        let session = Session::new("tok", Role::Parent, "Marie");
        let mut workspace = Workspace::new(Role::Parent);

        let events = workspace.activate(&mut source, &session, Section::Students)?;
        assert_eq!(events[0], AppEvent::SectionDenied(Section::Students));
        assert_eq!(source.loads, 0, "denied jump must not hit the source");
        Ok(())
    }

    #[test]
    fn weighted_average_rounds_to_two_decimals() {
        let pairs = vec![(12.0, 3.0), (15.5, 2.0), (9.25, 1.0)];
        assert_eq!(weighted_average(pairs), Some(12.71));
        assert_eq!(weighted_average(Vec::new()), None);
    }

    fn bulletin(overall: f64) -> Bulletin {
        Bulletin {
            id: BulletinId::new(1),
            student_id: StudentId::new(1),
            student_name: "Ana Durand".to_owned(),
            class_name: "6A".to_owned(),
            term: Term::First,
            school_year: "2025-2026".to_owned(),
            lines: vec![
                BulletinLine {
                    subject_id: SubjectId::new(1),
                    subject_name: "Mathematics".to_owned(),
                    coefficient: 3,
                    average: 14.0,
                    class_average: 11.2,
                    remark: "solid".to_owned(),
                },
                BulletinLine {
                    subject_id: SubjectId::new(2),
                    subject_name: "French".to_owned(),
                    coefficient: 2,
                    average: 11.0,
                    class_average: 12.0,
                    remark: String::new(),
                },
            ],
            overall_average: overall,
            rank: 4,
            class_size: 27,
            observation: "keep it up".to_owned(),
            published_on: Some(date!(2026 - 01 - 20)),
        }
    }

    #[test]
    fn bulletin_view_flags_average_mismatch() {
        // (14*3 + 11*2) / 5 = 12.8
        let agreeing = BulletinView::build(&bulletin(12.8));
        assert_eq!(agreeing.computed_overall, Some(12.8));
        assert!(!agreeing.average_mismatch());

        let disagreeing = BulletinView::build(&bulletin(13.4));
        assert!(disagreeing.average_mismatch());
        // Server value stays authoritative for display.
        assert_eq!(disagreeing.overall_average, 13.4);
    }
}
