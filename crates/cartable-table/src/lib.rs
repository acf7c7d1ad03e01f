// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

// One row of tabular data as it arrives from the API. The controller never
// mutates records and never inspects identity.
pub type Record = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub page_size: usize,
    pub initial_sort: Option<String>,
    pub initial_direction: SortDirection,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            initial_sort: None,
            initial_direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    search_fields: Vec<String>,
    search_term: String,
    sort_field: Option<String>,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<Record>,
    pub total_records: usize,
    pub total_pages: usize,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    SearchApplied(String),
    SearchCleared,
    SortedAsc(String),
    SortedDesc(String),
    PageChanged(usize),
    PageClamped(usize),
}

impl QueryStatus {
    pub fn message(&self) -> String {
        match self {
            Self::SearchApplied(term) => format!("search: {term}"),
            Self::SearchCleared => "search cleared".to_owned(),
            Self::SortedAsc(field) => format!("sort {field} asc"),
            Self::SortedDesc(field) => format!("sort {field} desc"),
            Self::PageChanged(page) => format!("page {page}"),
            Self::PageClamped(page) => format!("page clamped to {page}"),
        }
    }
}

impl TableQuery {
    pub fn new<S: Into<String>>(search_fields: Vec<S>, options: TableOptions) -> Self {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            search_term: String::new(),
            sort_field: options.initial_sort,
            sort_direction: options.initial_direction,
            // page_size of zero would make every view empty and totals
            // undefined, so it is clamped rather than rejected.
            page_size: options.page_size.max(1),
            page: 1,
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // A changed term always resets to page 1.
    pub fn set_search_term(&mut self, term: &str) -> QueryStatus {
        self.search_term = term.to_owned();
        self.page = 1;
        if self.search_term.is_empty() {
            QueryStatus::SearchCleared
        } else {
            QueryStatus::SearchApplied(self.search_term.clone())
        }
    }

    // Same field flips direction, any other field starts ascending. The page
    // is kept.
    pub fn set_sort(&mut self, field: &str) -> QueryStatus {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = Some(field.to_owned());
            self.sort_direction = SortDirection::Asc;
        }
        match self.sort_direction {
            SortDirection::Asc => QueryStatus::SortedAsc(field.to_owned()),
            SortDirection::Desc => QueryStatus::SortedDesc(field.to_owned()),
        }
    }

    // Out-of-range requests are clamped into [1, max(1, total_pages)], never
    // an error.
    pub fn set_page(&mut self, records: &[Record], n: usize) -> QueryStatus {
        let filtered = self.filtered_count(records);
        let limit = total_pages(filtered, self.page_size).max(1);
        let clamped = n.clamp(1, limit);
        self.page = clamped;
        if clamped == n {
            QueryStatus::PageChanged(clamped)
        } else {
            QueryStatus::PageClamped(clamped)
        }
    }

    // Recomputed from scratch on every call: filter, stable sort, clamp the
    // page, slice. Nothing is cached, so the view stays consistent with the
    // records it is handed even when the snapshot changed since the last
    // mutation.
    pub fn view(&self, records: &[Record]) -> TableView {
        let mut selected: Vec<&Record> = records
            .iter()
            .filter(|record| record_matches(record, &self.search_fields, &self.search_term))
            .collect();

        if let Some(field) = &self.sort_field {
            selected.sort_by(|left, right| {
                let order = compare_by_field(left, right, field);
                match self.sort_direction {
                    SortDirection::Asc => order,
                    SortDirection::Desc => order.reverse(),
                }
            });
        }

        let total_records = selected.len();
        let total_pages = total_pages(total_records, self.page_size);
        let page = self.page.clamp(1, total_pages.max(1));
        let start = (page - 1) * self.page_size;
        let rows = if start < total_records {
            selected[start..(start + self.page_size).min(total_records)]
                .iter()
                .map(|record| (*record).clone())
                .collect()
        } else {
            Vec::new()
        };

        TableView {
            rows,
            total_records,
            total_pages,
            page,
        }
    }

    fn filtered_count(&self, records: &[Record]) -> usize {
        records
            .iter()
            .filter(|record| record_matches(record, &self.search_fields, &self.search_term))
            .count()
    }
}

const fn total_pages(filtered: usize, page_size: usize) -> usize {
    filtered.div_ceil(page_size)
}

// Dotted field path resolution. Missing intermediate keys resolve to None
// rather than an error; numeric segments index into sequences.
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

pub fn filter_records(records: &[Record], search_fields: &[String], term: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record_matches(record, search_fields, term))
        .cloned()
        .collect()
}

pub fn sort_records(records: &[Record], field: &str, direction: SortDirection) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|left, right| {
        let order = compare_by_field(left, right, field);
        match direction {
            SortDirection::Asc => order,
            SortDirection::Desc => order.reverse(),
        }
    });
    sorted
}

fn record_matches(record: &Record, search_fields: &[String], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    search_fields.iter().any(|field| {
        lookup(record, field)
            .and_then(scalar_text)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

// Containers and null have no searchable form and never match a term.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(if *flag { "true" } else { "false" }.to_owned()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

fn compare_by_field(left: &Record, right: &Record, field: &str) -> Ordering {
    compare_values(lookup(left, field), lookup(right, field))
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => {
            match (left.as_f64(), right.as_f64()) {
                (Some(left), Some(right)) => left.total_cmp(&right),
                _ => Ordering::Equal,
            }
        }
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (Some(Value::Bool(left)), Some(Value::Bool(right))) => left.cmp(right),
        // Absent, null, container, and mixed-kind pairs are incomparable;
        // Equal lets the stable sort keep their original relative order.
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        QueryStatus, SortDirection, TableOptions, TableQuery, filter_records, lookup, sort_records,
    };
    use serde_json::{Value, json};

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Ana", "guardian": {"email": "ana.home@example.org"}, "score": 12}),
            json!({"name": "Bob", "guardian": {"email": "bob@example.org"}, "score": 7}),
            json!({"name": "Chloe", "score": 19}),
        ]
    }

    fn fields() -> Vec<&'static str> {
        vec!["name", "guardian.email"]
    }

    #[test]
    fn lookup_resolves_nested_paths() {
        let record = json!({"guardian": {"email": "x@y.z"}, "tags": ["new", "late"]});
        assert_eq!(record_path(&record, "guardian.email"), Some("x@y.z"));
        assert_eq!(record_path(&record, "tags.1"), Some("late"));
    }

    #[test]
    fn lookup_missing_intermediate_key_is_none() {
        let record = json!({"name": "Ana"});
        assert!(lookup(&record, "guardian.email").is_none());
        assert!(lookup(&record, "name.deeper").is_none());
    }

    fn record_path<'a>(record: &'a Value, path: &str) -> Option<&'a str> {
        lookup(record, path).and_then(Value::as_str)
    }

    #[test]
    fn filter_is_case_insensitive_substring_over_any_field() {
        let records = people();
        let fields: Vec<String> = fields().into_iter().map(str::to_owned).collect();

        let matched = filter_records(&records, &fields, "AN");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["name"], json!("Ana"));

        let by_email = filter_records(&records, &fields, "bob@");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0]["name"], json!("Bob"));
    }

    #[test]
    fn filter_empty_term_matches_everything() {
        let records = people();
        let fields: Vec<String> = fields().into_iter().map(str::to_owned).collect();
        assert_eq!(filter_records(&records, &fields, "").len(), records.len());
    }

    #[test]
    fn filter_missing_field_degrades_to_no_match() {
        let records = people();
        let fields = vec!["guardian.email".to_owned()];
        // Chloe has no guardian at all; the path contributes nothing.
        let matched = filter_records(&records, &fields, "example.org");
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn filter_matches_numbers_by_display_form() {
        let records = people();
        let fields = vec!["score".to_owned()];
        let matched = filter_records(&records, &fields, "19");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["name"], json!("Chloe"));
    }

    #[test]
    fn search_monotonicity_appending_narrows() {
        let records = people();
        let fields: Vec<String> = fields().into_iter().map(str::to_owned).collect();
        let loose = filter_records(&records, &fields, "a");
        let strict = filter_records(&records, &fields, "an");
        assert!(strict.len() <= loose.len());
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let records = vec![
            json!({"k": 1, "i": 0}),
            json!({"k": 1, "i": 1}),
            json!({"k": 2, "i": 2}),
        ];
        let sorted = sort_records(&records, "k", SortDirection::Asc);
        assert_eq!(sorted[0]["i"], json!(0));
        assert_eq!(sorted[1]["i"], json!(1));
        assert_eq!(sorted[2]["i"], json!(2));
    }

    #[test]
    fn sort_keeps_incomparable_rows_in_place() {
        let records = vec![
            json!({"name": "Bob", "score": "not a number"}),
            json!({"name": "Ana", "score": 3}),
            json!({"name": "Chloe"}),
        ];
        let sorted = sort_records(&records, "score", SortDirection::Asc);
        // Mixed-kind and absent keys compare equal, so nothing moves.
        assert_eq!(sorted[0]["name"], json!("Bob"));
        assert_eq!(sorted[1]["name"], json!("Ana"));
        assert_eq!(sorted[2]["name"], json!("Chloe"));
    }

    #[test]
    fn sort_descending_reverses_comparable_pairs_only() {
        let records = vec![
            json!({"name": "Ana"}),
            json!({"name": "Chloe"}),
            json!({"name": "Bob"}),
        ];
        let sorted = sort_records(&records, "name", SortDirection::Desc);
        assert_eq!(sorted[0]["name"], json!("Chloe"));
        assert_eq!(sorted[2]["name"], json!("Ana"));
    }

    #[test]
    fn set_search_term_resets_page() {
        let records: Vec<Value> = (0..30).map(|n| json!({"n": n})).collect();
        let mut query = TableQuery::new(vec!["n"], TableOptions::default());
        query.set_page(&records, 3);
        assert_eq!(query.page(), 3);

        query.set_search_term("x");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn set_sort_toggles_direction_on_same_field() {
        let mut query = TableQuery::new(vec!["name"], TableOptions::default());

        let first = query.set_sort("name");
        assert_eq!(first, QueryStatus::SortedAsc("name".to_owned()));
        assert_eq!(query.sort_direction(), SortDirection::Asc);

        let second = query.set_sort("name");
        assert_eq!(second, QueryStatus::SortedDesc("name".to_owned()));
        assert_eq!(query.sort_direction(), SortDirection::Desc);

        let other = query.set_sort("score");
        assert_eq!(other, QueryStatus::SortedAsc("score".to_owned()));
    }

    #[test]
    fn set_sort_does_not_reset_page() {
        let records: Vec<Value> = (0..30).map(|n| json!({"n": n})).collect();
        let mut query = TableQuery::new(vec!["n"], TableOptions::default());
        query.set_page(&records, 2);
        query.set_sort("n");
        assert_eq!(query.page(), 2);
    }

    #[test]
    fn set_page_clamps_out_of_range_requests() {
        let records: Vec<Value> = (0..15).map(|n| json!({"n": n})).collect();
        let mut query = TableQuery::new(vec!["n"], TableOptions::default());

        assert_eq!(query.set_page(&records, 99), QueryStatus::PageClamped(2));
        assert_eq!(query.set_page(&records, 0), QueryStatus::PageClamped(1));
        assert_eq!(query.set_page(&records, 2), QueryStatus::PageChanged(2));
    }

    #[test]
    fn view_of_empty_records_is_the_empty_state() {
        let query = TableQuery::new(vec!["name"], TableOptions::default());
        let view = query.view(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_records, 0);
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.page, 1);
    }

    #[test]
    fn view_is_idempotent_for_unchanged_inputs() {
        let records = people();
        let mut query = TableQuery::new(fields(), TableOptions::default());
        query.set_sort("name");
        query.set_search_term("o");

        assert_eq!(query.view(&records), query.view(&records));
    }

    #[test]
    fn view_page_never_exceeds_page_size() {
        let records: Vec<Value> = (0..23).map(|n| json!({"n": n})).collect();
        let mut query = TableQuery::new(
            vec!["n"],
            TableOptions {
                page_size: 7,
                ..TableOptions::default()
            },
        );

        for page in 1..=4 {
            query.set_page(&records, page);
            let view = query.view(&records);
            assert!(view.rows.len() <= 7, "page {page}");
        }

        query.set_page(&records, 4);
        assert_eq!(query.view(&records).rows.len(), 2);
    }

    #[test]
    fn view_clamps_page_when_records_shrink_between_calls() {
        let many: Vec<Value> = (0..30).map(|n| json!({"n": n})).collect();
        let few: Vec<Value> = (0..5).map(|n| json!({"n": n})).collect();
        let mut query = TableQuery::new(vec!["n"], TableOptions::default());
        query.set_page(&many, 3);

        let view = query.view(&few);
        assert_eq!(view.page, 1);
        assert_eq!(view.rows.len(), 5);
    }

    #[test]
    fn options_apply_initial_sort_and_page_size() {
        let records = vec![
            json!({"name": "Chloe"}),
            json!({"name": "Ana"}),
            json!({"name": "Bob"}),
        ];
        let query = TableQuery::new(
            vec!["name"],
            TableOptions {
                page_size: 2,
                initial_sort: Some("name".to_owned()),
                initial_direction: SortDirection::Desc,
            },
        );

        let view = query.view(&records);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.rows[0]["name"], json!("Chloe"));
    }

    #[test]
    fn zero_page_size_is_clamped_to_one() {
        let query = TableQuery::new(
            vec!["name"],
            TableOptions {
                page_size: 0,
                ..TableOptions::default()
            },
        );
        assert_eq!(query.page_size(), 1);
    }
}
