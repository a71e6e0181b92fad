use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::format::{Renderer, is_currency_field};
use crate::record::Record;

/// Number of non-null values looked at when typing a column.
pub const TYPE_SAMPLE_SIZE: usize = 5;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Id,
    Text,
    Number,
    Boolean,
    Date,
}

impl ColumnType {
    /// Display width in pixels.
    pub fn width(&self) -> u16 {
        match self {
            ColumnType::Id => 90,
            ColumnType::Text => 150,
            ColumnType::Number => 120,
            ColumnType::Boolean => 100,
            ColumnType::Date => 130,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub id: String,
    pub label: String,
    pub kind: ColumnType,
    pub sortable: bool,
    pub width: u16,
    pub renderer: Option<Renderer>,
    pub default_hidden: bool,
}

impl ColumnDescriptor {
    fn new(field: &str, kind: ColumnType) -> Self {
        let renderer = match kind {
            ColumnType::Id | ColumnType::Text => None,
            ColumnType::Date => Some(Renderer::Date),
            ColumnType::Boolean => Some(Renderer::YesNo),
            ColumnType::Number if is_currency_field(field) => Some(Renderer::Currency),
            ColumnType::Number => Some(Renderer::Number),
        };
        ColumnDescriptor {
            id: field.to_string(),
            label: label_for(field),
            kind,
            sortable: true,
            width: kind.width(),
            renderer,
            default_hidden: kind == ColumnType::Id,
        }
    }
}

/// Result of looking at a dataset: its columns, which of them start visible,
/// and their labels.
#[derive(Debug, Clone, Default)]
pub struct Inference {
    pub columns: Vec<ColumnDescriptor>,
    pub default_visible: HashSet<String>,
    pub labels: HashMap<String, String>,
}

impl Inference {
    pub fn column(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.column(id).is_some()
    }
}

pub fn infer(records: &[Record], max_default_visible: usize) -> Inference {
    let field_names = collect_field_names(records);

    let columns: Vec<ColumnDescriptor> = field_names
        .iter()
        .map(|field| ColumnDescriptor::new(field, infer_type(field, records)))
        .collect();
    for c in columns.iter() {
        debug!(
            "Column \"{}\": {:?}, label \"{}\", width {}, hidden {}",
            c.id, c.kind, c.label, c.width, c.default_hidden
        );
    }

    let default_visible = columns
        .iter()
        .filter(|c| !c.default_hidden)
        .take(max_default_visible)
        .map(|c| c.id.clone())
        .collect();
    let labels = columns
        .iter()
        .map(|c| (c.id.clone(), c.label.clone()))
        .collect();

    Inference {
        columns,
        default_visible,
        labels,
    }
}

/// Union of all keys in first seen order.
pub fn collect_field_names(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if seen.insert(key.as_str()) {
            names.push(key.clone());
        }
    }
    names
}

pub fn infer_type(field: &str, records: &[Record]) -> ColumnType {
    if field == "id" {
        return ColumnType::Id;
    }
    let samples: Vec<&Value> = records
        .iter()
        .filter_map(|r| r.get(field))
        .filter(|v| !v.is_null())
        .take(TYPE_SAMPLE_SIZE)
        .collect();

    match samples.first() {
        Some(Value::Number(_)) => ColumnType::Number,
        Some(Value::Bool(_)) => ColumnType::Boolean,
        Some(Value::String(s)) if is_iso_date(s) => ColumnType::Date,
        _ => ColumnType::Text,
    }
}

pub fn is_iso_date(s: &str) -> bool {
    ISO_DATE.is_match(s) && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// `hireDate` -> `Hire Date`, `performance_rating` -> `Performance Rating`
pub fn label_for(field: &str) -> String {
    let mut spaced = String::with_capacity(field.len() + 4);
    for (idx, chr) in field.chars().enumerate() {
        if chr == '_' {
            spaced.push(' ');
            continue;
        }
        if idx > 0 && chr.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(chr);
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_records;

    fn records(json: &str) -> Vec<Record> {
        parse_records(json).unwrap()
    }

    #[test]
    fn empty_input_gives_empty_inference() {
        let inference = infer(&[], 8);
        assert!(inference.columns.is_empty());
        assert!(inference.default_visible.is_empty());
        assert!(inference.labels.is_empty());
    }

    #[test]
    fn columns_follow_first_seen_order() {
        let data = records(
            r#"[
                {"name": "Ann", "age": 30},
                {"team": "Red", "name": "Bo"},
                {"age": 40, "city": "Rome", "team": "Blue"}
            ]"#,
        );
        let ids: Vec<String> = infer(&data, 8).columns.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["name", "age", "team", "city"]);
    }

    #[test]
    fn types_follow_first_non_null_sample() {
        let data = records(
            r#"[
                {"id": 1, "a": null, "b": true, "c": "2023-01-15", "d": "2023-13-45", "e": null},
                {"id": 2, "a": 12.5, "b": "no", "c": "x", "d": "2023-01-01", "e": null}
            ]"#,
        );
        let inference = infer(&data, 8);
        let kind = |id: &str| inference.column(id).unwrap().kind;
        assert_eq!(kind("id"), ColumnType::Id);
        assert_eq!(kind("a"), ColumnType::Number);
        assert_eq!(kind("b"), ColumnType::Boolean);
        assert_eq!(kind("c"), ColumnType::Date);
        assert_eq!(kind("d"), ColumnType::Text);
        assert_eq!(kind("e"), ColumnType::Text);
    }

    #[test]
    fn descriptor_defaults_per_type() {
        let data = records(
            r#"[{"id": 7, "name": "Ann", "salary": 75000, "rating": 4.5,
                 "hireDate": "2020-02-02", "isRemote": false}]"#,
        );
        let inference = infer(&data, 8);

        let id = inference.column("id").unwrap();
        assert!(id.default_hidden);
        assert_eq!(id.renderer, None);

        let name = inference.column("name").unwrap();
        assert_eq!((name.kind, name.width, name.renderer), (ColumnType::Text, 150, None));

        let salary = inference.column("salary").unwrap();
        assert_eq!(salary.width, 120);
        assert_eq!(salary.renderer, Some(Renderer::Currency));

        let rating = inference.column("rating").unwrap();
        assert_eq!(rating.renderer, Some(Renderer::Number));

        let hired = inference.column("hireDate").unwrap();
        assert_eq!((hired.width, hired.renderer), (130, Some(Renderer::Date)));
        assert_eq!(hired.label, "Hire Date");

        let remote = inference.column("isRemote").unwrap();
        assert_eq!((remote.width, remote.renderer), (100, Some(Renderer::YesNo)));

        assert!(inference.columns.iter().all(|c| c.sortable));
    }

    #[test]
    fn default_visible_skips_id_and_caps() {
        let data = records(
            r#"[{"id": 1, "f1": 1, "f2": 2, "f3": 3, "f4": 4, "f5": 5,
                 "f6": 6, "f7": 7, "f8": 8, "f9": 9, "f10": 10}]"#,
        );
        let inference = infer(&data, 8);
        assert_eq!(inference.default_visible.len(), 8);
        assert!(!inference.default_visible.contains("id"));
        assert!(inference.default_visible.contains("f8"));
        assert!(!inference.default_visible.contains("f9"));
    }

    #[test]
    fn labels() {
        assert_eq!(label_for("name"), "Name");
        assert_eq!(label_for("hireDate"), "Hire Date");
        assert_eq!(label_for("performanceRating"), "Performance Rating");
        assert_eq!(label_for("is_remote"), "Is Remote");
        assert_eq!(label_for("id"), "Id");
    }

    #[test]
    fn label_map_matches_columns() {
        let data = records(r#"[{"firstName": "Ann", "salary": 1}]"#);
        let inference = infer(&data, 8);
        assert_eq!(inference.labels["firstName"], "First Name");
        assert_eq!(inference.labels["salary"], "Salary");
    }

    #[test]
    fn sample_scenario() {
        let data = records(
            r#"[{"id": 1, "name": "Ann", "salary": 75000},
                {"id": 2, "name": "Bo", "salary": 50000}]"#,
        );
        let inference = infer(&data, 8);
        let salary = inference.column("salary").unwrap();
        let renderer = salary.renderer.unwrap();
        assert_eq!(renderer.render(&data[0]["salary"]), "$75,000");
        assert_eq!(renderer.render(&data[1]["salary"]), "$50,000");
        assert_eq!(
            inference.default_visible,
            HashSet::from(["name".to_string(), "salary".to_string()])
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;
        use serde_json::json;

        proptest! {
            #[test]
            fn one_column_per_unique_field(keys in prop::collection::vec(prop::collection::vec("[a-e]{1,2}", 0..6), 1..8)) {
                let data: Vec<Record> = keys
                    .iter()
                    .map(|ks| ks.iter().map(|k| (k.clone(), json!(1))).collect())
                    .collect();
                let unique: HashSet<&String> = keys.iter().flatten().collect();
                let columns = infer(&data, 8).columns;
                let ids: HashSet<&String> = columns.iter().map(|c| &c.id).collect();
                prop_assert_eq!(columns.len(), unique.len());
                prop_assert_eq!(ids, unique);
            }
        }
    }
}
