// ============================================================
// EXPLORATORY ANALYSIS
// ============================================================
// Filtering, column summaries, group survival rates and correlations over raw records

use serde::Serialize;

use crate::application::use_cases::preprocessing::label_of;
use crate::application::use_cases::statistics::{mean, median, min_max, pearson, std_dev};
use crate::domain::csv::{Record, Value};
use crate::domain::features::columns;

/// Bucket name for absent values in category and group counts
pub const MISSING_BUCKET: &str = "missing";

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Equals(String, Value),
    /// Inclusive numeric range
    Range(String, f64, f64),
}

impl FilterCondition {
    fn matches(&self, record: &Record) -> bool {
        match self {
            FilterCondition::Equals(column, expected) => {
                let value = record.get(column);
                !value.is_absent() && value == expected
            }
            FilterCondition::Range(column, min, max) => record
                .get(column)
                .as_number()
                .map_or(false, |n| n >= *min && n <= *max),
        }
    }
}

/// Conjunction of conditions; an empty filter keeps every record
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    conditions: Vec<FilterCondition>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push(FilterCondition::Equals(column.into(), value.into()));
        self
    }

    pub fn range(mut self, column: impl Into<String>, min: f64, max: f64) -> Self {
        self.conditions
            .push(FilterCondition::Range(column.into(), min, max));
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Non-numeric text counts as missing here
pub fn summarize_numeric(records: &[Record], column: &str) -> NumericSummary {
    let values: Vec<Option<f64>> = records.iter().map(|r| r.get(column).as_number()).collect();
    let count = values.iter().filter(|v| v.is_some()).count();
    let range = min_max(values.iter().copied());

    NumericSummary {
        column: column.to_string(),
        count,
        missing: values.len() - count,
        mean: mean(values.iter().copied()),
        median: median(values.iter().copied()),
        std_dev: std_dev(values.iter().copied()),
        min: range.map(|(lo, _)| lo),
        max: range.map(|(_, hi)| hi),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

fn bucket_name(value: &Value) -> String {
    match value {
        Value::Absent => MISSING_BUCKET.to_string(),
        other => other.to_string(),
    }
}

/// Counts per distinct value, in first-seen order
pub fn category_counts(records: &[Record], column: &str) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for record in records {
        let category = bucket_name(record.get(column));
        match counts.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount { category, count: 1 }),
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub group: String,
    pub total: usize,
    pub survived: usize,
    pub rate: f64,
}

/// Share of survivors per group, groups in first-seen order
pub fn survival_rate_by(records: &[Record], group_column: &str, label_column: &str) -> Vec<GroupRate> {
    let mut groups: Vec<GroupRate> = Vec::new();
    for record in records {
        let group = bucket_name(record.get(group_column));
        let survived = label_of(record.get(label_column)) as usize;

        let position = match groups.iter().position(|g| g.group == group) {
            Some(position) => position,
            None => {
                groups.push(GroupRate {
                    group,
                    total: 0,
                    survived: 0,
                    rate: 0.0,
                });
                groups.len() - 1
            }
        };
        let entry = &mut groups[position];
        entry.total += 1;
        entry.survived += survived;
    }

    for group in &mut groups {
        group.rate = group.survived as f64 / group.total as f64;
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the Pearson coefficient of `columns[i]` and `columns[j]`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

pub fn correlation_matrix(records: &[Record], columns: &[&str]) -> CorrelationMatrix {
    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|column| records.iter().map(|r| r.get(column).as_number()).collect())
        .collect();

    let values = series
        .iter()
        .map(|x| {
            series
                .iter()
                .map(|y| pearson(x.iter().copied().zip(y.iter().copied())))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

/// Numeric columns summarised by the exploration report
pub const SUMMARY_COLUMNS: [&str; 4] = [columns::AGE, columns::FARE, columns::SIB_SP, columns::PARCH];

/// Dashboard-style overview of one passenger file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationReport {
    pub rows: usize,
    pub summaries: Vec<NumericSummary>,
    pub group_column: String,
    pub survival: Vec<GroupRate>,
    pub correlations: CorrelationMatrix,
}

pub fn explore(records: &[Record], group_column: &str, label_column: &str) -> ExplorationReport {
    let correlation_columns = [
        label_column,
        columns::PCLASS,
        columns::AGE,
        columns::SIB_SP,
        columns::PARCH,
        columns::FARE,
    ];

    ExplorationReport {
        rows: records.len(),
        summaries: SUMMARY_COLUMNS
            .iter()
            .map(|column| summarize_numeric(records, column))
            .collect(),
        group_column: group_column.to_string(),
        survival: survival_rate_by(records, group_column, label_column),
        correlations: correlation_matrix(records, &correlation_columns),
    }
}
