// ============================================================
// RECORD TYPES
// ============================================================
// One typed row per CSV data line, sharing the header of its parse

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::Value;
use crate::domain::error::{AppError, Result};

/// Column names of one parse, with a name -> position index
#[derive(Debug, PartialEq)]
pub struct Header {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    /// Build a header; duplicate column names are rejected
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if positions.insert(name.clone(), idx).is_some() {
                return Err(AppError::ParseError(format!(
                    "Duplicate column name in header: {}",
                    name
                )));
            }
        }

        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A single parsed row. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    header: Arc<Header>,
    values: Vec<Value>,
}

impl Record {
    /// Create a record; `values` must line up with `header`
    pub fn new(header: Arc<Header>, values: Vec<Value>) -> Result<Self> {
        if values.len() != header.len() {
            return Err(AppError::Internal(format!(
                "Record has {} values for {} columns",
                values.len(),
                header.len()
            )));
        }

        Ok(Self { header, values })
    }

    /// Build a standalone record from (column, value) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        let header = Header::new(columns)?;
        Self::new(Arc::new(header), values)
    }

    /// Value of `column`; unknown columns read as absent
    pub fn get(&self, column: &str) -> &Value {
        static ABSENT: Value = Value::Absent;
        self.header
            .position(column)
            .and_then(|idx| self.values.get(idx))
            .unwrap_or(&ABSENT)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.header.position(column).is_some()
    }

    pub fn columns(&self) -> &[String] {
        self.header.columns()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.header.columns().iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
