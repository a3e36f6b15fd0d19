//! Flattening of JSON records into a column-uniform table.
//!
//! The server decides the record shape, so columns are discovered at runtime:
//! nested objects become dotted-path columns, the column set is the union of
//! keys across records (first appearance wins the position) and any key a
//! record lacks reads as `null`. Empty nested objects contribute no column.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::{Result, SpongeError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    /// Which cells the record actually carried, as opposed to `null` padding.
    filled: Vec<Vec<bool>>,
}

impl ResultTable {
    /// Normalize a decoded response body.
    ///
    /// An array of objects yields one row per element; a lone object yields a
    /// single row. Anything else is rejected.
    #[instrument(target = "sponge_web::table", skip(value))]
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let records = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::Object(map) => Ok(map),
                        other => Err(SpongeError::InvalidPayload(format!(
                            "record {i} is {}, expected an object",
                            kind_of(&other)
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::from_records(records))
            }
            Value::Object(map) => Ok(Self::from_records(vec![map])),
            other => Err(SpongeError::InvalidPayload(format!(
                "expected an array of records, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut flat_records = Vec::with_capacity(records.len());

        for record in records {
            let mut flat = Vec::new();
            flatten_into(None, record, &mut flat);
            for (key, _) in &flat {
                if !index.contains_key(key) {
                    index.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
            flat_records.push(flat);
        }

        let mut rows = Vec::with_capacity(flat_records.len());
        let mut filled = Vec::with_capacity(flat_records.len());
        for flat in flat_records {
            let mut row = vec![Value::Null; columns.len()];
            let mut present = vec![false; columns.len()];
            for (key, value) in flat {
                let col = index[&key];
                row[col] = value;
                present[col] = true;
            }
            rows.push(row);
            filled.push(present);
        }

        debug!(rows = rows.len(), columns = columns.len(), "Normalized response into table");
        Self { columns, rows, filled }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Rows as flat objects keyed by dotted column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<Map<String, Value>>()
            })
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.records().into_iter().map(Value::Object).collect())
    }

    /// Typed view over the rows: each row is re-nested along its dotted
    /// column names and deserialized into `T`. Only the cells a record carried
    /// are re-nested, so padding never shadows a sibling's nested object.
    pub fn deserialize_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.rows
            .iter()
            .zip(&self.filled)
            .map(|(row, present)| {
                let cells = self
                    .columns
                    .iter()
                    .zip(row.iter())
                    .zip(present.iter())
                    .filter(|&(_, &is_present)| is_present)
                    .map(|(cell, _)| cell);
                let nested = unflatten(cells);
                let raw = nested.to_string();
                serde_json::from_value(nested).map_err(|e| SpongeError::Decode(e, raw))
            })
            .collect()
    }
}

/// Cell rendering shared by the table and CSV printers; `null` renders empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn flatten_into(prefix: Option<&str>, record: Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, value) in record {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key,
        };
        match value {
            Value::Object(inner) => flatten_into(Some(&path), inner, out),
            other => out.push((path, other)),
        }
    }
}

fn unflatten<'a>(cells: impl Iterator<Item = (&'a String, &'a Value)>) -> Value {
    let mut root = Map::new();
    for (path, value) in cells {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(leaf) = segments.pop() else { continue };
        let mut node = &mut root;
        for segment in segments {
            let slot = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            node = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        if value.is_null() && node.get(leaf).is_some_and(Value::is_object) {
            continue;
        }
        node.insert(leaf.to_string(), value.clone());
    }
    Value::Object(root)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
