use std::fmt::Display;

use crate::error::{Result, SpongeError};

/// Ordered query-string pairs for a single request.
///
/// Absent optional values are never written, so the server sees exactly the
/// filters the caller set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: impl Display) -> &mut Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn push_opt<V: Display>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Comma-joined list parameter, order preserved. Only `None` is skipped;
    /// an empty list is sent as an empty value.
    pub fn push_list(&mut self, name: &str, values: Option<&[String]>) -> &mut Self {
        if let Some(values) = values {
            self.push(name, values.join(","));
        }
        self
    }

    /// Mandatory parameter; blank values are rejected before anything is sent.
    pub fn push_required(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        if value.trim().is_empty() {
            return Err(SpongeError::InvalidArgument(format!("{name} must not be empty")));
        }
        Ok(self.push(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
