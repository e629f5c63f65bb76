use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

const MAX_LEN: usize = 64;

/// Employee identifier as typed at the counter (badge number, payroll code…).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Trim and validate raw input.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let id = raw.trim();

        if id.is_empty() {
            return Err(AppError::InvalidEmployeeId(
                "Please enter employee ID".into(),
            ));
        }
        if id.chars().count() > MAX_LEN {
            return Err(AppError::InvalidEmployeeId(format!(
                "'{}…' is longer than {} characters",
                id.chars().take(16).collect::<String>(),
                MAX_LEN
            )));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(AppError::InvalidEmployeeId(format!(
                "'{}' must not contain spaces",
                id
            )));
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
