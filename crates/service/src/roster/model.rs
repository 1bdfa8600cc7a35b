use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// A validated four-digit year label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Year(String);

impl Year {
    /// `context` names the calling operation in the error message.
    pub fn parse(raw: &str, context: &str) -> Result<Self, ServiceError> {
        if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ServiceError::Validation(format!("Invalid year for {context}: {raw}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key of one assignment in [`RosterYear::grid`]: `"<role>|<date>"`.
pub fn grid_key(role: &str, date: &str) -> String {
    format!("{role}|{date}")
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterYear {
    pub year: String,
    pub dates: Vec<String>,
    pub rows: Vec<String>,
    pub grid: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveCellInput {
    pub year: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub duty: String,
    /// Any JSON scalar; stored as its text, `null` or absent as `""`.
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveCellResult {
    pub ok: bool,
    /// No approval workflow exists; always true.
    pub approved: bool,
}
