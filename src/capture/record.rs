//! Trend record model

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Number of trends kept per capture
pub const TRENDS_PER_RECORD: usize = 5;

/// One capture of the trending topics list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub id: Uuid,
    pub trends: Vec<String>,
    pub captured_at: DateTime<Local>,
    pub ip_address: String,
}

impl TrendRecord {
    /// Create a record from scraped trend names, keeping the first five
    pub fn new(trends: Vec<String>, ip_address: String) -> Result<Self> {
        if trends.len() < TRENDS_PER_RECORD {
            return Err(Error::Capture(format!(
                "expected {} trends, found {}",
                TRENDS_PER_RECORD,
                trends.len()
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            trends: trends.into_iter().take(TRENDS_PER_RECORD).collect(),
            captured_at: Local::now(),
            ip_address,
        })
    }

    /// Stored document shape: `_id`, `nameoftrend1..5`, `datetime`, `ip_address`
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("_id".to_string(), json!(self.id.to_string()));
        for (i, name) in self.trends.iter().enumerate() {
            doc.insert(format!("nameoftrend{}", i + 1), json!(name));
        }
        doc.insert("datetime".to_string(), json!(self.captured_at.to_rfc3339()));
        doc.insert("ip_address".to_string(), json!(self.ip_address));
        Value::Object(doc)
    }
}

/// Trend name from the text of a trend element: its first line
pub fn trend_name(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}
