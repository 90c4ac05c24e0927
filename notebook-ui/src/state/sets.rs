//! Set records as the UI sees them

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Table header, in column order
pub const COLUMNS: [&str; 3] = ["Movement", "Volume", "Intensity"];

/// Heading shown above the table
pub const HEADING: &str = "All Sets";

/// One row of the set list
///
/// Each field is rendered from whatever the backend sent: numbers and
/// strings as text, anything else (or nothing) as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetRecord {
    #[serde(default, deserialize_with = "cell_text")]
    pub movement: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub volume: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub intensity: Option<String>,
}

impl SetRecord {
    /// Cell text for Movement, Volume, Intensity
    pub fn cells(&self) -> [String; 3] {
        [&self.movement, &self.volume, &self.intensity]
            .map(|cell| cell.clone().unwrap_or_default())
    }
}

fn cell_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(n.as_f64().map(|v| v.to_string()).unwrap_or_else(|| n.to_string())),
        Value::String(s) => Some(s),
        _ => None,
    })
}
