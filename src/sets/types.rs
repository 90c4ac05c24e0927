//! Core data types for workout sets
//!
//! - `Set`: A stored set with its assigned id
//! - `NewSet`: The client-supplied body for creates and updates
//! - `SetRecord`: The loose, read-only shape the set list renders

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::error::ValidationError;

/// Maximum allowed intensity (percent of one-rep max)
pub const MAX_INTENSITY: f64 = 100.0;

/// Unique identifier assigned to a set when it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub u64);

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SetId)
    }
}

/// A single exercise set as held by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Set {
    pub id: SetId,
    pub movement: String,
    pub volume: f64,
    pub intensity: f64,
    #[serde(skip, default = "Utc::now")]
    pub created_on: DateTime<Utc>,
    #[serde(skip, default = "Utc::now")]
    pub last_updated_on: DateTime<Utc>,
}

impl Set {
    /// Build a stored set from validated input
    pub fn from_new(id: SetId, new: NewSet) -> Self {
        let now = Utc::now();
        Self {
            id,
            movement: new.movement,
            volume: new.volume,
            intensity: new.intensity,
            created_on: now,
            last_updated_on: now,
        }
    }

    /// Apply an update, keeping id and creation time
    pub fn apply(&mut self, update: NewSet) {
        self.movement = update.movement;
        self.volume = update.volume;
        self.intensity = update.intensity;
        self.last_updated_on = Utc::now();
    }

    /// True if all non-id fields match
    pub fn same_values(&self, other: &Set) -> bool {
        self.movement == other.movement
            && self.volume == other.volume
            && self.intensity == other.intensity
    }
}

/// Request body for creating or replacing a set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSet {
    pub movement: String,
    pub volume: f64,
    pub intensity: f64,
}

impl NewSet {
    pub fn new(movement: impl Into<String>, volume: f64, intensity: f64) -> Self {
        Self {
            movement: movement.into(),
            volume,
            intensity,
        }
    }

    /// Check every field rule, collecting all violations
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut problems = Vec::new();

        if !movement_pattern().is_match(&self.movement) {
            problems.push("'movement' field must use unicode characters.".to_string());
        }

        if !(self.volume > 0.0) {
            problems.push("'volume' field must be greater than 0.".to_string());
        }

        if !(self.intensity > 0.0) {
            problems.push("'intensity' field must be greater than 0.".to_string());
        } else if self.intensity > MAX_INTENSITY {
            problems.push(format!(
                "'intensity' field must be no more than {}.",
                MAX_INTENSITY
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(problems))
        }
    }
}

/// Words separated by whitespace, nothing else
fn movement_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w+(\s+\w+)*$").expect("movement pattern is valid"))
}

/// One cell value as the backend sent it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Integral numbers print without a fractional part (`5`, not `5.0`)
    pub fn text(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Numbers and strings are kept, any other JSON value becomes a blank cell
fn lenient_cell<'de, D>(deserializer: D) -> Result<Option<Cell>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().map(Cell::Number),
        serde_json::Value::String(s) => Some(Cell::Text(s)),
        _ => None,
    })
}

/// One row of the set list as delivered over the wire
///
/// Every field is optional and loosely typed: a record with a missing or
/// oddly typed field still renders, with whatever the field holds as text
/// or a blank cell. Unknown fields such as `id` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    #[serde(default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub movement: Option<Cell>,
    #[serde(default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub volume: Option<Cell>,
    #[serde(default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Cell>,
}

impl SetRecord {
    pub fn new(movement: impl Into<String>, volume: f64, intensity: f64) -> Self {
        Self {
            movement: Some(Cell::Text(movement.into())),
            volume: Some(Cell::Number(volume)),
            intensity: Some(Cell::Number(intensity)),
        }
    }

    /// Display text for each column, in header order
    pub fn cells(&self) -> [String; 3] {
        [&self.movement, &self.volume, &self.intensity]
            .map(|cell| cell.as_ref().map(Cell::text).unwrap_or_default())
    }
}

impl From<&Set> for SetRecord {
    fn from(set: &Set) -> Self {
        Self::new(set.movement.clone(), set.volume, set.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_set() {
        assert!(NewSet::new("Squat", 5.0, 80.0).validate().is_ok());
        assert!(NewSet::new("Romanian Deadlift", 8.0, 100.0).validate().is_ok());
    }

    #[test]
    fn test_invalid_movement() {
        for movement in ["", "  Squat", "Squat ", "Bench-Press", "Squat!"] {
            let err = NewSet::new(movement, 5.0, 80.0).validate().unwrap_err();
            assert_eq!(
                err.to_string(),
                "'movement' field must use unicode characters."
            );
        }
    }

    #[test]
    fn test_invalid_volume_and_intensity_collected() {
        let err = NewSet::new("Squat", 0.0, 101.0).validate().unwrap_err();
        assert_eq!(err.problems().len(), 2);
        assert_eq!(
            err.to_string(),
            "'volume' field must be greater than 0.'intensity' field must be no more than 100."
        );

        let err = NewSet::new("Squat", 3.0, -1.0).validate().unwrap_err();
        assert_eq!(err.to_string(), "'intensity' field must be greater than 0.");
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(NewSet::new("Squat", f64::NAN, 50.0).validate().is_err());
    }

    #[test]
    fn test_record_cells() {
        let record = SetRecord::new("Squat", 5.0, 80.0);
        assert_eq!(record.cells(), ["Squat", "5", "80"]);

        let record = SetRecord::new("Bench", 3.0, 72.5);
        assert_eq!(record.cells(), ["Bench", "3", "72.5"]);
    }

    #[test]
    fn test_record_missing_field_is_blank() {
        let record: SetRecord =
            serde_json::from_str(r#"{"movement":"Squat","volume":5}"#).unwrap();
        assert_eq!(record.intensity, None);
        assert_eq!(record.cells(), ["Squat", "5", ""]);
    }

    #[test]
    fn test_record_mixed_types_render_per_field() {
        let records: Vec<SetRecord> = serde_json::from_str(
            r#"[{"movement":"Squat","volume":5,"intensity":80},
                {"movement":"Bench","volume":"8","intensity":70},
                {"movement":42,"volume":null,"intensity":{"pct":70}},
                {"movement":"Row","volume":true,"intensity":[1]}]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].cells(), ["Squat", "5", "80"]);
        assert_eq!(records[1].cells(), ["Bench", "8", "70"]);
        assert_eq!(records[1].volume, Some(Cell::from("8")));
        assert_eq!(records[2].cells(), ["42", "", ""]);
        assert_eq!(records[3].cells(), ["Row", "", ""]);
    }

    #[test]
    fn test_record_list_must_hold_objects() {
        assert!(serde_json::from_str::<Vec<SetRecord>>(r#"{"movement":"Squat"}"#).is_err());
        assert!(serde_json::from_str::<Vec<SetRecord>>(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_record_ignores_id() {
        let record: SetRecord =
            serde_json::from_str(r#"{"id":7,"movement":"Row","volume":10,"intensity":60}"#)
                .unwrap();
        assert_eq!(record, SetRecord::new("Row", 10.0, 60.0));
    }

    #[test]
    fn test_set_json_hides_timestamps() {
        let set = Set::from_new(SetId(1), NewSet::new("Squat", 5.0, 80.0));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "movement": "Squat", "volume": 5.0, "intensity": 80.0})
        );
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut set = Set::from_new(SetId(4), NewSet::new("Squat", 5.0, 80.0));
        let created = set.created_on;
        set.apply(NewSet::new("Front Squat", 3.0, 75.0));
        assert_eq!(set.id, SetId(4));
        assert_eq!(set.created_on, created);
        assert_eq!(set.movement, "Front Squat");
    }
}
