//! Patient questionnaire record and its validation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Fields every diagnosis request must carry with a non-empty value
pub const REQUIRED_FIELDS: [&str; 4] = ["species", "age", "sex", "symptoms"];

/// Species the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Cat,
    Dog,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Cat => "cat",
            Species::Dog => "dog",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cat" => Ok(Species::Cat),
            "dog" => Ok(Species::Dog),
            _ => Err(ValidationError::InvalidSpecies(s.to_string())),
        }
    }
}

/// Questionnaire answers as sent by the browser, in the order they were sent.
///
/// Keys are free-form (`species`, `breed`, `age`, `sex`, `symptoms`,
/// `medical_history`, `other_info`, ...). Values are kept as raw JSON so
/// numbers and lists survive until the prompt is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord(Map<String, JsonValue>);

impl PatientRecord {
    /// Non-empty fields rendered as display text, in record order
    pub fn non_empty_fields(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| render_value(value).map(|text| (key.as_str(), text)))
    }

    /// Display text of a field, or `None` when it is absent or empty
    pub fn field(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(render_value)
    }

    /// Trimmed, lowercased species text, valid or not
    pub fn species_text(&self) -> String {
        self.field("species").unwrap_or_default().trim().to_lowercase()
    }

    /// Check required fields and the species constraint.
    ///
    /// Missing fields are reported together, before the species check.
    /// Species must be a JSON string naming cat or dog.
    pub fn validate(&self) -> Result<Species, ValidationError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|key| self.field(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        match self.0.get("species") {
            Some(JsonValue::String(species)) => species.parse(),
            other => Err(ValidationError::InvalidSpecies(
                other.map(JsonValue::to_string).unwrap_or_default(),
            )),
        }
    }
}

/// Render a JSON value as prompt text. Empty values yield `None`.
fn render_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(false) => None,
        JsonValue::Bool(true) => Some("true".to_string()),
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) if n.as_f64() == Some(0.0) => None,
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Array(items) if items.is_empty() => None,
        JsonValue::Array(items) if items.iter().all(is_scalar) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        JsonValue::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn is_scalar(value: &JsonValue) -> bool {
    !matches!(value, JsonValue::Array(_) | JsonValue::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: JsonValue) -> PatientRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn valid_record_yields_species() {
        let r = record(json!({"species": "Dog", "age": 3, "sex": "male", "symptoms": "vomiting"}));
        assert_eq!(r.validate(), Ok(Species::Dog));
    }

    #[test]
    fn missing_fields_are_listed_in_order() {
        let r = record(json!({"species": "cat", "age": "", "symptoms": null}));
        let err = r.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "age".to_string(),
                "sex".to_string(),
                "symptoms".to_string()
            ])
        );
        assert_eq!(err.to_string(), "Missing required fields: age, sex, symptoms");
    }

    #[test]
    fn unknown_species_is_rejected() {
        let r = record(json!({"species": "bird", "age": "2", "sex": "female", "symptoms": "x"}));
        let err = r.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSpecies(_)));
        assert!(err.to_string().contains("'cat' or 'dog'"));
    }

    #[test]
    fn non_string_species_is_rejected() {
        for species in [json!(["dog"]), json!({"kind": "cat"}), json!(7), json!(true)] {
            let r = record(json!({"species": species, "age": 3, "sex": "male", "symptoms": "v"}));
            assert!(
                matches!(r.validate(), Err(ValidationError::InvalidSpecies(_))),
                "accepted {species}"
            );
        }
    }

    #[test]
    fn padded_species_is_accepted_and_trimmed() {
        let r = record(json!({"species": " Cat ", "age": 3, "sex": "male", "symptoms": "v"}));
        assert_eq!(r.validate(), Ok(Species::Cat));
        assert_eq!(r.species_text(), "cat");
    }

    #[test]
    fn empty_values_are_skipped() {
        let r = record(json!({
            "species": "cat",
            "breed": "",
            "age": 0,
            "flags": [],
            "extra": {},
            "vaccinated": false,
            "sex": "female"
        }));
        let keys: Vec<&str> = r.non_empty_fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["species", "sex"]);
    }

    #[test]
    fn field_order_is_preserved() {
        let r = record(json!({"symptoms": "a", "age": "b", "species": "c"}));
        let keys: Vec<&str> = r.non_empty_fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["symptoms", "age", "species"]);
    }

    #[test]
    fn scalar_lists_are_joined() {
        let r = record(json!({"symptoms": ["vomiting", "lethargy"]}));
        assert_eq!(r.field("symptoms").as_deref(), Some("vomiting, lethargy"));
    }
}
