//! Diagnosis result types, fallback content and the summary line

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Attached to every diagnosis response
pub const DISCLAIMER: &str = "This is not professional veterinary advice. Please consult a licensed veterinarian for accurate diagnosis and treatment.";

/// One ranked condition as reported by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisCondition {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub likelihood: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub explanation: String,
}

/// The structured answer the model is asked to produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub conditions: Vec<DiagnosisCondition>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub urgent: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub consult: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub homecare: String,
}

impl DiagnosisResult {
    /// Interpret an extracted JSON value as a diagnosis.
    ///
    /// Returns `None` when the value is not an object carrying a
    /// `conditions` list of named entries.
    pub fn from_value(value: JsonValue) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// Placeholder used when the model output cannot be interpreted
    pub fn fallback() -> Self {
        Self {
            conditions: vec![DiagnosisCondition {
                name: "Unable to determine".to_string(),
                likelihood: 0,
                explanation: "The AI response could not be interpreted. Please try again or consult a veterinarian.".to_string(),
            }],
            urgent: false,
            consult: "Please consult a licensed veterinarian for an accurate diagnosis.".to_string(),
            homecare: "Keep your pet comfortable, ensure access to fresh water, and monitor symptoms closely until you can see a veterinarian.".to_string(),
        }
    }
}

/// Human-readable summary of the ranked conditions.
///
/// Three or more conditions list the top three by likelihood; fewer name
/// the single most likely one. Equal likelihoods keep the model's order.
pub fn summarize(conditions: &[DiagnosisCondition]) -> String {
    if conditions.is_empty() {
        return "No diagnosis available".to_string();
    }

    if conditions.len() >= 3 {
        let mut ranked: Vec<&DiagnosisCondition> = conditions.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.likelihood.cmp(&a.likelihood));
        let top = ranked
            .iter()
            .take(3)
            .map(|c| label(c))
            .collect::<Vec<_>>()
            .join(", ");
        return format!("Top 3 possible diagnoses: {}", top);
    }

    let mut best = &conditions[0];
    for c in &conditions[1..] {
        if c.likelihood > best.likelihood {
            best = c;
        }
    }
    label(best)
}

fn label(condition: &DiagnosisCondition) -> String {
    format!("{} ({}%)", condition.name, condition.likelihood)
}

/// Accepts `85`, `85.4`, `"85"`, `"85%"`; anything else becomes 0
fn lenient_percent<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    let number = match &value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Bool(b) => b,
        JsonValue::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes"),
        JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// Strings pass through, null becomes empty, other values become JSON text
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(name: &str, likelihood: u32) -> DiagnosisCondition {
        DiagnosisCondition {
            name: name.to_string(),
            likelihood,
            explanation: String::new(),
        }
    }

    #[test]
    fn summary_of_three() {
        let c = vec![cond("A", 90), cond("B", 80), cond("C", 70)];
        assert_eq!(summarize(&c), "Top 3 possible diagnoses: A (90%), B (80%), C (70%)");
    }

    #[test]
    fn summary_of_three_sorts_by_likelihood() {
        let c = vec![cond("A", 10), cond("B", 80), cond("C", 70), cond("D", 95)];
        assert_eq!(summarize(&c), "Top 3 possible diagnoses: D (95%), B (80%), C (70%)");
    }

    #[test]
    fn summary_ties_keep_model_order() {
        let c = vec![cond("A", 50), cond("B", 50), cond("C", 50), cond("D", 50)];
        assert_eq!(summarize(&c), "Top 3 possible diagnoses: A (50%), B (50%), C (50%)");

        let two = vec![cond("X", 40), cond("Y", 40)];
        assert_eq!(summarize(&two), "X (40%)");
    }

    #[test]
    fn summary_of_one() {
        assert_eq!(summarize(&[cond("A", 90)]), "A (90%)");
    }

    #[test]
    fn summary_of_two_names_the_higher() {
        assert_eq!(summarize(&[cond("A", 30), cond("B", 60)]), "B (60%)");
    }

    #[test]
    fn summary_of_none() {
        assert_eq!(summarize(&[]), "No diagnosis available");
    }

    #[test]
    fn model_output_is_read_leniently() {
        let result = DiagnosisResult::from_value(json!({
            "conditions": [
                {"name": "Gastritis", "likelihood": "65%", "explanation": "Diet"},
                {"name": "Pancreatitis", "likelihood": 20.6},
                {"name": "Other", "likelihood": "unknown", "explanation": null}
            ],
            "urgent": "yes",
            "consult": "See a vet within 24h"
        }))
        .unwrap();

        assert_eq!(result.conditions[0].likelihood, 65);
        assert_eq!(result.conditions[1].likelihood, 21);
        assert_eq!(result.conditions[1].explanation, "");
        assert_eq!(result.conditions[2].likelihood, 0);
        assert!(result.urgent);
        assert_eq!(result.homecare, "");
    }

    #[test]
    fn output_without_conditions_is_rejected() {
        assert!(DiagnosisResult::from_value(json!({"urgent": true})).is_none());
        assert!(DiagnosisResult::from_value(json!([1, 2, 3])).is_none());
        assert!(DiagnosisResult::from_value(json!({"conditions": [{"likelihood": 3}]})).is_none());
    }

    #[test]
    fn fallback_is_a_single_zero_condition() {
        let f = DiagnosisResult::fallback();
        assert_eq!(f.conditions.len(), 1);
        assert_eq!(f.conditions[0].name, "Unable to determine");
        assert_eq!(f.conditions[0].likelihood, 0);
        assert!(!f.urgent);
        assert_eq!(summarize(&f.conditions), "Unable to determine (0%)");
    }
}
