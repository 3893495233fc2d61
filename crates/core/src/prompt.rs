//! Prompt construction for the diagnosis and condition-detail requests

use crate::patient::PatientRecord;

/// Breed used in prompts when none is given
pub const DEFAULT_BREED: &str = "mixed breed";

const DIAGNOSIS_SCHEMA_EXAMPLE: &str = r#"{
  "conditions": [
    {"name": "Condition name", "likelihood": 70, "explanation": "Why this condition fits the symptoms"}
  ],
  "urgent": false,
  "consult": "When and why to see a veterinarian",
  "homecare": "What the owner can do at home"
}"#;

/// Build the diagnosis instruction for a patient record.
///
/// Every non-empty field becomes a `Label: value` line in record order.
pub fn build_diagnosis_prompt(record: &PatientRecord) -> String {
    let species = record.species_text();
    let breed = record
        .field("breed")
        .unwrap_or_else(|| DEFAULT_BREED.to_string());

    let mut prompt = format!(
        "You are an expert veterinary diagnostic AI specializing in {species} health. \
         Provide a JSON response with ranked possible diagnoses, their likelihood (%), explanation, \
         urgency (true/false), consultation advice, and home care suggestions based on this {species} patient data:\n"
    );

    for (key, value) in record.non_empty_fields() {
        prompt.push_str(&format!("{}: {}\n", field_label(key), value));
    }

    prompt.push_str(&format!(
        "\nConsider breed-specific health predispositions for {breed} {species}."
    ));
    prompt.push_str(
        "\nReturn only a JSON object with fields: conditions (list of {name, likelihood, explanation}), \
         urgent (bool), consult (str), homecare (str). Likelihood is an integer percentage. \
         Do not add any text outside the JSON object. Example:\n",
    );
    prompt.push_str(DIAGNOSIS_SCHEMA_EXAMPLE);
    prompt
}

/// Build the condition profile instruction for a named diagnosis
pub fn build_detail_prompt(diagnosis: &str, species: &str, breed: &str) -> String {
    format!(
        r#"Provide a JSON object with detailed veterinary information about "{diagnosis}" in {species} (breed: {breed}) using Basic List of Veterinary Medical Serials, Third Edition. Include these fields:
    - Overview (str)
    - Symptoms (list or str)
    - When to see a veterinarian (str)
    - Causes (str)
    - Risk factors (list or str)
    - Complications (str)
    - Prevention (str)
    - Treatment options (str)
    Focus on species-specific and breed-specific considerations where relevant.
    Return a valid JSON object, with no additional text or code blocks."#
    )
}

/// `medical_history` -> `Medical history`
fn field_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> PatientRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn labels_are_capitalized() {
        assert_eq!(field_label("medical_history"), "Medical history");
        assert_eq!(field_label("otherInfo"), "Otherinfo");
        assert_eq!(field_label("AGE"), "Age");
        assert_eq!(field_label(""), "");
    }

    #[test]
    fn every_non_empty_field_becomes_a_line() {
        let r = record(json!({
            "species": "Dog",
            "breed": "Beagle",
            "age": 3,
            "sex": "male",
            "symptoms": "vomiting",
            "medical_history": "",
            "other_info": null
        }));
        let prompt = build_diagnosis_prompt(&r);

        for line in ["Species: Dog", "Breed: Beagle", "Age: 3", "Sex: male", "Symptoms: vomiting"] {
            assert!(prompt.lines().any(|l| l == line), "missing line {line:?}");
        }
        assert!(!prompt.contains("Medical history"));
        assert!(!prompt.contains("Other info"));
    }

    #[test]
    fn species_frames_the_prompt() {
        let r = record(json!({"species": "CAT", "symptoms": "sneezing"}));
        let prompt = build_diagnosis_prompt(&r);
        assert!(prompt.starts_with(
            "You are an expert veterinary diagnostic AI specializing in cat health."
        ));
    }

    #[test]
    fn padded_species_is_trimmed_in_framing() {
        let r = record(json!({"species": " Dog ", "symptoms": "limping"}));
        let prompt = build_diagnosis_prompt(&r);
        assert!(prompt.contains("specializing in dog health."));
        assert!(prompt.contains("based on this dog patient data:"));
        assert!(prompt.contains("predispositions for mixed breed dog."));
    }

    #[test]
    fn breed_defaults_to_mixed() {
        let r = record(json!({"species": "dog", "breed": ""}));
        assert!(build_diagnosis_prompt(&r).contains("predispositions for mixed breed dog."));

        let r = record(json!({"species": "dog", "breed": "Pug"}));
        assert!(build_diagnosis_prompt(&r).contains("predispositions for Pug dog."));
    }

    #[test]
    fn schema_instruction_is_appended() {
        let prompt = build_diagnosis_prompt(&record(json!({"species": "dog"})));
        assert!(prompt.contains("conditions (list of {name, likelihood, explanation})"));
        assert!(prompt.trim_end().ends_with('}'));
    }

    #[test]
    fn detail_prompt_names_condition_and_keys() {
        let prompt = build_detail_prompt("Gastritis", "dog", "Beagle");
        assert!(prompt.contains("\"Gastritis\" in dog (breed: Beagle)"));
        for key in ["Overview", "Symptoms", "When to see a veterinarian", "Treatment options"] {
            assert!(prompt.contains(key));
        }
    }
}
