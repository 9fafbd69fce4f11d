use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::{Validate, ValidationError};

/// Top-level shape the model is constrained to return.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct McqResponse {
    #[validate(nested)]
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeneratedQuestion {
    #[validate(custom(function = "validate_question_text"))]
    pub text: String,
    #[validate(length(min = 2), custom(function = "validate_options"))]
    pub options: Vec<GeneratedOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedOption {
    pub text: String,
    pub is_correct: bool,
}

impl GeneratedQuestion {
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}

fn validate_question_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("blank_question");
        err.message = Some("question text must not be empty".into());
        return Err(err);
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn validate_options(options: &Vec<GeneratedOption>) -> Result<(), ValidationError> {
    if options.iter().any(|o| o.text.trim().is_empty()) {
        let mut err = ValidationError::new("blank_option");
        err.message = Some("option text must not be empty".into());
        return Err(err);
    }

    let correct = options.iter().filter(|o| o.is_correct).count();
    if correct == 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("exactly_one_correct");
        err.message = Some(format!("expected exactly one correct option, found {}", correct).into());
        Err(err)
    }
}

/// Response schema in the OpenAPI subset accepted by `generationConfig.responseSchema`.
pub fn response_schema(option_count: usize) -> JsonValue {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "description": "Multiple choice questions generated from the document.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": {
                            "type": "STRING",
                            "description": "The question text."
                        },
                        "options": {
                            "type": "ARRAY",
                            "description": format!(
                                "List of {} answer options. Exactly one must be correct.",
                                option_count
                            ),
                            "minItems": option_count,
                            "maxItems": option_count,
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "text": {
                                        "type": "STRING",
                                        "description": "The text content of this option."
                                    },
                                    "is_correct": {
                                        "type": "BOOLEAN",
                                        "description": "True if this is the correct answer, False otherwise."
                                    }
                                },
                                "required": ["text", "is_correct"],
                                "propertyOrdering": ["text", "is_correct"]
                            }
                        }
                    },
                    "required": ["text", "options"],
                    "propertyOrdering": ["text", "options"]
                }
            }
        },
        "required": ["questions"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_flags: &[bool]) -> GeneratedQuestion {
        GeneratedQuestion {
            text: "Which planet is largest?".to_string(),
            options: correct_flags
                .iter()
                .enumerate()
                .map(|(i, &is_correct)| GeneratedOption {
                    text: format!("Option {}", i + 1),
                    is_correct,
                })
                .collect(),
        }
    }

    #[test]
    fn one_correct_option_is_valid() {
        assert!(question(&[false, true, false, false]).validate().is_ok());
    }

    #[test]
    fn zero_or_two_correct_options_are_rejected() {
        assert!(question(&[false, false, false, false]).validate().is_err());
        assert!(question(&[true, true, false, false]).validate().is_err());
    }

    #[test]
    fn single_option_is_rejected() {
        assert!(question(&[true]).validate().is_err());
    }

    #[test]
    fn blank_option_text_is_rejected() {
        let mut q = question(&[true, false]);
        q.options[1].text.clear();
        let response = McqResponse { questions: vec![q] };
        assert!(response.validate().is_err());

        let mut q = question(&[true, false]);
        q.options[0].text = " \t ".to_string();
        assert!(q.validate().is_err());
    }

    #[test]
    fn blank_question_text_is_rejected() {
        for text in ["", "   ", "\n\t"] {
            let mut q = question(&[true, false]);
            q.text = text.to_string();
            assert!(q.validate().is_err(), "{:?}", text);
        }
    }

    #[test]
    fn schema_bounds_option_count() {
        let schema = response_schema(4);
        let options = &schema["properties"]["questions"]["items"]["properties"]["options"];
        assert_eq!(options["minItems"], 4);
        assert_eq!(options["maxItems"], 4);
    }
}
