//! Structured interview feedback and its fallback.
//!
//! `ats_score` is always an integer 0–100. Models sometimes answer `"82"`,
//! `82.5`, or `"82%"`; those are coerced and clamped rather than rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::llm_client::{extract_json_block, Completion};

/// Score reported when the model's evaluation could not be used.
pub const FALLBACK_ATS_SCORE: u8 = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewFeedback {
    #[serde(deserialize_with = "deserialize_ats_score")]
    pub ats_score: u8,
    pub recommended_roles: Vec<String>,
    pub key_improvements: Vec<String>,
    pub summary: String,
}

impl InterviewFeedback {
    /// Canned feedback naming why the real evaluation is missing.
    pub fn fallback(cause: &str) -> Self {
        Self {
            ats_score: FALLBACK_ATS_SCORE,
            recommended_roles: vec![
                "Software Developer".to_string(),
                "Analyst".to_string(),
                "QA Engineer".to_string(),
            ],
            key_improvements: vec![
                "Provide more specific examples".to_string(),
                "Speak with more confidence".to_string(),
                "Highlight technical skills better".to_string(),
            ],
            summary: format!(
                "Could not generate detailed analysis due to error: {cause}. \
                 However, based on general patterns, focus on clarity."
            ),
        }
    }

    /// Parses model output, substituting the fallback when it is unusable.
    pub fn from_completion(completion: Completion) -> Self {
        if !completion.is_generated() {
            let cause = completion.into_text();
            warn!("Feedback generation failed, using fallback: {cause}");
            return Self::fallback(&cause);
        }

        let text = completion.into_text();
        match parse_feedback(&text) {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!("Feedback JSON unparsable, using fallback: {e}");
                Self::fallback(&e.to_string())
            }
        }
    }
}

pub fn parse_feedback(text: &str) -> Result<InterviewFeedback, serde_json::Error> {
    serde_json::from_str(extract_json_block(text))
}

fn deserialize_ats_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let score = match &raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match score {
        Some(score) if score.is_finite() => Ok(score.round().clamp(0.0, 100.0) as u8),
        _ => Err(serde::de::Error::custom(format!(
            "ats_score must be a number 0-100, got {raw}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::Provider;

    const MODEL_FEEDBACK: &str = r#"```json
{
    "ats_score": 84,
    "recommended_roles": ["Backend Engineer", "Platform Engineer", "SRE"],
    "key_improvements": ["Quantify impact", "Use STAR structure", "Discuss trade-offs"],
    "summary": "Strong systems knowledge with clear communication."
}
```"#;

    fn generated(text: &str) -> Completion {
        Completion::Generated {
            provider: Provider::Groq,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_parses_fenced_model_output() {
        let feedback = parse_feedback(MODEL_FEEDBACK).unwrap();
        assert_eq!(feedback.ats_score, 84);
        assert_eq!(feedback.recommended_roles.len(), 3);
        assert_eq!(feedback.key_improvements[0], "Quantify impact");
    }

    #[test]
    fn test_ats_score_coercions() {
        let parse = |score: &str| {
            parse_feedback(&format!(
                r#"{{"ats_score": {score}, "recommended_roles": [], "key_improvements": [], "summary": ""}}"#
            ))
            .map(|f| f.ats_score)
        };
        assert_eq!(parse("\"72\"").unwrap(), 72);
        assert_eq!(parse("\"65%\"").unwrap(), 65);
        assert_eq!(parse("88.6").unwrap(), 89);
        assert_eq!(parse("140").unwrap(), 100);
        assert_eq!(parse("-3").unwrap(), 0);
        assert!(parse("\"great\"").is_err());
        assert!(parse("null").is_err());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let err = parse_feedback(r#"{"ats_score": 80, "summary": "ok"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_unparsable_completion_yields_fallback() {
        let feedback = InterviewFeedback::from_completion(generated("I'd rate them highly!"));
        assert_eq!(feedback.ats_score, FALLBACK_ATS_SCORE);
        assert_eq!(
            feedback.recommended_roles,
            vec!["Software Developer", "Analyst", "QA Engineer"]
        );
        assert!(feedback
            .summary
            .starts_with("Could not generate detailed analysis due to error:"));
    }

    #[test]
    fn test_failed_completion_yields_fallback_with_cause() {
        let feedback = InterviewFeedback::from_completion(Completion::Failed {
            provider: Provider::Groq,
            cause: "API error (status 503): overloaded".to_string(),
        });
        assert_eq!(feedback.ats_score, FALLBACK_ATS_SCORE);
        assert!(feedback.summary.contains("overloaded"));
    }

    #[test]
    fn test_fallback_serializes_integer_score() {
        let value = serde_json::to_value(InterviewFeedback::fallback("x")).unwrap();
        assert_eq!(value["ats_score"], serde_json::json!(70));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
    }
}
