use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Tailored application documents for one job record.
/// Persisted as JSON text in `job_records.resume_content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBundle {
    /// 0 – 100
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: u8,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    pub resume_markdown: String,
    pub cover_letter_markdown: String,
    /// Short recruiter outreach message.
    pub linkedin_outreach: String,
    pub interview_question: String,
}

/// Quality gate output. Persisted as JSON text in `job_records.validation_report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub report: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ValidationAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationAnalysis {
    #[serde(deserialize_with = "deserialize_score")]
    pub before_score: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub after_score: u8,
    #[serde(default)]
    pub skill_gaps_closed: Vec<String>,
}

/// Accepts any JSON number (or numeric string) and clamps it into 0 – 100.
/// The oracle is loose about score types: 87, 87.5 and "87" all occur.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("expected a score, got {value}")))?;

    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle_json(score: Value) -> Value {
        json!({
            "match_score": score,
            "missing_keywords": ["Terraform"],
            "resume_markdown": "# Jane Doe",
            "cover_letter_markdown": "Dear team,",
            "linkedin_outreach": "Hi there.",
            "interview_question": "How would you migrate a monolith?"
        })
    }

    #[test]
    fn test_bundle_persisted_form_round_trips() {
        let bundle: DocumentBundle = serde_json::from_value(bundle_json(json!(82))).unwrap();
        let stored = serde_json::to_string(&bundle).unwrap();
        let recovered: DocumentBundle = serde_json::from_str(&stored).unwrap();
        assert_eq!(recovered, bundle);
        assert_eq!(recovered.match_score, 82);
    }

    #[test]
    fn test_score_is_clamped_and_rounded() {
        let high: DocumentBundle = serde_json::from_value(bundle_json(json!(140))).unwrap();
        assert_eq!(high.match_score, 100);
        let low: DocumentBundle = serde_json::from_value(bundle_json(json!(-3))).unwrap();
        assert_eq!(low.match_score, 0);
        let frac: DocumentBundle = serde_json::from_value(bundle_json(json!(71.6))).unwrap();
        assert_eq!(frac.match_score, 72);
        let text: DocumentBundle = serde_json::from_value(bundle_json(json!("64%"))).unwrap();
        assert_eq!(text.match_score, 64);
    }

    #[test]
    fn test_non_numeric_score_is_rejected() {
        let result: Result<DocumentBundle, _> =
            serde_json::from_value(bundle_json(json!("excellent")));
        assert!(result.is_err());
    }

    #[test]
    fn test_bundle_requires_resume_text() {
        let result: Result<DocumentBundle, _> = serde_json::from_value(json!({
            "match_score": 50,
            "cover_letter_markdown": "x",
            "linkedin_outreach": "x",
            "interview_question": "x"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_report_without_analysis_round_trips() {
        let report = ValidationReport {
            report: "Keyword coverage is thin.".to_string(),
            analysis: None,
        };
        let stored = serde_json::to_string(&report).unwrap();
        assert!(!stored.contains("analysis"));
        let recovered: ValidationReport = serde_json::from_str(&stored).unwrap();
        assert_eq!(recovered, report);
    }

    #[test]
    fn test_report_with_analysis_round_trips() {
        let report = ValidationReport {
            report: "Passes ATS checks.".to_string(),
            analysis: Some(ValidationAnalysis {
                before_score: 54,
                after_score: 88,
                skill_gaps_closed: vec!["Kubernetes".to_string()],
            }),
        };
        let stored = serde_json::to_string(&report).unwrap();
        let recovered: ValidationReport = serde_json::from_str(&stored).unwrap();
        assert_eq!(recovered, report);
    }
}
