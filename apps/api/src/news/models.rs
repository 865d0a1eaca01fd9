use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::extract_json_block;

/// Number of headlines the trending endpoint always returns.
pub const HEADLINE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    /// Relative age, e.g. "2 hrs ago".
    pub date: String,
    pub url: String,
    pub summary: String,
}

impl Headline {
    fn new(title: &str, source: &str, date: &str, url: &str, summary: &str) -> Self {
        Self {
            title: title.to_string(),
            source: source.to_string(),
            date: date.to_string(),
            url: url.to_string(),
            summary: summary.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HeadlineError {
    #[error("headline JSON unparsable: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected 3 headlines, got {0}")]
    TooFew(usize),
}

/// Parses model output into exactly `HEADLINE_COUNT` headlines (extras are dropped).
pub fn parse_headlines(text: &str) -> Result<Vec<Headline>, HeadlineError> {
    let mut headlines: Vec<Headline> = serde_json::from_str(extract_json_block(text))?;
    if headlines.len() < HEADLINE_COUNT {
        return Err(HeadlineError::TooFew(headlines.len()));
    }
    headlines.truncate(HEADLINE_COUNT);
    Ok(headlines)
}

/// Served whenever the model's headlines cannot be used.
pub fn fallback_headlines() -> Vec<Headline> {
    vec![
        Headline::new(
            "AI Revolutionizes Health Care (Fallback)",
            "Nature",
            "1 hr ago",
            "https://nature.com/ai",
            "AI tools detect diseases earlier than ever.",
        ),
        Headline::new(
            "Quantum Computing Breakthrough",
            "ScienceDaily",
            "3 hrs ago",
            "https://sciencedaily.com/quantum",
            "New stable qubit state discovered.",
        ),
        Headline::new(
            "Web Assembly 2.0 Launched",
            "W3C",
            "5 hrs ago",
            "https://w3.org/wasm",
            "Performance boost for web apps.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline_json(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"title": "Story {i}", "source": "TechCrunch", "date": "{i} hrs ago", "url": "https://techcrunch.com/{i}", "summary": "Summary {i}."}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_parse_exactly_three() {
        let headlines = parse_headlines(&headline_json(3)).unwrap();
        assert_eq!(headlines.len(), 3);
        assert_eq!(headlines[2].title, "Story 2");
    }

    #[test]
    fn test_parse_truncates_extras() {
        let text = format!("```json\n{}\n```", headline_json(5));
        let headlines = parse_headlines(&text).unwrap();
        assert_eq!(headlines.len(), HEADLINE_COUNT);
        assert_eq!(headlines[0].title, "Story 0");
    }

    #[test]
    fn test_parse_rejects_too_few() {
        let err = parse_headlines(&headline_json(2)).unwrap_err();
        assert!(matches!(err, HeadlineError::TooFew(2)));
    }

    #[test]
    fn test_parse_rejects_missing_keys() {
        let text = r#"[{"title": "a"}, {"title": "b"}, {"title": "c"}]"#;
        assert!(matches!(
            parse_headlines(text).unwrap_err(),
            HeadlineError::Json(_)
        ));
    }

    #[test]
    fn test_fallback_has_three_complete_items() {
        let fallback = fallback_headlines();
        assert_eq!(fallback.len(), HEADLINE_COUNT);
        assert!(fallback.iter().all(|h| !h.title.is_empty() && h.url.starts_with("https://")));
    }
}
