//! Typed view of the `generateContent` response payload.
//!
//! Only the fields this backend consumes are modelled; everything else in
//! the upstream payload is ignored during deserialization.

use serde::Deserialize;

/// Top-level `generateContent` response.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generation candidate.
#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Candidate content: an ordered list of parts.
#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part. Non-text parts deserialize with `text = None`.
#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

/// Extract the first candidate's text, joining multiple parts with newlines.
///
/// Missing candidates, content, or text parts yield an empty string -- a
/// malformed or empty payload is "zero usable lines", not an error.
pub fn extract_text(response: &GenerateContentResponse) -> String {
    let Some(first) = response.candidates.first() else {
        return String::new();
    };
    let Some(content) = &first.content else {
        return String::new();
    };
    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .filter(|text| !text.is_empty())
        .collect();
    texts.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GenerateContentResponse {
        serde_json::from_str(raw).expect("payload should deserialize")
    }

    #[test]
    fn extracts_single_part_text() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Wear a mask.\nStay hydrated."}]}}]}"#,
        );
        assert_eq!(extract_text(&response), "Wear a mask.\nStay hydrated.");
    }

    #[test]
    fn joins_multiple_parts_with_newlines() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"first"},{"text":"second"}]}}]}"#,
        );
        assert_eq!(extract_text(&response), "first\nsecond");
    }

    #[test]
    fn only_first_candidate_is_used() {
        let response = parse(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"primary"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        );
        assert_eq!(extract_text(&response), "primary");
    }

    #[test]
    fn empty_candidates_yield_empty_string() {
        assert_eq!(extract_text(&parse(r#"{"candidates":[]}"#)), "");
        assert_eq!(extract_text(&parse(r#"{}"#)), "");
    }

    #[test]
    fn missing_content_or_text_yields_empty_string() {
        assert_eq!(extract_text(&parse(r#"{"candidates":[{}]}"#)), "");
        let response = parse(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#);
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let response =
            parse(r#"{"candidates":[{"content":{"parts":[{"text":"  padded text \n"}]}}]}"#);
        assert_eq!(extract_text(&response), "padded text");
    }
}
