//! Prompt assembly and response parsing for shortlist generation.

use chrono::Utc;

use shortlist_types::config::LlmConfig;
use shortlist_types::llm::{CompletionRequest, LlmError};
use shortlist_types::shortlist::{ShortlistInput, ShortlistResult};

const SYSTEM_PROMPT: &str = "You are a B2B vendor research analyst. Always respond with valid JSON \
only — no markdown, no explanation, just the raw JSON object.";

const RESPONSE_SCHEMA: &str = r#"{
  "summary": "string — 2-3 sentence overview of the landscape",
  "vendors": [
    {
      "name": "string",
      "website": "string (full URL, e.g. https://example.com)",
      "summary": "string — 2-3 sentences about what this vendor offers",
      "score": number (0-100, weighted match against requirements),
      "priceRange": "string (e.g. '$9–$99/mo' or 'Contact for pricing')",
      "matchedFeatures": [
        {
          "requirement": "string (exact requirement text from the list above)",
          "matched": boolean,
          "detail": "string — one sentence explaining the match/miss"
        }
      ],
      "risks": ["string — one sentence per risk, 1-3 risks"],
      "evidenceLinks": [
        {
          "title": "string",
          "url": "string",
          "snippet": "string — 1 sentence"
        }
      ]
    }
  ],
  "recommendation": "string — 1-2 sentence top recommendation with reasoning"
}"#;

const RULES: &str = "Rules:
- Return 4-6 vendors, sorted by score descending.
- matchedFeatures must include one entry per requirement.
- evidenceLinks: 1-2 real, plausible links per vendor (pricing pages, docs, reviews).
- Be accurate with pricing and features. Do NOT invent features a vendor does not offer.
- Return ONLY the JSON object, no markdown fences or extra text.";

/// Build the user prompt for one shortlist request.
pub fn build_prompt(input: &ShortlistInput) -> String {
    let weight_lines = input
        .requirements
        .iter()
        .map(|r| format!("  - \"{r}\" (weight: {}/10)", input.weight(r)))
        .collect::<Vec<_>>()
        .join("\n");

    let exclude_line = if input.excluded_vendors.is_empty() {
        String::new()
    } else {
        format!(
            "\nExclude these vendors entirely: {}.",
            input.excluded_vendors.join(", ")
        )
    };

    format!(
        "You are a B2B vendor research analyst. A buyer needs help shortlisting vendors.

NEED: {need}

WEIGHTED REQUIREMENTS:
{weight_lines}
{exclude_line}

Return a JSON object matching this exact schema (no markdown, no extra text — raw JSON only):
{RESPONSE_SCHEMA}

{RULES}",
        need = input.need,
    )
}

/// Build the completion request sent to the provider.
pub fn build_request(input: &ShortlistInput, llm: &LlmConfig) -> CompletionRequest {
    CompletionRequest {
        model: llm.model.clone(),
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_prompt(input),
        max_tokens: llm.max_tokens,
        temperature: llm.temperature,
    }
}

/// Remove a surrounding markdown code fence (```json ... ```), if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text.trim()
}

/// Parse the model's answer into a [`ShortlistResult`].
///
/// Vendors the buyer excluded are dropped even if the model returned them,
/// and the remaining vendors are ordered by score, highest first.
pub fn parse_response(raw: &str, input: &ShortlistInput) -> Result<ShortlistResult, LlmError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(LlmError::InvalidResponse(
            "The model returned an empty response".to_string(),
        ));
    }

    let mut result: ShortlistResult = serde_json::from_str(cleaned).map_err(|e| {
        tracing::debug!(error = %e, "model response did not parse as a shortlist");
        LlmError::InvalidResponse(
            "The model response was not valid JSON. Please try again.".to_string(),
        )
    })?;

    result.vendors.retain(|vendor| {
        !input
            .excluded_vendors
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(vendor.name.trim()))
    });

    if result.vendors.is_empty() {
        return Err(LlmError::InvalidResponse(
            "The model returned no vendors. Please try again.".to_string(),
        ));
    }

    result.vendors.sort_by(|a, b| b.score.cmp(&a.score));
    result.generated_at = Some(Utc::now());
    result.quota_exhausted = None;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn input() -> ShortlistInput {
        ShortlistInput {
            need: "Customer support helpdesk".to_string(),
            requirements: vec!["Live chat".to_string(), "SLA tracking".to_string()],
            weights: BTreeMap::from([
                ("Live chat".to_string(), 8),
                ("SLA tracking".to_string(), 3),
            ]),
            excluded_vendors: vec!["Zendesk".to_string()],
        }
    }

    #[test]
    fn test_prompt_lists_weights_and_exclusions() {
        let prompt = build_prompt(&input());
        assert!(prompt.contains("NEED: Customer support helpdesk"));
        assert!(prompt.contains("  - \"Live chat\" (weight: 8/10)"));
        assert!(prompt.contains("  - \"SLA tracking\" (weight: 3/10)"));
        assert!(prompt.contains("Exclude these vendors entirely: Zendesk."));
        assert!(prompt.contains("\"matchedFeatures\""));
    }

    #[test]
    fn test_prompt_without_exclusions() {
        let mut input = input();
        input.excluded_vendors.clear();
        assert!(!build_prompt(&input).contains("Exclude these vendors"));
    }

    #[test]
    fn test_build_request_uses_config() {
        let llm = LlmConfig::default();
        let request = build_request(&input(), &llm);
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.max_tokens, 4096);
        assert_eq!(request.temperature, 0.3);
        assert!(request.prompt.contains("Customer support helpdesk"));
        assert!(request.system.contains("valid JSON"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```JSON {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_sorts_and_filters_excluded() {
        let raw = r#"```json
{
  "summary": "Crowded market.",
  "vendors": [
    {"name": "Freshdesk", "score": 71, "matchedFeatures": [], "risks": [], "evidenceLinks": []},
    {"name": "zendesk", "score": 95},
    {"name": "Help Scout", "score": 84.4, "priceRange": "$20/user/mo"}
  ],
  "recommendation": "Help Scout."
}
```"#;
        let result = parse_response(raw, &input()).unwrap();
        let names: Vec<&str> = result.vendors.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Help Scout", "Freshdesk"]);
        assert_eq!(result.vendors[0].score, 84);
        assert!(result.generated_at.is_some());
        assert!(result.quota_exhausted.is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_response("Here are some vendors: Acme", &input()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
        assert!(!err.is_quota_exhausted());
    }

    #[test]
    fn test_parse_rejects_empty_vendor_list() {
        let err = parse_response(r#"{"summary":"","vendors":[]}"#, &input()).unwrap_err();
        assert!(err.to_string().contains("no vendors"));

        let only_excluded = r#"{"vendors":[{"name":"Zendesk","score":90}]}"#;
        assert!(parse_response(only_excluded, &input()).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_response() {
        let err = parse_response("   ", &input()).unwrap_err();
        assert!(err.to_string().contains("empty response"));
    }
}
