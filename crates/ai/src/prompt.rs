//! Copywriter prompt and strict output parsing.

use serde::Deserialize;

use crate::generator::{ContentRequest, GeneratedContent, GenerationError};

pub fn build_prompt(request: &ContentRequest) -> String {
    let lang = request.language.target_language();
    format!(
        "You are an expert E-commerce Copywriter for a Shopify store.\n\
         \n\
         Task: Optimize the following raw product data from a wholesaler into high-converting, SEO-friendly content in {lang}.\n\
         \n\
         Raw Data:\n\
         - Product: {title}\n\
         - Raw Description: {description}\n\
         - Price: {price} EUR\n\
         \n\
         Requirements:\n\
         1. Title: Create a catchy, SEO-friendly title in {lang} (max 70 chars).\n\
         2. Description: Write a persuasive HTML product description in {lang} (approx 100 words) with bullet points for features.\n\
         3. Category: Suggest the best Shopify Product Taxonomy category (in English or German, whichever is standard for Shopify).\n\
         \n\
         Output strictly valid JSON with keys: \"title\", \"description\", \"category\". Do not wrap in markdown.\n",
        title = request.raw_title,
        description = request.raw_description,
        price = request.sell_price,
    )
}

#[derive(Deserialize)]
struct RawOutput {
    title: String,
    description: String,
    category: String,
}

/// Parse the model's JSON answer. All three keys must be present strings.
pub fn parse_generated(text: &str) -> Result<GeneratedContent, GenerationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let raw: RawOutput =
        serde_json::from_str(text).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    if raw.title.trim().is_empty() {
        return Err(GenerationError::Malformed("empty title".to_string()));
    }
    Ok(GeneratedContent {
        title: raw.title,
        description: raw.description,
        category: raw.category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn request(language: Language) -> ContentRequest {
        ContentRequest {
            raw_title: "Gaming Mouse 2400DPI RGB Led".to_string(),
            raw_description: "Wired USB mouse. 5 buttons. Black color.".to_string(),
            sell_price: 22.0,
            language,
        }
    }

    #[test]
    fn prompt_carries_raw_data_and_language() {
        let prompt = build_prompt(&request(Language::De));
        assert!(prompt.contains("- Product: Gaming Mouse 2400DPI RGB Led"));
        assert!(prompt.contains("- Price: 22 EUR"));
        assert!(prompt.contains("SEO-friendly content in German."));
        assert!(prompt.contains("\"title\", \"description\", \"category\""));
    }

    #[test]
    fn prompt_for_english() {
        let prompt = build_prompt(&request(Language::En));
        assert!(prompt.contains("title in English (max 70 chars)"));
    }

    #[test]
    fn parses_valid_output() {
        let content = parse_generated(
            r#"{"title":"RGB Gaming Maus","description":"<ul><li>2400 DPI</li></ul>","category":"Elektronik > Mäuse"}"#,
        )
        .unwrap();
        assert_eq!(content.title, "RGB Gaming Maus");
        assert_eq!(content.category, "Elektronik > Mäuse");
    }

    #[test]
    fn rejects_missing_keys_and_markdown() {
        assert!(matches!(
            parse_generated(r#"{"title":"x","description":"y"}"#),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_generated("```json\n{}\n```"),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(parse_generated("  "), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn rejects_non_string_fields() {
        assert!(matches!(
            parse_generated(r#"{"title":1,"description":"y","category":"z"}"#),
            Err(GenerationError::Malformed(_))
        ));
    }
}
