//! Recipe header fields derived from a scraped document.

use html_escape::encode_text;
use serde_json::Value;

use crate::model::RecipeDocument;

/// `"{title} ({host} - {author})"`, dropping whichever of host and author is unknown.
pub fn default_recipe_name(doc: &RecipeDocument) -> String {
    let origin: Vec<&str> = [doc.host.as_deref(), doc.author.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let title = doc.title.trim();
    if origin.is_empty() {
        title.to_string()
    } else {
        format!("{} ({})", title, origin.join(" - "))
    }
}

/// HTML description: directions, nutrition table, then provenance.
pub fn build_description(doc: &RecipeDocument) -> String {
    let mut html = String::new();
    for step in &doc.instructions_list {
        html.push_str(&format!("<p>{}</p>", encode_text(step.trim())));
    }

    if !doc.nutrients.is_empty() {
        html.push_str("<p>Nutrition Facts</p><table>");
        for (key, value) in &doc.nutrients {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                encode_text(key),
                encode_text(&plain(value))
            ));
        }
        html.push_str("</table>");
    }

    if let Some(source) = &doc.canonical_url {
        html.push_str(&format!("<p>Source: {}</p>", encode_text(source)));
    }
    if let Some(category) = &doc.category {
        html.push_str(&format!("<p>Category: {}</p>", encode_text(category)));
    }
    if let Some(minutes) = doc.total_time.as_ref().filter(|v| !v.is_null()) {
        html.push_str(&format!(
            "<p>Total minutes: {} minutes</p>",
            encode_text(&plain(minutes))
        ));
    }
    html
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Servings from a yield such as `"4 servings"`; the first positive integer wins.
pub fn parse_servings(yields: &str) -> Option<u32> {
    let lowered = yields.to_lowercase();
    let stripped = lowered.replace("servings", "").replace("serving", "");
    stripped
        .split_whitespace()
        .find_map(|token| token.parse::<u32>().ok())
        .filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn document() -> RecipeDocument {
        let mut nutrients = BTreeMap::new();
        nutrients.insert("calories".to_string(), Value::String("250 kcal".to_string()));
        nutrients.insert("fat".to_string(), serde_json::json!(12));
        RecipeDocument {
            title: "Pancakes".to_string(),
            author: Some("Jane".to_string()),
            host: Some("example.com".to_string()),
            canonical_url: Some("https://example.com/pancakes?a=1&b=2".to_string()),
            category: Some("Breakfast".to_string()),
            total_time: Some(serde_json::json!(25)),
            yields: Some("4 servings".to_string()),
            instructions_list: vec!["Mix <everything>.".to_string(), "Fry.".to_string()],
            nutrients,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_name() {
        let mut doc = document();
        assert_eq!(default_recipe_name(&doc), "Pancakes (example.com - Jane)");
        doc.author = None;
        assert_eq!(default_recipe_name(&doc), "Pancakes (example.com)");
        doc.host = None;
        assert_eq!(default_recipe_name(&doc), "Pancakes");
    }

    #[test]
    fn test_description_is_escaped() {
        let html = build_description(&document());
        assert!(html.starts_with("<p>Mix &lt;everything&gt;.</p><p>Fry.</p>"));
        assert!(html.contains("<tr><td>calories</td><td>250 kcal</td></tr>"));
        assert!(html.contains("<tr><td>fat</td><td>12</td></tr>"));
        assert!(html.contains("<p>Source: https://example.com/pancakes?a=1&amp;b=2</p>"));
        assert!(html.contains("<p>Category: Breakfast</p>"));
        assert!(html.ends_with("<p>Total minutes: 25 minutes</p>"));
    }

    #[test]
    fn test_description_skips_missing_sections() {
        let doc = RecipeDocument {
            title: "Toast".to_string(),
            ..Default::default()
        };
        assert_eq!(build_description(&doc), "");
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(parse_servings("4 servings"), Some(4));
        assert_eq!(parse_servings("1 Serving"), Some(1));
        assert_eq!(parse_servings("12"), Some(12));
        assert_eq!(parse_servings("6 to 8 servings"), Some(6));
        assert_eq!(parse_servings("a crowd"), None);
        assert_eq!(parse_servings("0 servings"), None);
    }
}
