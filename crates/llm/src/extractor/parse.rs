//! Deterministic parsing of free-text model responses into item lists.

use std::collections::BTreeMap;

use rfp_core::analysis::Category;

/// Template lines the model sometimes echoes back verbatim.
const BOILERPLATE: [&str; 2] = ["list each requirement", "list each risk"];

/// Parse a combined response whose categories are introduced by header
/// lines (`=== RISK FACTORS ===`). Every category is present in the result.
pub fn parse_sectioned(text: &str) -> BTreeMap<Category, Vec<String>> {
    let mut sections: BTreeMap<Category, Vec<String>> =
        Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
    let mut current: Option<Category> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let upper = line.to_uppercase();
        if let Some(category) = Category::ALL.into_iter().find(|c| upper.contains(c.header())) {
            current = Some(category);
        }

        let Some(category) = current else { continue };
        if let Some(item) = bullet_item(line) {
            if let Some(items) = sections.get_mut(&category) {
                items.push(item);
            }
        }
    }
    sections
}

/// Every bullet line of a single-category response, in order.
pub fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(bullet_item)
        .collect()
}

/// The cleaned item of a `-` or `•` line, or `None` for anything else,
/// including empty bullets and echoed template text.
fn bullet_item(line: &str) -> Option<String> {
    if !(line.starts_with('-') || line.starts_with('•')) {
        return None;
    }
    let item = line
        .trim_start_matches(|c: char| c == '-' || c == '•' || c == ' ')
        .trim();
    if item.is_empty() {
        return None;
    }
    let lower = item.to_lowercase();
    if BOILERPLATE.iter().any(|b| lower.contains(b)) {
        return None;
    }
    Some(item.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bullets_under_eligibility() {
        let parsed = parse_sectioned("=== ELIGIBILITY REQUIREMENTS ===\n- item1\n- item2");
        assert_eq!(parsed[&Category::Eligibility], vec!["item1", "item2"]);
        assert!(parsed[&Category::Risks].is_empty());
        assert_eq!(parsed.len(), 4);
    }

    #[test]
    fn headers_switch_sections_case_insensitively() {
        let text = "\
Intro text the model added.
- ignored, no section yet
=== Eligibility Requirements ===
- Registered in the state
• ISO 9001 certified
Compliance requirements:
-   Must sign NDA
=== SUBMISSION REQUIREMENTS ===
  - PDF format only  
=== RISK FACTORS ===
- Unlimited liability
";
        let parsed = parse_sectioned(text);
        assert_eq!(
            parsed[&Category::Eligibility],
            vec!["Registered in the state", "ISO 9001 certified"]
        );
        assert_eq!(parsed[&Category::Compliance], vec!["Must sign NDA"]);
        assert_eq!(parsed[&Category::Submission], vec!["PDF format only"]);
        assert_eq!(parsed[&Category::Risks], vec!["Unlimited liability"]);
    }

    #[test]
    fn echoed_template_lines_and_empty_bullets_are_dropped() {
        let text = "\
=== ELIGIBILITY REQUIREMENTS ===
- [list each requirement on a new line starting with -]
-
- • 
- Valid license
=== RISK FACTORS ===
- [List Each Risk on a new line starting with -]
";
        let parsed = parse_sectioned(text);
        assert_eq!(parsed[&Category::Eligibility], vec!["Valid license"]);
        assert!(parsed[&Category::Risks].is_empty());
    }

    #[test]
    fn non_bullet_lines_are_ignored() {
        let parsed = parse_sectioned("=== RISK FACTORS ===\n* starred\n1. numbered\n-- dashed");
        assert_eq!(parsed[&Category::Risks], vec!["dashed"]);
    }

    #[test]
    fn bullets_without_headers() {
        let items = parse_bullets("Here you go:\n- first\n  • second\nnot a bullet\n- ");
        assert_eq!(items, vec!["first", "second"]);
        assert!(parse_bullets("No bullets at all.").is_empty());
    }
}
