use rfp_core::analysis::Category;

/// One prompt asking for all four categories under fixed headers.
pub fn combined_prompt(rfp_text: &str) -> String {
    let mut prompt =
        String::from("Analyze this RFP and list requirements in these exact sections:\n\n");
    for category in Category::ALL {
        let noun = match category {
            Category::Risks => "risk",
            _ => "requirement",
        };
        prompt.push_str(&format!(
            "=== {} ===\n- [list each {noun} on a new line starting with -]\n\n",
            category.header()
        ));
    }
    prompt.push_str("RFP Text:\n");
    prompt.push_str(rfp_text);
    prompt
}

/// A prompt for a single category's question.
pub fn category_prompt(rfp_text: &str, category: Category) -> String {
    format!(
        "Analyze the following RFP text and answer the query:\n\n\
         RFP Text:\n{rfp_text}\n\n\
         Query:\n{}\n\n\
         Please provide a detailed analysis focused specifically on the query. \
         List each finding on a new line starting with -.",
        category.question()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_prompt_lists_every_header_in_order() {
        let prompt = combined_prompt("THE RFP");
        let positions: Vec<usize> = Category::ALL
            .iter()
            .map(|c| prompt.find(&format!("=== {} ===", c.header())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.contains("- [list each risk on a new line starting with -]"));
        assert!(prompt.ends_with("RFP Text:\nTHE RFP"));
    }

    #[test]
    fn category_prompt_embeds_question() {
        let prompt = category_prompt("doc", Category::Submission);
        assert!(prompt.contains("RFP Text:\ndoc"));
        assert!(prompt.contains(Category::Submission.question()));
    }
}
