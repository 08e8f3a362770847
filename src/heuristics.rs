use regex::Regex;
use std::sync::OnceLock;

fn unit_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)[0-9]+/?[0-9]*\s?(cup|oz|ounce|ounces|ml|tsp|tbsp|dash|part|parts|cl|g|grams|slice|slices)",
        )
        .expect("invalid unit regex")
    })
}

fn bullet_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-*•]").expect("invalid bullet regex"))
}

/// Counting classifier for recipe-shaped text: each line scores a hit for a
/// quantity+unit match and another for a leading bullet. Two hits or more
/// and the text is treated as a recipe.
pub fn looks_like_recipe(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let mut hits = 0;
    for line in text.split(['\n', '\r']) {
        if unit_line_re().is_match(line) {
            hits += 1;
        }
        if bullet_line_re().is_match(line) {
            hits += 1;
        }
        if hits >= 2 {
            return true;
        }
    }
    false
}

/// Candidate text fed to extraction: title and body joined by a blank line,
/// trimmed.
pub fn coalesce_text(title: &str, body: &str) -> String {
    format!("{}\n\n{}", title, body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_unit_line_and_one_bullet_is_a_recipe() {
        let text = "My drink\n2 oz rye whiskey\n- stir with ice";
        assert!(looks_like_recipe(text));
    }

    #[test]
    fn test_single_qualifying_line_is_not_a_recipe() {
        assert!(!looks_like_recipe("Try this\n2 oz gin\nshake well"));
        assert!(!looks_like_recipe("Try this\n- garnish with a twist"));
    }

    #[test]
    fn test_bulleted_unit_line_scores_twice() {
        // One line matching both patterns carries the text over the threshold
        assert!(looks_like_recipe("- 2 oz mezcal"));
    }

    #[test]
    fn test_unit_matching_is_case_insensitive() {
        assert!(looks_like_recipe("1 OZ Campari\n30 ML sweet vermouth"));
    }

    #[test]
    fn test_fraction_quantities_match() {
        assert!(looks_like_recipe("3/4 oz lemon juice\n1/2 oz simple syrup"));
    }

    #[test]
    fn test_unicode_bullet_matches() {
        assert!(looks_like_recipe("  • 2 dashes Angostura\n\t* 1 part soda"));
    }

    #[test]
    fn test_empty_and_prose_text_rejected() {
        assert!(!looks_like_recipe(""));
        assert!(!looks_like_recipe(
            "Went to a great bar last night and had an amazing drink."
        ));
    }

    #[test]
    fn test_coalesce_trims() {
        assert_eq!(coalesce_text("Title", "body"), "Title\n\nbody");
        assert_eq!(coalesce_text("", ""), "");
        assert_eq!(coalesce_text("Title", ""), "Title");
        assert_eq!(coalesce_text("", "body"), "body");
    }
}
