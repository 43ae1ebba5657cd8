use proptest::prelude::*;

use civicfix_core::constants::normalize_label;
use civicfix_core::models::truncate_excerpt;

proptest! {
    #[test]
    fn excerpts_are_prefixes_within_the_limit(text in "\\PC{0,300}", max in 0usize..200) {
        let excerpt = truncate_excerpt(&text, max);
        prop_assert!(excerpt.chars().count() <= max);
        prop_assert!(text.starts_with(&excerpt));
        if text.chars().count() <= max {
            prop_assert_eq!(excerpt, text);
        }
    }

    #[test]
    fn normalized_labels_are_stable(raw in "[ \\tA-Za-z_]{0,40}") {
        let once = normalize_label(&raw);
        prop_assert_eq!(normalize_label(&once), once.clone());
        prop_assert!(!once.chars().any(char::is_whitespace));
        prop_assert!(!once.chars().any(|c| c.is_ascii_uppercase()));
    }
}
