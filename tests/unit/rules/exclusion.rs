//! Tests for do-not-pair rule compilation and checks

#[cfg(test)]
mod tests {
    use traitloom::algorithm::composition::Violation;
    use traitloom::io::rules_file::RulesFile;
    use traitloom::rules::{RuleSet, Validation};
    use traitloom::{ComposeError, Composition};

    const RULES: &str = r#"{
        "breakdown": {
            "Background": { "Blue.png": 50, "Red.png": 50 },
            "Eyes": { "Laser_Red.png": 50, "Normal.png": 50 },
            "Hat": { "Crown.png": 100 },
            "Mouth": { "Smile.png": 100 },
            "Species": { "Robot_A.png": 50, "Fox.png": 50 },
            "Cheeks": { "Blush.png": 100 }
        },
        "dnp": {
            "Background": {
                "Blue.png": {
                    "Eyes": ["Laser.*"],
                    "Hat": ["*"],
                    "attributesToExclude": ["Mouth"]
                }
            },
            "Species": { "^Robot": ["blush.png"] }
        }
    }"#;

    fn rules() -> RuleSet {
        let file = RulesFile::from_json(RULES).expect("rules parse");
        RuleSet::compile(&file, Validation::Strict).expect("rules compile")
    }

    fn blue() -> Composition {
        [("Background", "Blue.png")].into_iter().collect()
    }

    // Verified by ignoring the attributesToExclude list
    #[test]
    fn test_category_forbidden_by_wildcard_and_attribute_list() {
        let rules = rules();
        let composition = blue();

        assert!(rules.exclusions.category_forbidden(&composition, "Hat"));
        assert!(rules.exclusions.category_forbidden(&composition, "Mouth"));
        assert!(!rules.exclusions.category_forbidden(&composition, "Eyes"));
        assert!(
            !rules
                .exclusions
                .category_forbidden(&Composition::new(), "Hat")
        );
    }

    // Verified by matching the pattern against the category name only
    #[test]
    fn test_option_forbidden_by_targeted_pattern() {
        let rules = rules();
        let composition = blue();

        assert!(
            rules
                .exclusions
                .option_forbidden(&composition, "Eyes", "laser_red.png")
        );
        assert!(
            !rules
                .exclusions
                .option_forbidden(&composition, "Eyes", "Normal.png")
        );
        assert!(
            rules
                .exclusions
                .option_forbidden(&composition, "Hat", "Crown.png")
        );
    }

    // Verified by requiring exact keys instead of regex keys
    #[test]
    fn test_regex_keyed_rule_applies_to_every_category() {
        let rules = rules();
        let composition: Composition = [("Species", "Robot_A.png")].into_iter().collect();

        assert!(
            rules
                .exclusions
                .option_forbidden(&composition, "Cheeks", "Blush.png")
        );

        let fox: Composition = [("Species", "Fox.png")].into_iter().collect();
        assert!(!rules.exclusions.option_forbidden(&fox, "Cheeks", "Blush.png"));
    }

    // Verified by including the slot being filled in the scan
    #[test]
    fn test_slot_being_filled_is_ignored() {
        let rules = rules();
        assert!(
            !rules
                .exclusions
                .option_forbidden(&blue(), "Background", "Blue.png")
        );
    }

    // Verified by only checking rules of earlier selections
    #[test]
    fn test_first_violation_reports_owner() {
        let rules = rules();
        let composition: Composition = [("Background", "Blue.png"), ("Eyes", "Laser_Red.png")]
            .into_iter()
            .collect();

        assert_eq!(
            rules.exclusions.first_violation(&composition),
            Some(Violation::Excluded {
                by_category: "Background".to_string(),
                by_option: "Blue.png".to_string(),
                category: "Eyes".to_string(),
                option: "Laser_Red.png".to_string(),
            })
        );

        let clean: Composition = [("Background", "Red.png"), ("Eyes", "Laser_Red.png")]
            .into_iter()
            .collect();
        assert_eq!(rules.exclusions.first_violation(&clean), None);
    }

    // Verified by accepting wildcards in flat lists
    #[test]
    fn test_wildcard_in_flat_list_is_rejected() {
        let file = RulesFile::from_json(
            r#"{
                "breakdown": { "A": { "x": 100 } },
                "dnp": { "A": { "x": ["*"] } }
            }"#,
        )
        .expect("rules parse");

        assert!(matches!(
            RuleSet::compile(&file, Validation::Lenient),
            Err(ComposeError::Configuration { .. })
        ));
    }

    // Verified by requiring bare names to equal the whole option name
    #[test]
    fn test_bare_name_excludes_file_option() {
        let file = RulesFile::from_json(
            r#"{
                "breakdown": { "Species": { "Fox.png": 100 }, "Hat": { "Crown.png": 100 } },
                "dnp": { "Species": { "Fox.png": { "Hat": ["Crown"] } } }
            }"#,
        )
        .expect("rules parse");
        let rules = RuleSet::compile(&file, Validation::Strict).expect("rules compile");
        let fox: Composition = [("Species", "Fox.png")].into_iter().collect();

        assert!(rules.exclusions.option_forbidden(&fox, "Hat", "Crown.png"));

        let both: Composition = [("Species", "Fox.png"), ("Hat", "Crown.png")]
            .into_iter()
            .collect();
        assert!(rules.exclusions.first_violation(&both).is_some());
    }

    // Verified by flagging bare keys that only match by pattern
    #[test]
    fn test_bare_key_is_a_known_option() {
        let file = RulesFile::from_json(
            r#"{
                "breakdown": { "Species": { "Fox.png": 100 }, "Hat": { "Crown.png": 100 } },
                "dnp": { "Species": { "Fox": ["Crown"] } }
            }"#,
        )
        .expect("rules parse");
        let rules = RuleSet::compile(&file, Validation::Strict).expect("bare key is known");
        let fox: Composition = [("Species", "Fox.png")].into_iter().collect();

        assert!(rules.exclusions.option_forbidden(&fox, "Hat", "Crown.png"));
    }
}
