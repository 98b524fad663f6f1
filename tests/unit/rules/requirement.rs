//! Tests for requirement rules

#[cfg(test)]
mod tests {
    use traitloom::algorithm::composition::Violation;
    use traitloom::io::rules_file::RulesFile;
    use traitloom::rules::{RuleSet, Validation};
    use traitloom::Composition;

    const RULES: &str = r#"{
        "breakdown": {
            "Hat": { "Crown.png": 50, "Helmet.png": 50, "Cap.png": 0 },
            "Role": { "Royal_King.png": 50, "Peasant.png": 50 },
            "Cape": { "Red.png": 100 },
            "Species": { "Robot.png": 50, "Fox.png": 50 },
            "Background": { "Blue.png": 100 }
        },
        "need": {
            "Hat": {
                "Crown.png": ["Royal.*", "Cape"],
                "Helmet.png": { "Species": ["Robot.png"], "Background": [] }
            },
            "Cape": { "attributesToInclude": { "Species": [] } }
        }
    }"#;

    fn rules() -> RuleSet {
        let file = RulesFile::from_json(RULES).expect("rules parse");
        RuleSet::compile(&file, Validation::Strict).expect("rules compile")
    }

    fn composition(pairs: &[(&str, &str)]) -> Composition {
        pairs.iter().copied().collect()
    }

    // Verified by requiring every listed identifier
    #[test]
    fn test_any_of_needs_one_match() {
        let rules = rules();

        let alone = composition(&[("Hat", "Crown.png")]);
        assert!(!rules.requirements.need_satisfied(&alone, "Hat", "Crown.png"));

        let royal = composition(&[("Hat", "Crown.png"), ("Role", "Royal_King.png")]);
        assert!(rules.requirements.need_satisfied(&royal, "Hat", "Crown.png"));

        let caped = composition(&[("Hat", "Crown.png"), ("Cape", "Red.png"), ("Species", "Fox.png")]);
        assert!(rules.requirements.need_satisfied(&caped, "Hat", "Crown.png"));
    }

    // Verified by treating the category map as a logical OR
    #[test]
    fn test_all_of_needs_every_category() {
        let rules = rules();

        let partial = composition(&[("Hat", "Helmet.png"), ("Species", "Robot.png")]);
        assert!(!rules.requirements.need_satisfied(&partial, "Hat", "Helmet.png"));

        let wrong = composition(&[
            ("Hat", "Helmet.png"),
            ("Species", "Fox.png"),
            ("Background", "Blue.png"),
        ]);
        assert!(!rules.requirements.need_satisfied(&wrong, "Hat", "Helmet.png"));

        let full = composition(&[
            ("Hat", "Helmet.png"),
            ("Species", "Robot.png"),
            ("Background", "Blue.png"),
        ]);
        assert!(rules.requirements.need_satisfied(&full, "Hat", "Helmet.png"));
    }

    // Verified by attaching attributesToInclude to a literal option key
    #[test]
    fn test_category_level_requirement() {
        let rules = rules();

        let cape = composition(&[("Cape", "Red.png")]);
        assert!(!rules.requirements.need_satisfied(&cape, "Cape", "Red.png"));

        let with_species = composition(&[("Cape", "Red.png"), ("Species", "Fox.png")]);
        assert!(rules.requirements.need_satisfied(&with_species, "Cape", "Red.png"));
    }

    // Verified by failing options without rules
    #[test]
    fn test_absent_rule_is_vacuous() {
        let rules = rules();
        let cap = composition(&[("Hat", "Cap.png")]);
        assert!(rules.requirements.need_satisfied(&cap, "Hat", "Cap.png"));
        assert!(rules.requirements.need_satisfied(&cap, "Role", "Peasant.png"));
    }

    // Verified by reporting the satisfied selection
    #[test]
    fn test_first_unmet_names_the_demanding_option() {
        let rules = rules();
        let unmet = composition(&[("Hat", "Crown.png"), ("Role", "Peasant.png")]);

        assert_eq!(
            rules.requirements.first_unmet(&unmet),
            Some(Violation::Unmet {
                category: "Hat".to_string(),
                option: "Crown.png".to_string(),
            })
        );
    }

    // Verified by requiring bare names to equal the whole option name
    #[test]
    fn test_bare_name_satisfies_requirement() {
        let file = RulesFile::from_json(
            r#"{
                "breakdown": {
                    "Species": { "Owl.png": 50, "Fox.png": 50 },
                    "Hat": { "Gold_Helm.png": 100 }
                },
                "need": { "Hat": { "Gold_Helm.png": ["Owl"] } }
            }"#,
        )
        .expect("rules parse");
        let rules = RuleSet::compile(&file, Validation::Strict).expect("rules compile");

        let owl = composition(&[("Species", "Owl.png"), ("Hat", "Gold_Helm.png")]);
        assert!(rules.requirements.need_satisfied(&owl, "Hat", "Gold_Helm.png"));

        let fox = composition(&[("Species", "Fox.png"), ("Hat", "Gold_Helm.png")]);
        assert!(!rules.requirements.need_satisfied(&fox, "Hat", "Gold_Helm.png"));
    }
}
