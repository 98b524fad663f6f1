//! Tests for rules file parsing and persistence

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use traitloom::ComposeError;
    use traitloom::io::rules_file::{RawExclusion, RawRequirement, RulesFile};
    use traitloom::rules::weight::Weight;

    const RULES: &str = r#"{
        "name": "Collection",
        "width": 1000,
        "breakdown": {
            "Species": { "Fox.png": { "baseValue": 60, "Background": { "Forest.png": 100 } } },
            "Background": { "Forest.png": 20, "Desert.png": 80 },
            "Hat": { "Crown.png": 5 }
        },
        "dnp": {
            "Hat": {
                "Crown.png": ["Desert"],
                "Tiara.png": { "attributesToExclude": ["Cape"], "Background": ["Forest.png"] }
            }
        },
        "need": {
            "Hat": {
                "Crown.png": ["King.png", "Queen.png"],
                "attributesToInclude": { "Species": [] }
            }
        },
        "required": {
            "Species": { "Fox": { "attributes": ["Background"] } }
        },
        "anchors": ["Species"],
        "preserve": "Species"
    }"#;

    // Verified by rejecting rendering keys the engine does not model
    #[test]
    fn test_unknown_keys_are_ignored() {
        let file = RulesFile::from_json(RULES).expect("rules parse");

        assert_eq!(file.breakdown.len(), 3);
        assert_eq!(file.anchors, vec!["Species".to_string()]);
        assert_eq!(file.preserve.as_deref(), Some("Species"));
        assert!(file.mirrors.is_empty());
    }

    // Verified by collapsing the untagged forms into one shape
    #[test]
    fn test_untagged_forms() {
        let file = RulesFile::from_json(RULES).expect("rules parse");

        let hat_dnp = &file.dnp["Hat"];
        assert!(matches!(hat_dnp["Crown.png"], RawExclusion::Patterns(_)));
        assert!(matches!(
            hat_dnp["Tiara.png"],
            RawExclusion::Targeted(_)
        ));

        let hat_need = &file.need["Hat"];
        assert!(matches!(hat_need["Crown.png"], RawRequirement::AnyOf(_)));
        assert!(matches!(
            hat_need["attributesToInclude"],
            RawRequirement::AllOf(_)
        ));

        assert!(matches!(
            file.breakdown.weight("Species", "Fox.png"),
            Some(Weight::Conditional(_))
        ));
        assert!(matches!(
            file.breakdown.weight("Hat", "Crown.png"),
            Some(Weight::Flat(_))
        ));
    }

    // Verified by omitting the breakdown default check
    #[test]
    fn test_breakdown_is_required() {
        assert!(RulesFile::from_json(r#"{ "dnp": {} }"#).is_err());
        assert!(RulesFile::from_json(r#"{ "breakdown": {} }"#).is_ok());
    }

    // Verified by dropping conditional weights on save
    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rules.json");
        let file = RulesFile::from_json(RULES).expect("rules parse");

        file.save(&path).expect("save succeeds");
        let reloaded = RulesFile::load(&path).expect("load succeeds");

        assert_eq!(reloaded, file);
    }

    // Verified by reporting the placeholder path
    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");

        match RulesFile::load(&path) {
            Err(ComposeError::FileSystem { path: reported, .. }) => {
                assert_eq!(reported, path);
            }
            other => unreachable!("Expected FileSystem error, got {other:?}"),
        }
    }

    // Verified by reporting parse errors as file system errors
    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ breakdown").expect("write fixture");

        match RulesFile::load(&path) {
            Err(ComposeError::ConfigLoad { path: reported, .. }) => {
                assert_eq!(reported, PathBuf::from(&path));
            }
            other => unreachable!("Expected ConfigLoad error, got {other:?}"),
        }
    }
}
