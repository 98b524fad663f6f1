//! Tests for error formatting and path context

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::{Path, PathBuf};
    use traitloom::ComposeError;
    use traitloom::algorithm::composition::Violation;
    use traitloom::io::error::{WithContext, configuration_error, invalid_parameter};

    // Verified by leaving the placeholder path in place
    #[test]
    fn test_with_path_fills_file_system_errors() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));

        match result.with_path(Path::new("rules.json"), "read rules") {
            Err(ComposeError::FileSystem {
                path, operation, ..
            }) => {
                assert_eq!(path, PathBuf::from("rules.json"));
                assert_eq!(operation, "read rules");
            }
            other => unreachable!("Expected FileSystem error, got {other:?}"),
        }
    }

    // Verified by mapping JSON errors to file system errors
    #[test]
    fn test_with_path_fills_parse_errors() {
        let parsed: Result<u32, serde_json::Error> = serde_json::from_str("not json");
        let error = parsed
            .with_path(Path::new("bad.json"), "parse rules")
            .expect_err("parse fails");

        assert!(error.to_string().contains("bad.json"));
        assert!(error.source().is_some());
    }

    // Verified by dropping the last violation from the message
    #[test]
    fn test_unsatisfiable_message() {
        let error = ComposeError::ConstraintUnsatisfiable {
            attempts: 12,
            last_violation: Some(Violation::Exhausted {
                category: "B".to_string(),
            }),
        };
        let message = error.to_string();
        assert!(message.contains("12 attempts"));
        assert!(message.contains("B"));
        assert!(error.source().is_none());
    }

    // Verified by joining issues without separators
    #[test]
    fn test_helpers() {
        let issue = configuration_error("unknown category 'Hat'");
        assert_eq!(
            issue.to_string(),
            "Invalid rule configuration: unknown category 'Hat'"
        );

        let parameter = invalid_parameter("max_redraws", &0, &"must be positive");
        assert_eq!(
            parameter.to_string(),
            "Invalid parameter 'max_redraws' = '0': must be positive"
        );
    }
}
