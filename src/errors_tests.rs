//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::VecRagError;

    #[test]
    fn test_custom_error() {
        let error = VecRagError::Custom("Test error message".to_string());
        assert_eq!(format!("{error}"), "Test error message");
    }

    #[test]
    fn test_config_error() {
        let error = VecRagError::ConfigError("missing [database] section".to_string());
        assert!(matches!(error, VecRagError::ConfigError(_)));
        assert!(format!("{error}").contains("configuration"));
    }

    #[test]
    fn test_model_not_found_names_the_model() {
        let error = VecRagError::ModelNotFound("gpt-4".to_string());
        assert_eq!(
            format!("{error}"),
            "No running deployment found for model 'gpt-4'"
        );
    }

    #[test]
    fn test_llm_and_embedding_errors() {
        let llm = VecRagError::LlmError("empty choices".to_string());
        let embedding = VecRagError::EmbeddingError("dimension mismatch".to_string());
        assert!(format!("{llm}").starts_with("LLM error"));
        assert!(format!("{embedding}").starts_with("Embedding error"));
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: VecRagError = io_err.into();
        assert!(matches!(err, VecRagError::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: VecRagError = toml_err.into();
        assert!(matches!(err, VecRagError::TomlParsing(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: VecRagError = json_err.into();
        assert!(matches!(err, VecRagError::Serialization(_)));
    }

    #[test]
    fn test_error_from_url() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: VecRagError = url_err.into();
        assert!(matches!(err, VecRagError::Url(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn read_missing() -> crate::Result<String> {
            let content = std::fs::read_to_string("/definitely/not/here.toml")?;
            Ok(content)
        }

        assert!(matches!(read_missing(), Err(VecRagError::Io(_))));
    }
}
