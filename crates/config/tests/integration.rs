//! Integration tests for config

#[cfg(test)]
mod tests {
    use docaudit_config::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "DOCAUDIT_CONCURRENCY",
        "DOCAUDIT_TIMEOUT",
        "DOCAUDIT_MAX_ATTEMPTS",
        "DOCAUDIT_RETRY_DELAY_MS",
        "DOCAUDIT_BASE_URL",
        "DOCAUDIT_OUTPUT_DIR",
        "DOCAUDIT_STATES",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[verify]
concurrency = 12
timeout = 9
max_attempts = 4
retry_server_errors = true

[store]
base_url = "https://blobs.example.net/docs/"
suffix = ".txt"

[output]
dir = "/tmp/audit-out"

[input]
states = ["GA", "WV"]
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.verify.concurrency, 12);
        assert_eq!(config.verify.timeout, 9);
        assert_eq!(config.verify.max_attempts, 4);
        assert_eq!(config.verify.retry_delay_ms, 100);
        assert!(config.verify.retry_server_errors);
        assert_eq!(config.store.base_url, "https://blobs.example.net/docs/");
        assert_eq!(config.store.suffix, ".txt");
        assert_eq!(config.output.dir, PathBuf::from("/tmp/audit-out"));
        assert_eq!(config.input.states, vec!["GA", "WV"]);
        assert_eq!(config.input.id_column, "act_num");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = Config::load_from_file(std::path::Path::new("/nonexistent/docaudit.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            docaudit_errors::Error::Config(docaudit_errors::ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[verify\nconcurrency = ").unwrap();
        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            docaudit_errors::Error::Config(docaudit_errors::ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DOCAUDIT_CONCURRENCY", "8");
        std::env::set_var("DOCAUDIT_MAX_ATTEMPTS", "3");
        std::env::set_var("DOCAUDIT_STATES", "ny,pa");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.verify.concurrency, 8);
        assert_eq!(config.verify.max_attempts, 3);
        assert_eq!(config.input.states, vec!["NY", "PA"]);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("DOCAUDIT_TIMEOUT", "soon");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(matches!(
            result,
            Err(docaudit_errors::Error::Config(
                docaudit_errors::ConfigError::InvalidValue { .. }
            ))
        ));

        clear_env();
    }
}
