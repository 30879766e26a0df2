    use super::*;

    #[test]
    fn test_validate_default_config() {
        let result = ConfigValidator::validate(&Config::default());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.dispatch.timeout_ms = 0;

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "dispatch.timeout_ms"));
    }

    #[test]
    fn test_validate_long_timeout_warning() {
        let mut config = Config::default();
        config.dispatch.timeout_ms = 2 * 60 * 60 * 1000;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "dispatch.timeout_ms"));
    }

    #[test]
    fn test_validate_interval_cap_below_initial() {
        let mut config = Config::default();
        config.dispatch.poll_interval_ms = 5_000;
        config.dispatch.max_poll_interval_ms = 1_000;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "dispatch.max_poll_interval_ms"));
    }

    #[test]
    fn test_validate_shrinking_backoff() {
        let mut config = Config::default();
        config.dispatch.poll_backoff = 0.5;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "dispatch.poll_backoff"));
    }

    #[test]
    fn test_validate_nan_backoff() {
        let mut config = Config::default();
        config.dispatch.poll_backoff = f64::NAN;

        assert!(!ConfigValidator::validate(&config).is_valid());
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut config = Config::default();
        config.resolver.fuzzy_threshold = 1.5;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "resolver.fuzzy_threshold"));
    }

    #[test]
    fn test_validate_zero_suggestions() {
        let mut config = Config::default();
        config.resolver.max_suggestions = 0;

        assert!(!ConfigValidator::validate(&config).is_valid());
    }

    #[test]
    fn test_validate_self_alias() {
        let mut config = Config::default();
        config
            .resolver
            .aliases
            .insert("loop".to_string(), "loop".to_string());

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "resolver.aliases.loop"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = Config::default();
        config.resolver.max_suggestions = 0;

        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        assert!(err.to_string().contains("resolver.max_suggestions"));
    }

    #[test]
    fn test_into_result_passes_warnings() {
        let mut config = Config::default();
        config.logging.level = "  ".to_string();

        let warnings = ConfigValidator::validate(&config).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "logging.level");
    }
