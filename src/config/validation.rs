use super::Config;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.gopass.binary.trim().is_empty() {
        errors.push(ConfigValidationError {
            path: "gopass.binary".to_string(),
            message: "gopass binary must not be empty".to_string(),
        });
    }

    if config.gopass.timeout_secs == 0 {
        errors.push(ConfigValidationError {
            path: "gopass.timeoutSecs".to_string(),
            message: "Timeout must be greater than 0".to_string(),
        });
    }

    if config.gopass.max_output_bytes == 0 {
        errors.push(ConfigValidationError {
            path: "gopass.maxOutputBytes".to_string(),
            message: "Output limit must be greater than 0".to_string(),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn reports_every_invalid_field() {
        let mut config = Config::default();
        config.gopass.binary = " ".into();
        config.gopass.timeout_secs = 0;
        config.gopass.max_output_bytes = 0;

        let paths: Vec<_> = validate_config(&config).into_iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            ["gopass.binary", "gopass.timeoutSecs", "gopass.maxOutputBytes"]
        );
    }
}
