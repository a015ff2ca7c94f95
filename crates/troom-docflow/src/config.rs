//! Document flow configuration.

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default lifetime of generated secure view URLs, in hours.
pub const DEFAULT_SECURE_URL_EXPIRY_HOURS: u32 = 24;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Tunable settings for [`DocumentFlowService`](crate::DocumentFlowService).
#[derive(Debug, Clone)]
pub struct DocflowConfig {
    /// How long generated secure view URLs stay valid, in hours.
    pub secure_url_expiry_hours: u32,
}

impl DocflowConfig {
    /// Construct a config with explicit settings.
    pub fn new(secure_url_expiry_hours: u32) -> Self {
        Self {
            secure_url_expiry_hours,
        }
    }

    /// Read settings from the environment, falling back to defaults for
    /// anything unset or unparsable.
    ///
    /// Recognized variables:
    /// - `TROOM_SECURE_URL_EXPIRY_HOURS`
    pub fn from_env() -> Self {
        let secure_url_expiry_hours = std::env::var("TROOM_SECURE_URL_EXPIRY_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SECURE_URL_EXPIRY_HOURS);
        Self {
            secure_url_expiry_hours,
        }
    }
}

impl Default for DocflowConfig {
    fn default() -> Self {
        Self {
            secure_url_expiry_hours: DEFAULT_SECURE_URL_EXPIRY_HOURS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_expiry_is_one_day() {
        let config = DocflowConfig::default();
        assert_eq!(config.secure_url_expiry_hours, 24);
    }

    #[test]
    fn new_overrides_expiry() {
        let config = DocflowConfig::new(72);
        assert_eq!(config.secure_url_expiry_hours, 72);
    }

    #[test]
    fn from_env_falls_back_on_missing_variable() {
        // The variable is not set in the test environment.
        let config = DocflowConfig::from_env();
        assert_eq!(
            config.secure_url_expiry_hours,
            DEFAULT_SECURE_URL_EXPIRY_HOURS
        );
    }
}
