//! Project-wide constants.

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Base URL of the Gemini REST API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Requests allowed per client within one rate-limit window.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;

/// Rate-limit window length (15 minutes).
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

/// Rejection message sent verbatim when a client exceeds the rate limit.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Curriculum name reported in response metadata.
pub const CURRICULUM_NAME: &str = "Kenyan CBC (Competency-Based Curriculum)";

/// Status text returned by the health endpoints.
pub const HEALTH_MESSAGE: &str = "Somo CBC content relay is running";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!AUTHOR.is_empty());
        assert!(!VERSION.is_empty());
        assert!(!DEFAULT_MODEL.is_empty());
        assert!(!RATE_LIMIT_MESSAGE.is_empty());
    }

    #[test]
    fn consts_from_cargo_toml() {
        assert!(AUTHOR.contains("Somo"));
    }

    #[test]
    fn default_window_is_fifteen_minutes() {
        assert_eq!(DEFAULT_RATE_LIMIT_WINDOW_SECS, 900);
    }
}
