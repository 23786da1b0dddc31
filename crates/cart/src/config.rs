//! Cart configuration loaded from environment variables.

/// Default name the cart is stored under within a session.
pub const DEFAULT_CART_NAME: &str = "cart.session";

/// Cart configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `CART_SESSION_NAME` — storage name within the session (default: `"cart.session"`)
/// - `CART_LOG_LEVEL`, then `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct CartConfig {
    pub session_name: String,
    pub log_level: String,
}

impl CartConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            session_name: non_empty("CART_SESSION_NAME")
                .unwrap_or_else(|| DEFAULT_CART_NAME.to_string()),
            log_level: non_empty("CART_LOG_LEVEL")
                .or_else(|| non_empty("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            session_name: DEFAULT_CART_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = CartConfig::default();
        assert_eq!(config.session_name, "cart.session");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = CartConfig::from_lookup(lookup(&[]));
        assert_eq!(config.session_name, DEFAULT_CART_NAME);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_SESSION_NAME", "wishlist"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(config.session_name, "wishlist");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_cart_log_level_wins_over_rust_log() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_LOG_LEVEL", "cart=trace"),
            ("RUST_LOG", "warn"),
        ]));
        assert_eq!(config.log_level, "cart=trace");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = CartConfig::from_lookup(lookup(&[("CART_SESSION_NAME", "  ")]));
        assert_eq!(config.session_name, DEFAULT_CART_NAME);
    }
}
