//! Application configuration loaded from environment variables.

/// Storefront configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `EVENTPRO_API_URL` — cart service base URL (default: `"http://localhost:8080"`)
/// - `EVENTPRO_CART_PATH` — guest cart file (default: `"eventpro-cart.json"`)
/// - `EVENTPRO_TOKEN` — optional bearer token for an already-authenticated session
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub cart_path: String,
    pub token: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("EVENTPRO_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            cart_path: std::env::var("EVENTPRO_CART_PATH")
                .unwrap_or_else(|_| "eventpro-cart.json".to_string()),
            token: std::env::var("EVENTPRO_TOKEN").ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            cart_path: "eventpro-cart.json".to_string(),
            token: None,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.cart_path, "eventpro-cart.json");
        assert_eq!(config.token, None);
        assert_eq!(config.log_level, "info");
    }
}
