use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_QUERY_PARAM: &str = "g";

/// Where share links point and which query parameter carries the game token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub query_param: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `CHESS_LINK_BASE_URL` and `CHESS_LINK_PARAM`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            base_url: non_empty("CHESS_LINK_BASE_URL").unwrap_or(defaults.base_url),
            query_param: non_empty("CHESS_LINK_PARAM").unwrap_or(defaults.query_param),
        }
    }

    /// Link for a game token. Tokens are base64url, so they need no escaping.
    pub fn share_url(&self, token: &str) -> String {
        if token.is_empty() {
            return self.base_url.clone();
        }
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.base_url, separator, self.query_param, token)
    }
}
