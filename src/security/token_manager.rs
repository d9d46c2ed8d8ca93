//! Secure token manager with memory-safe handling and masking capabilities
//!
//! This module resolves the PyPI upload token and keeps it out of logs,
//! using the `secrecy` crate to prevent accidental exposure in console
//! output or memory dumps.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Environment variables consulted for the upload token, in priority order.
///
/// `TWINE_PASSWORD` is what twine itself reads, so operators that already
/// export it need no extra setup.
const TOKEN_ENV_VARS: &[&str] = &["PYPI_TOKEN", "TWINE_PASSWORD"];

/// Secure token manager for index authentication
///
/// # Examples
///
/// ```
/// use warehouse_publisher::security::SecureTokenManager;
///
/// let manager = SecureTokenManager::new();
/// if let Some(_token) = manager.resolve(None) {
///     println!("token found in the environment");
/// }
/// ```
pub struct SecureTokenManager {
    env_vars: Vec<String>,
}

impl Default for SecureTokenManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureTokenManager {
    /// Creates a new SecureTokenManager with the default environment sources
    pub fn new() -> Self {
        let env_vars = TOKEN_ENV_VARS.iter().map(|v| v.to_string()).collect();

        Self { env_vars }
    }

    /// Resolves the upload token: an explicit value wins, then the
    /// environment sources in priority order.
    ///
    /// Empty explicit values are ignored so `--token ""` cannot silently
    /// produce a blank credential.
    pub fn resolve(&self, explicit: Option<&str>) -> Option<SecretString> {
        if let Some(token) = explicit
            && !token.is_empty()
        {
            return Some(SecretString::new(token.to_string().into()));
        }

        self.get_token()
    }

    /// Retrieves the token from environment variables only
    ///
    /// Returns `None` when no source is set.
    pub fn get_token(&self) -> Option<SecretString> {
        for var in &self.env_vars {
            if let Ok(value) = env::var(var)
                && !value.is_empty()
            {
                return Some(SecretString::new(value.into()));
            }
        }
        None
    }

    /// Checks if any token source is set in the environment
    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// Masks a token for safe logging
    ///
    /// Shows only the first 3 and last 3 characters for identification
    /// purposes. Tokens shorter than 10 characters are fully masked as "****".
    ///
    /// # Examples
    ///
    /// ```
    /// use warehouse_publisher::security::SecureTokenManager;
    ///
    /// let manager = SecureTokenManager::new();
    /// assert_eq!(manager.mask_token("pypi-tokenvalue123"), "pyp...123");
    /// assert_eq!(manager.mask_token("short"), "****");
    /// ```
    pub fn mask_token(&self, token: &str) -> String {
        // Counted in characters, not bytes: tokens are operator input and
        // byte-indexed slicing would panic inside a multibyte character
        let char_count = token.chars().count();
        if char_count < 10 {
            return "****".to_string();
        }

        let prefix: String = token.chars().take(3).collect();
        let suffix: String = token.chars().skip(char_count - 3).collect();
        format!("{}...{}", prefix, suffix)
    }

    /// Masks one known secret value everywhere it appears in a string
    pub fn mask_value_in_string(&self, text: &str, secret: &str) -> String {
        if secret.is_empty() {
            return text.to_string();
        }

        let escaped = regex::escape(secret);
        match Regex::new(&escaped) {
            Ok(regex) => {
                let masked = self.mask_token(secret);
                regex.replace_all(text, masked.as_str()).to_string()
            }
            Err(_) => text.to_string(),
        }
    }

    /// Masks all tokens found in the environment sources in a string
    ///
    /// Scans the input for any configured token value and replaces it with
    /// a masked version, so subprocess diagnostics can be echoed safely.
    pub fn mask_tokens_in_string(&self, text: &str) -> String {
        let mut masked = text.to_string();

        for var in &self.env_vars {
            if let Ok(value) = env::var(var)
                && !value.is_empty()
            {
                masked = self.mask_value_in_string(&masked, &value);
            }
        }

        masked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit_token() {
        let manager = SecureTokenManager::new();
        let token = manager.resolve(Some("pypi-explicit-token-value"));
        assert_eq!(
            token.unwrap().expose_secret(),
            "pypi-explicit-token-value"
        );
    }

    #[test]
    fn test_resolve_ignores_empty_explicit_token() {
        let manager = SecureTokenManager::new();
        // Falls through to the environment; with a blank explicit value the
        // result must never be an empty credential.
        if let Some(token) = manager.resolve(Some("")) {
            assert!(!token.expose_secret().is_empty());
        }
    }

    // The environment is process-global, so every env-mutating scenario
    // lives in this one test to keep the suite race-free.
    #[test]
    fn test_env_sources_in_priority_order() {
        let manager = SecureTokenManager::new();

        unsafe {
            env::set_var("PYPI_TOKEN", "pypi-primary-token-123");
            env::set_var("TWINE_PASSWORD", "twine-fallback-token-456");
        }
        assert_eq!(
            manager.get_token().unwrap().expose_secret(),
            "pypi-primary-token-123"
        );
        assert!(manager.has_token());

        let scrubbed =
            manager.mask_tokens_in_string("upload failed for token pypi-primary-token-123");
        assert!(scrubbed.contains("pyp...123"));
        assert!(!scrubbed.contains("pypi-primary-token-123"));

        unsafe {
            env::remove_var("PYPI_TOKEN");
        }
        assert_eq!(
            manager.get_token().unwrap().expose_secret(),
            "twine-fallback-token-456"
        );

        unsafe {
            env::remove_var("TWINE_PASSWORD");
        }
        assert!(manager.get_token().is_none());
        assert!(!manager.has_token());
    }

    #[test]
    fn test_mask_token_with_short_token() {
        let manager = SecureTokenManager::new();
        assert_eq!(manager.mask_token("short"), "****");
        assert_eq!(manager.mask_token(""), "****");
    }

    #[test]
    fn test_mask_token_with_long_token() {
        let manager = SecureTokenManager::new();
        assert_eq!(manager.mask_token("abcdef123456"), "abc...456");
        assert_eq!(manager.mask_token("pypi-tokenvalue123"), "pyp...123");
    }

    #[test]
    fn test_mask_token_with_multibyte_token() {
        let manager = SecureTokenManager::new();
        // 5 characters but 10 bytes; counts as short
        assert_eq!(manager.mask_token("ñññññ"), "****");
        // 12 characters; the mask keeps whole characters at both ends
        assert_eq!(manager.mask_token("ñññññññññññ1"), "ñññ...ññ1");
        assert_eq!(manager.mask_token("pypi-tökén-välüe"), "pyp...lüe");
    }

    #[test]
    fn test_mask_value_in_string() {
        let manager = SecureTokenManager::new();
        let input = "twine upload --password pypi-secret-value-789 dist/*";
        let output = manager.mask_value_in_string(input, "pypi-secret-value-789");
        assert!(output.contains("pyp...789"));
        assert!(!output.contains("pypi-secret-value-789"));
    }

    #[test]
    fn test_mask_value_with_regex_special_chars() {
        let manager = SecureTokenManager::new();
        let input = "bad token: a.b+c*d$e-fghij";
        let output = manager.mask_value_in_string(input, "a.b+c*d$e-fghij");
        assert!(!output.contains("a.b+c*d$e-fghij"));
    }

    #[test]
    fn test_mask_value_ignores_empty_secret() {
        let manager = SecureTokenManager::new();
        let input = "nothing to hide";
        assert_eq!(manager.mask_value_in_string(input, ""), input);
    }
}
