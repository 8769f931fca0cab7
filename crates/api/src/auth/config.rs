// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Missing token key generates a random per-process key (tokens die on restart)

use anyhow::{Context, Result};
use std::time::Duration;
use storefront_core::{
    generate_token_key, CredentialHasher, SessionIssuer, TokenCodec, ALGORITHM,
    DEFAULT_PASSWORD_COST, DEFAULT_TOKEN_LIFETIME,
};

/// Admin user seeded at startup
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

/// Token sealing configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Cipher identifier, only AES-256-GCM is accepted
    pub algorithm: String,
    /// Primary key in `key_id:base64` form, used for sealing
    pub primary_key: String,
    /// Older keys still accepted when opening tokens
    pub previous_keys: Vec<String>,
    /// Token lifetime
    pub lifetime: Duration,
    /// Reject tokens whose expiry has passed
    pub enforce_expiry: bool,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("algorithm", &self.algorithm)
            .field("primary_key", &"[redacted]")
            .field("previous_keys", &self.previous_keys.len())
            .field("lifetime", &self.lifetime)
            .field("enforce_expiry", &self.enforce_expiry)
            .finish()
    }
}

impl TokenConfig {
    /// Config with a freshly generated key, for tests and local runs.
    pub fn ephemeral() -> Self {
        Self {
            algorithm: ALGORITHM.to_string(),
            primary_key: generate_token_key("dev"),
            previous_keys: Vec::new(),
            lifetime: DEFAULT_TOKEN_LIFETIME,
            enforce_expiry: true,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: TokenConfig,
    /// Argon2 iteration count
    pub password_cost: u32,
    /// Admin user (initial setup)
    pub admin: Option<AdminConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::ephemeral(),
            password_cost: DEFAULT_PASSWORD_COST,
            admin: None,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let algorithm =
            std::env::var("AUTH_TOKEN_ALGORITHM").unwrap_or_else(|_| ALGORITHM.to_string());

        let primary_key = match std::env::var("AUTH_TOKEN_KEY") {
            Ok(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => {
                tracing::warn!(
                    "AUTH_TOKEN_KEY not set, using a random key; tokens will not survive a restart"
                );
                generate_token_key("dev")
            }
        };

        let previous_keys = std::env::var("AUTH_TOKEN_KEY_PREVIOUS")
            .map(|s| parse_list(&s))
            .unwrap_or_default();

        let lifetime = std::env::var("AUTH_TOKEN_LIFETIME_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        let enforce_expiry = std::env::var("AUTH_ENFORCE_EXPIRY")
            .map(|s| parse_bool(&s))
            .unwrap_or(true);

        let password_cost = std::env::var("AUTH_PASSWORD_COST")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PASSWORD_COST);

        let admin = match (
            std::env::var("AUTH_ADMIN_EMAIL"),
            std::env::var("AUTH_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminConfig { email, password })
            }
            _ => None,
        };

        Self {
            token: TokenConfig {
                algorithm,
                primary_key,
                previous_keys,
                lifetime,
                enforce_expiry,
            },
            password_cost,
            admin,
        }
    }

    /// Build the session issuer. Fails on an unknown algorithm or malformed keys.
    pub fn session_issuer(&self) -> Result<SessionIssuer> {
        let previous: Vec<&str> = self.token.previous_keys.iter().map(String::as_str).collect();
        let codec = TokenCodec::with_algorithm(
            &self.token.algorithm,
            &self.token.primary_key,
            &previous,
        )
        .context("invalid token configuration")?;

        Ok(SessionIssuer::new(codec, self.token.lifetime)
            .with_expiry_enforcement(self.token.enforce_expiry))
    }

    pub fn credential_hasher(&self) -> Result<CredentialHasher> {
        CredentialHasher::new(self.password_cost).context("invalid AUTH_PASSWORD_COST")
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn parse_bool(s: &str) -> bool {
    !matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds() {
        let config = AuthConfig::default();
        let issuer = config.session_issuer().unwrap();
        assert_eq!(issuer.lifetime(), Duration::from_millis(300_000));
        assert!(issuer.enforces_expiry());
        assert!(config.credential_hasher().is_ok());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let mut config = AuthConfig::default();
        config.token.algorithm = "AES-128-CBC".to_string();
        assert!(config.session_issuer().is_err());
    }

    #[test]
    fn test_previous_keys_accepted() {
        let old = AuthConfig::default();
        let old_issuer = old.session_issuer().unwrap();

        let mut rotated = AuthConfig::default();
        rotated.token.primary_key = generate_token_key("v2");
        rotated.token.previous_keys = vec![old.token.primary_key.clone()];
        let rotated_issuer = rotated.session_issuer().unwrap();

        let token = old_issuer
            .issue(&storefront_core::Identity::new(
                "u1",
                "a@b.c",
                storefront_core::Role::Customer,
            ))
            .unwrap();
        assert!(rotated_issuer.open(&token).unwrap().is_some());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_list(" a, b ,,c"), vec!["a", "b", "c"]);
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("OFF"));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = TokenConfig::ephemeral();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(&config.primary_key));
        assert!(debug.contains("[redacted]"));
    }
}
