// Identity domain types
//
// An Identity is the authenticated principal carried inside a session token.
// Used by the token issuer, the authorization layer, and the user records.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Role granted to a principal.
/// - `customer`: shops, manages their own cart and orders
/// - `admin`: manages the catalog, other admins, and all orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Authenticated principal.
///
/// `id` is the string form of the user's record ID. It is opaque to the
/// token layer and never parsed there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Identity {
    /// Unique identifier of the principal.
    pub id: String,
    /// Login email, unique across users.
    pub email: String,
    /// Granted role.
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let role: Role = serde_json::from_str(r#""customer""#).unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn test_identity_is_admin() {
        let admin = Identity::new("1", "root@example.com", Role::Admin);
        let customer = Identity::new("2", "john@example.com", Role::Customer);
        assert!(admin.is_admin());
        assert!(!customer.is_admin());
    }
}
