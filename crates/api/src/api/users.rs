// User DTOs shared by the customer and admin routes

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::{User, UserStatus};
use utoipa::ToSchema;

use super::validation::{
    validate_email, validate_name, validate_password, validate_text, ValidationError,
};
use crate::services::UserService;

/// App state for customer and admin routes
#[derive(Clone)]
pub struct UsersState {
    pub service: Arc<UserService>,
}

/// Request to register a user
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("first_name", &self.first_name)?;
        validate_name("last_name", &self.last_name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        for field in [
            &self.mobile_number,
            &self.profile_picture,
            &self.gender,
            &self.address,
            &self.state,
            &self.country,
            &self.city,
        ] {
            validate_text(field.as_deref())?;
        }
        Ok(())
    }
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(first_name) = &self.first_name {
            validate_name("first_name", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_name("last_name", last_name)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        for field in [
            &self.mobile_number,
            &self.profile_picture,
            &self.gender,
            &self.address,
            &self.state,
            &self.country,
            &self.city,
        ] {
            validate_text(field.as_deref())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    #[schema(example = "Customer created successfully")]
    pub message: String,
    pub customer: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    #[schema(example = "Admin created successfully")]
    pub message: String,
    pub admin: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignUpRequest {
        serde_json::from_value(serde_json::json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "john@example.com",
            "password": "secret"
        }))
        .unwrap()
    }

    #[test]
    fn test_signup_validation() {
        assert!(signup().validate().is_ok());

        let mut req = signup();
        req.email = "not-an-email".to_string();
        assert_eq!(req.validate().unwrap_err().0, "Invalid email address");

        let mut req = signup();
        req.last_name = String::new();
        assert_eq!(req.validate().unwrap_err().0, "last_name is required");

        let mut req = signup();
        req.city = Some("x".repeat(20 * 1024));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_validation() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let req = UpdateUserRequest {
            password: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
