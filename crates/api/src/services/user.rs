// User service: registration, login checks, listing and soft deletion
// Decision: Hashing runs on the blocking pool so Argon2 never stalls the runtime
// Decision: Deleted users are invisible to lookups and cannot log in

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::sync::Arc;
use storefront_core::{
    listing::paginate, CredentialHasher, Page, Role, SearchPattern, SortOrder, User, UserStatus,
};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::api::common::ListQuery;
use crate::api::users::{SignUpRequest, UpdateUserRequest};
use crate::storage::{CreateUserRow, Database, StoreError, UpdateUser, UserRow};

pub struct UserService {
    db: Arc<Database>,
    hasher: CredentialHasher,
}

impl UserService {
    pub fn new(db: Arc<Database>, hasher: CredentialHasher) -> Self {
        Self { db, hasher }
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = self.hasher.clone();
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("password hashing task failed")??;
        Ok(digest)
    }

    async fn verify_password(&self, password: String, digest: String) -> Result<bool> {
        let hasher = self.hasher.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .context("password verification task failed")??;
        Ok(matches)
    }

    pub async fn sign_up(&self, role: Role, req: SignUpRequest) -> ServiceResult<User> {
        let password_hash = self.hash_password(req.password).await?;

        let input = CreateUserRow {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            mobile_number: req.mobile_number,
            role,
            profile_picture: req.profile_picture,
            gender: req.gender,
            address: req.address,
            state: req.state,
            country: req.country,
            city: req.city,
        };

        let row = self.db.create_user(input).await.map_err(|e| {
            match e.downcast_ref::<StoreError>() {
                Some(StoreError::DuplicateEmail(_)) => {
                    ServiceError::Conflict("Email already registered".to_string())
                }
                None => ServiceError::Internal(e),
            }
        })?;

        tracing::info!(user_id = %row.id, role = %row.role, "User registered");
        Ok(row.to_user())
    }

    /// Check a login attempt. Every failure is `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let Some(row) = self.db.get_user_by_email(email.trim()).await? else {
            tracing::debug!("Login attempt for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if row.status != UserStatus::Active {
            tracing::debug!(user_id = %row.id, status = %row.status, "Login attempt for inactive user");
            return Err(ServiceError::InvalidCredentials);
        }

        let matches = self
            .verify_password(password.to_string(), row.password_hash.clone())
            .await?;
        if !matches {
            tracing::debug!(user_id = %row.id, "Login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(row.to_user())
    }

    /// Users that are not deleted, filtered by role when given.
    pub async fn list(&self, role: Option<Role>, query: &ListQuery) -> ServiceResult<Page<User>> {
        let search = query.search();
        let mut rows: Vec<UserRow> = self
            .db
            .list_users()
            .await?
            .into_iter()
            .filter(|u| u.status != UserStatus::Deleted)
            .filter(|u| role.map_or(true, |r| u.role == r))
            .filter(|u| matches_search(u, search.as_ref()))
            .collect();

        sort_users(&mut rows, query.sort_key(), query.sort_order());

        Ok(paginate(rows, query.skip(), query.limit()).map(|row| row.to_user()))
    }

    pub async fn get(&self, id: Uuid, role: Role) -> ServiceResult<User> {
        Ok(self.find(id, role).await?.to_user())
    }

    pub async fn update(&self, id: Uuid, role: Role, req: UpdateUserRequest) -> ServiceResult<User> {
        self.find(id, role).await?;

        let password_hash = match req.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let input = UpdateUser {
            first_name: req.first_name.map(|s| s.trim().to_string()),
            last_name: req.last_name.map(|s| s.trim().to_string()),
            password_hash,
            mobile_number: req.mobile_number,
            status: req.status,
            profile_picture: req.profile_picture,
            gender: req.gender,
            address: req.address,
            state: req.state,
            country: req.country,
            city: req.city,
        };

        let row = self
            .db
            .update_user(id, input)
            .await?
            .ok_or(ServiceError::NotFound(role_label(role)))?;
        Ok(row.to_user())
    }

    /// Soft delete: the record stays with status `deleted`.
    pub async fn delete(&self, id: Uuid, role: Role) -> ServiceResult<User> {
        self.find(id, role).await?;

        let input = UpdateUser {
            status: Some(UserStatus::Deleted),
            ..Default::default()
        };
        let row = self
            .db
            .update_user(id, input)
            .await?
            .ok_or(ServiceError::NotFound(role_label(role)))?;

        tracing::info!(user_id = %row.id, role = %row.role, "User deleted");
        Ok(row.to_user())
    }

    /// Create the configured admin account if no user holds that email yet.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<()> {
        if let Some(existing) = self.db.get_user_by_email(email).await? {
            tracing::debug!(user_id = %existing.id, "Admin account already present");
            return Ok(());
        }

        let req = SignUpRequest {
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            mobile_number: None,
            profile_picture: None,
            gender: None,
            address: None,
            state: None,
            country: None,
            city: None,
        };
        self.sign_up(Role::Admin, req)
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed admin: {}", e))?;
        Ok(())
    }

    async fn find(&self, id: Uuid, role: Role) -> ServiceResult<UserRow> {
        self.db
            .get_user(id)
            .await?
            .filter(|u| u.role == role && u.status != UserStatus::Deleted)
            .ok_or(ServiceError::NotFound(role_label(role)))
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Customer => "Customer",
    }
}

fn matches_search(user: &UserRow, search: Option<&SearchPattern>) -> bool {
    match search {
        Some(pattern) => pattern.matches_any([
            user.email.as_str(),
            user.first_name.as_str(),
            user.last_name.as_str(),
        ]),
        None => true,
    }
}

fn sort_users(rows: &mut [UserRow], key: &str, order: SortOrder) {
    let compare: fn(&UserRow, &UserRow) -> Ordering = match key {
        "updatedAt" | "updated_at" => |a, b| a.updated_at.cmp(&b.updated_at),
        "email" => |a, b| a.email.cmp(&b.email),
        "firstName" | "first_name" => |a, b| a.first_name.cmp(&b.first_name),
        "lastName" | "last_name" => |a, b| a.last_name.cmp(&b.last_name),
        _ => |a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
    };
    rows.sort_by(|a, b| order.apply(compare(a, b)));
}
