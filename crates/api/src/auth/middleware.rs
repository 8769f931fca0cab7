// Authentication middleware and extractors
// Decision: Authorization header carries the raw token or "Bearer <token>"
// Decision: A missing header is not an error; route extractors decide what is required
// Decision: A header that fails to decode is always rejected, never downgraded to anonymous

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use storefront_core::{Role, SessionIssuer, SessionPayload};
use uuid::Uuid;

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Decoded claims attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct SessionContext(pub SessionPayload);

/// Auth state for the middleware
#[derive(Clone)]
pub struct AuthState {
    pub issuer: Arc<SessionIssuer>,
}

impl AuthState {
    pub fn new(issuer: Arc<SessionIssuer>) -> Self {
        Self { issuer }
    }
}

/// Decode the Authorization header, if any, into a [`SessionContext`].
pub async fn authenticate(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };

    let raw = value
        .to_str()
        .map_err(|_| AuthError::unauthorized("Invalid authorization header"))?;
    let token = strip_bearer(raw);
    if token.is_empty() {
        return Err(AuthError::unauthorized("Invalid authorization header"));
    }

    match state.issuer.open(token) {
        Ok(Some(payload)) => {
            tracing::debug!(user_id = %payload.id, role = %payload.role, "Request authenticated");
            request.extensions_mut().insert(SessionContext(payload));
        }
        Ok(None) => {
            tracing::debug!("Token is not an access token, continuing unauthenticated");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected request with undecodable token");
            return Err(AuthError::unauthorized("Invalid or expired token"));
        }
    }

    Ok(next.run(request).await)
}

fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => raw,
    }
}

/// Authenticated user context extracted from request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    /// Token expiry, epoch milliseconds
    pub expiry: i64,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    fn from_session(session: &SessionContext) -> Result<Self, AuthError> {
        let id = Uuid::parse_str(&session.0.id)
            .map_err(|_| AuthError::unauthorized("Invalid user ID in token"))?;
        Ok(Self {
            id,
            email: session.0.email.clone(),
            role: session.0.role,
            expiry: session.0.expiry,
        })
    }
}

/// Extractor for authenticated user
/// This is required - returns 401 if not authenticated
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionContext>()
            .ok_or_else(|| AuthError::unauthorized("Authentication required"))?;
        AuthUser::from_session(session)
    }
}

/// Optional auth extractor - `None` when the request carries no session
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionContext>() {
            Some(session) => Ok(OptionalAuthUser(Some(AuthUser::from_session(session)?))),
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

/// Require admin role extractor
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::forbidden("Admin access required"));
        }

        Ok(AdminUser(user))
    }
}

/// Require customer role extractor
#[derive(Debug, Clone)]
pub struct CustomerUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CustomerUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != Role::Customer {
            return Err(AuthError::forbidden("Customer access required"));
        }

        Ok(CustomerUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use storefront_core::{generate_token_key, Identity, TokenCodec, DEFAULT_TOKEN_LIFETIME};
    use tower::ServiceExt;

    fn issuer() -> Arc<SessionIssuer> {
        let codec = TokenCodec::new(&generate_token_key("test"), &[]).unwrap();
        Arc::new(SessionIssuer::new(codec, DEFAULT_TOKEN_LIFETIME))
    }

    async fn whoami(OptionalAuthUser(user): OptionalAuthUser) -> String {
        match user {
            Some(user) => format!("{}:{}", user.email, user.role),
            None => "anonymous".to_string(),
        }
    }

    async fn admin_only(AdminUser(user): AdminUser) -> String {
        user.email
    }

    fn app(issuer: Arc<SessionIssuer>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/admin", get(admin_only))
            .layer(middleware::from_fn_with_state(
                AuthState::new(issuer),
                authenticate,
            ))
    }

    async fn call(app: Router, path: &str, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(path);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn identity(role: Role) -> Identity {
        Identity::new(Uuid::now_v7().to_string(), "john@example.com", role)
    }

    #[tokio::test]
    async fn test_no_header_proceeds_unauthenticated() {
        let (status, body) = call(app(issuer()), "/whoami", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let issuer = issuer();
        let token = issuer.issue(&identity(Role::Customer)).unwrap();

        let (status, body) = call(app(issuer.clone()), "/whoami", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "john@example.com:customer");

        let bearer = format!("Bearer {}", token);
        let (status, body) = call(app(issuer), "/whoami", Some(&bearer)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "john@example.com:customer");
    }

    #[tokio::test]
    async fn test_foreign_key_token_rejected() {
        let token = issuer().issue(&identity(Role::Admin)).unwrap();

        let (status, body) = call(app(issuer()), "/whoami", Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (status, _) = call(app(issuer()), "/whoami", Some("not-hex")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_extractor() {
        let issuer = issuer();
        let customer = issuer.issue(&identity(Role::Customer)).unwrap();
        let admin = issuer.issue(&identity(Role::Admin)).unwrap();

        let (status, _) = call(app(issuer.clone()), "/admin", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(app(issuer.clone()), "/admin", Some(&customer)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("Admin access required"));

        let (status, body) = call(app(issuer), "/admin", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "john@example.com");
    }

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("bearer  abc "), "abc");
        assert_eq!(strip_bearer(" abc "), "abc");
    }

    #[test]
    fn test_auth_error() {
        let error = AuthError::unauthorized("Test error");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.error, "Test error");

        let forbidden = AuthError::forbidden("Forbidden");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    }
}
