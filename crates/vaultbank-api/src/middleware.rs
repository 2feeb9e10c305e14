//! Session middleware
//!
//! Resolves the bearer token on every protected route:
//! - Verifies the HS256 token signature and temporal claims
//! - Loads the account behind the token's subject
//! - Hands the resolved principal to handlers via request extensions
//!
//! Requests without a usable token never reach a handler.

use axum::{
    extract::Request,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use vaultbank_auth::{AuthError, JwtService};
use vaultbank_db::UserStore;

/// Session resolution layer for protected routes
#[derive(Clone)]
pub struct SessionLayer {
    jwt: JwtService,
    users: Arc<dyn UserStore>,
}

impl SessionLayer {
    /// Create a new session layer
    pub fn new(jwt: JwtService, users: Arc<dyn UserStore>) -> Self {
        Self { jwt, users }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            jwt: self.jwt.clone(),
            users: self.users.clone(),
        }
    }
}

/// Session resolution middleware service
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    jwt: JwtService,
    users: Arc<dyn UserStore>,
}

impl<S> Service<Request> for SessionMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let jwt = self.jwt.clone();
        let users = self.users.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let user = match resolve_session(req.headers(), &jwt, &*users).await {
                Ok(user) => user,
                Err(e) => return Ok(e.into_response()),
            };

            let (mut parts, body) = req.into_parts();
            parts.extensions.insert(user);
            let req = Request::from_parts(parts, body);
            inner.call(req).await
        })
    }
}

/// Resolve the request's bearer token into a live account
async fn resolve_session(
    headers: &HeaderMap,
    jwt: &JwtService,
    users: &dyn UserStore,
) -> Result<AuthenticatedUser, ApiError> {
    let token = extract_bearer_token(headers)?;
    let claims = jwt.verify(token)?;

    // The account may have been removed after the token was issued.
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            ApiError::Forbidden("The user belonging to this token no longer exists".to_string())
        })?;

    Ok(AuthenticatedUser::from(user))
}

/// Pull the token out of the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or(AuthError::MissingToken)?;
    let auth_str = auth_header.to_str().map_err(|_| AuthError::MissingToken)?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    Err(AuthError::MissingToken)
}
