//! Current-user resolution for the report view.
//!
//! The view never reaches for ambient auth state; callers hand it a
//! `SessionSource` instead.

use async_trait::async_trait;

use crate::auth::jwt::verify_token;
use crate::auth::middleware::AuthUser;

#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn current_user(&self) -> Option<AuthUser>;
}

/// Resolves the user from a bearer token issued by the auth provider.
pub struct TokenSession {
    token: String,
    secret: String,
    audience: String,
}

impl TokenSession {
    pub fn new(token: impl Into<String>, secret: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
            audience: audience.into(),
        }
    }
}

#[async_trait]
impl SessionSource for TokenSession {
    async fn current_user(&self) -> Option<AuthUser> {
        verify_token(&self.token, &self.secret, &self.audience)
            .ok()
            .map(AuthUser::from)
    }
}

/// A session that is already known, e.g. signed out (`None`).
pub struct StaticSession(pub Option<AuthUser>);

#[async_trait]
impl SessionSource for StaticSession {
    async fn current_user(&self) -> Option<AuthUser> {
        self.0.clone()
    }
}
