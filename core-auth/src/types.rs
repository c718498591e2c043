use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{AuthError, Result};

/// Privilege level of an authenticated principal.
///
/// # Examples
///
/// ```
/// use core_auth::Role;
///
/// assert_eq!(Role::from_claim(Some("admin")), Role::Admin);
/// assert_eq!(Role::from_claim(Some("editor")), Role::Listener);
/// assert_eq!(Role::from_claim(None), Role::Listener);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can browse, play and manage their own playlists
    #[default]
    Listener,
    /// Can additionally upload and delete catalog tracks
    Admin,
}

impl Role {
    /// Derive a role from the session's role claim.
    ///
    /// Only an exact, case-insensitive `"admin"` grants admin rights. Missing
    /// or unknown claims fall back to `Listener`.
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim.map(|c| c.trim().to_lowercase()) {
            Some(c) if c == "admin" => Role::Admin,
            _ => Role::Listener,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Listener => "listener",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: String,
    email: Option<String>,
    role: Role,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            role,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Claims decoded from a backend session.
///
/// Hosts decode the session token (or the backend's user record) into this
/// shape and turn it into a [`Principal`] with [`SessionClaims::into_principal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject, the backend's user id
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionClaims {
    pub fn into_principal(self) -> Result<Principal> {
        if self.sub.trim().is_empty() {
            return Err(AuthError::InvalidClaims(
                "session subject is empty".to_string(),
            ));
        }

        let role = Role::from_claim(self.role.as_deref());
        let mut principal = Principal::new(self.sub, role);
        if let Some(email) = self.email.filter(|e| !e.trim().is_empty()) {
            principal = principal.with_email(email);
        }

        debug!(role = %role, "Resolved principal from session claims");
        Ok(principal)
    }
}

/// Who is using the client right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl AuthState {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(principal) => Some(principal),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.principal().is_some_and(Principal::is_admin)
    }

    /// The signed-in principal, or `AuthError::NotAuthenticated`
    pub fn require_user(&self) -> Result<&Principal> {
        self.principal().ok_or(AuthError::NotAuthenticated)
    }

    /// The signed-in principal if it holds the admin role
    pub fn require_admin(&self) -> Result<&Principal> {
        let principal = self.require_user()?;
        if principal.is_admin() {
            Ok(principal)
        } else {
            Err(AuthError::InsufficientRole {
                required: Role::Admin,
                actual: principal.role(),
            })
        }
    }
}

impl From<Principal> for AuthState {
    fn from(principal: Principal) -> Self {
        AuthState::Authenticated(principal)
    }
}
