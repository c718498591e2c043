//! # Authentication Context
//!
//! Explicit principal and role values for privileged operations.
//!
//! ## Overview
//!
//! Sign-in itself happens in the hosted backend. This crate only models the
//! result: an [`AuthState`] that is either anonymous or carries a
//! [`Principal`] whose [`Role`] comes from the session's role claim. Every
//! operation that needs an owner or admin rights receives the `AuthState`
//! as an argument and asks it for the principal it needs:
//!
//! ```
//! use core_auth::{AuthState, Principal, Role};
//!
//! let auth = AuthState::Authenticated(Principal::new("user-1", Role::Admin));
//! let admin = auth.require_admin().unwrap();
//! assert_eq!(admin.user_id(), "user-1");
//!
//! assert!(AuthState::Anonymous.require_user().is_err());
//! ```

pub mod error;
pub mod types;

pub use error::{AuthError, Result};
pub use types::{AuthState, Principal, Role, SessionClaims};
