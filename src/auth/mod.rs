//! Authentication module for ReWear
//!
//! Callers authenticate with a bearer JWT issued by the identity provider.
//! The token is the source of truth for (subject, email); a user row is
//! created on the first authenticated request and looked up thereafter.

mod extract;
mod jwt;
mod service;

pub use extract::{AdminUser, AuthUser};
pub use jwt::{verify_token, Claims};
pub use service::{AuthService, ProfileStats, PublicProfileStats};
