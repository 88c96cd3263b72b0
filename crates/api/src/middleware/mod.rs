//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid, unrevoked access token.
//! - [`auth::MaybeAuthUser`] -- Same, but anonymous requests pass through.

pub mod auth;
