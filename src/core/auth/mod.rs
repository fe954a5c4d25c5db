//! Credential selection for remote listing.
//!
//! Only the policy for choosing a credential lives here; the handshake itself
//! is left to libgit2.

pub mod credentials;
pub mod endpoint;

pub use credentials::{Authentication, Credential, CredentialResolver};
pub use endpoint::{Endpoint, Scheme};
