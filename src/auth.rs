//! Auth-domain models: API credentials, cache identities, and token values.

pub mod credentials;
pub mod identity;
pub mod token;

pub use credentials::*;
pub use identity::*;
pub use token::{cached::*, secret::*};
