//! Auth-domain models: session records, token secrets, form payloads, and user profiles.

pub mod credentials;
pub mod profile;
pub mod record;
pub mod secret;

pub use credentials::*;
pub use profile::*;
pub use record::*;
pub use secret::*;
