//! Domain types and models

pub mod session;
pub mod user;

pub use session::{CredentialPair, SessionEvent, SessionPhase};
pub use user::UserProfile;
