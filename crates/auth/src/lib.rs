//! `databox-auth`: operator accounts and sessions.
//!
//! Decoupled from HTTP. Each operator account carries its own business
//! configuration, so saving settings goes through the user store.

pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod session;
pub mod store;
pub mod user;

pub use error::AuthError;
pub use file_store::FileUserStore;
pub use memory_store::InMemoryUserStore;
pub use session::{SessionRegistry, SessionToken};
pub use store::UserStore;
pub use user::{UserProfile, UserRecord};
