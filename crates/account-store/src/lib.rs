//! Account storage for the signup service.
//!
//! Accounts are keyed by email. Every backend enforces email uniqueness at
//! insert time, so concurrent signups for the same address cannot both land.

mod error;
mod file;
mod memory;
mod store;
mod types;

pub use error::StoreError;
pub use file::FileAccountStore;
pub use memory::{AccountTable, MemoryAccountStore};
pub use store::{AccountStore, Store};
#[cfg(any(test, feature = "mock"))]
pub use store::MockAccountStore;
pub use types::*;
