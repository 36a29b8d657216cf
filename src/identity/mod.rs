//! Client-held identity: the record, its durable storage, and the store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth service and the session-expiry handler are the only writers.
//! Everything else (authorization checks, UI gating) reads.

pub mod record;
pub mod storage;
pub mod store;

pub use record::{IdentityRecord, Role, UserId};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use store::IdentityStore;
