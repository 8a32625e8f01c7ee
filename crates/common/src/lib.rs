//! Identifier types shared by the storage, domain and HTTP layers.

pub mod types;

pub use types::{RecordId, UserId};
