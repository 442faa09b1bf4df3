#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{InMemorySessionStore, SessionHandle, SessionStore, StorageError};
