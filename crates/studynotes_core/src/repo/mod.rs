//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable key-value port injected into stores.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories store opaque strings; decoding belongs to the stores.
//! - Repository APIs surface transport errors; stores decide how to recover.

pub mod kv_repo;
pub mod note_store;
pub mod progress_store;
