//! Storage abstractions for service layer
//!
//! `DurableStore` is the string key-value contract the session mirror is
//! written to. `JsonMapStore` is the reusable JSON-file map the file-backed
//! implementation sits on; `MemoryKvStore` backs tests.

pub mod durable;
pub mod json_map_store;
pub mod memory;

pub use durable::DurableStore;
pub use memory::MemoryKvStore;
pub use crate::file::kv_store::FileKvStore;
