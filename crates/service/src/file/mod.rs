//! File-backed implementations of the storage traits.

pub mod kv_store;
