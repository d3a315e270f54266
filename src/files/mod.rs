//! File Storage
//!
//! Metadata in the relational store, blobs on disk keyed by numeric id.

pub mod handlers;
pub mod models;
pub mod service;
pub mod storage;

pub use models::FileRecord;
pub use service::FileService;
pub use storage::{DiskStore, FileStore};
