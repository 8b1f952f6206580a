//! Workspace file store for Javelin.
//!
//! The store is responsible for:
//! - tracking workspace roots and the index of Java sources beneath them,
//! - providing in-memory documents (editor buffers) that take precedence
//!   over disk,
//! - package-name bookkeeping: extraction, source-root inference and
//!   suggestions for new files,
//! - declaration lookup fast paths over the index.
//!
//! It owns all path and document state; every later query stage reads
//! through it. It is a plain value; the service wraps it in one exclusive
//! lock and holds that lock for the duration of a query.

mod document;
mod store;

pub use document::{ContentChange, Document};
pub use store::{FileStore, StoreError};
