//! Library crate for admin-console.
//!
//! This crate exposes the building blocks of the console:
//! - REST transport, envelopes and the auth token (`api`)
//! - Resource stores with list, detail, form and write operations (`store`)
//! - Record types for each managed collection (`model`)
//! - List filtering and paging (`search`, `paginate`)
//! - Application state, update loop and rendering (`app`, `ui`)
//!
//! It is used by the `admin-console` binary and by tests.
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod paginate;
pub mod search;
pub mod store;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use context::AppContext;
pub use error::{ErrorKind, StoreError, TransportError};
pub use paginate::Paginator;
pub use search::ListFilter;
pub use store::ResourceStore;
