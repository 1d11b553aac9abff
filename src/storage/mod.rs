//! Storage root and on-disk naming.
//!
//! # Data Flow
//! ```text
//! upload    → names.rs (validate client filename)
//!           → root.rs  (<root>/<YYYY-MM-DD>/<filename>)
//! capture   → names.rs (<ip>_<YYYYMMDD_HHMMSS>.txt)
//!           → root.rs  (<root>/<name>)
//! browse    → root.rs  (safe join of a URL path under the root)
//! ```
//!
//! # Design Decisions
//! - Nothing here deletes or renames existing files
//! - Same name, same destination: last writer wins, no locking
//! - Client-supplied names never contain separators or `..`

pub mod names;
pub mod root;

pub use names::{capture_file_name, validate_file_name, InvalidFileName};
pub use root::StorageRoot;
