//! Request handlers.
//!
//! Every handler runs behind the token gate and touches nothing but the
//! storage root.
//!
//! ```text
//! GET  /, /upload-form   → form.rs    (static HTML)
//! POST /upload           → upload.rs  (multipart `file` → <root>/<date>/<name>)
//! *    /log-request      → capture.rs (raw request → <root>/<ip>_<time>.txt)
//! GET  /files/*          → browse.rs  (listing or file download)
//! ```

pub mod browse;
pub mod capture;
pub mod form;
pub mod upload;

pub use browse::{browse_path, browse_root};
pub use capture::capture_request;
pub use form::upload_form;
pub use upload::upload_file;
