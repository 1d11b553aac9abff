//! File naming for uploads and captured requests.

use std::net::IpAddr;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Rejected client-supplied filename.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid file name {0:?}")]
pub struct InvalidFileName(pub String);

/// Accept a client filename only if it names a single entry in one directory.
pub fn validate_file_name(name: &str) -> Result<&str, InvalidFileName> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        Err(InvalidFileName(name.to_string()))
    } else {
        Ok(name)
    }
}

/// Directory name for uploads received on `day`.
pub fn upload_dir_name(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// `<ip>_<YYYYMMDD_HHMMSS>.txt`. Requests from one IP within one second
/// share a name.
pub fn capture_file_name(ip: IpAddr, at: DateTime<Utc>) -> String {
    format!("{}_{}.txt", ip_label(ip), at.format("%Y%m%d_%H%M%S"))
}

fn ip_label(ip: IpAddr) -> String {
    match ip.to_canonical() {
        IpAddr::V4(v4) => v4.to_string(),
        // colons are not portable in file names
        IpAddr::V6(v6) => v6.to_string().replace(':', "-"),
    }
}
