//! The storage root directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;

use crate::storage::names::upload_dir_name;

/// Base directory owning every uploaded file and captured request.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    /// Wrap an existing directory without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the directory (and parents) if needed and check it is usable.
    pub async fn ensure(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path).await?;

        let metadata = fs::metadata(&path).await?;
        if !metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", path.display()),
            ));
        }
        if metadata.permissions().readonly() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Destination directory for uploads received on `day`.
    pub fn upload_dir(&self, day: NaiveDate) -> PathBuf {
        self.path.join(upload_dir_name(day))
    }

    /// Join a decoded URL path under the root.
    ///
    /// Returns `None` if the path tries to leave the root.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let mut resolved = self.path.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    /// Write a captured request, replacing any record with the same name.
    pub async fn write_capture(&self, name: &str, record: &[u8]) -> io::Result<PathBuf> {
        let path = self.path.join(name);
        fs::write(&path, record).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b/c");
        assert!(!nested.exists());

        let root = StorageRoot::ensure(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(root.path(), nested.as_path());
    }

    #[tokio::test]
    async fn ensure_rejects_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        assert!(StorageRoot::ensure(&file).await.is_err());
    }

    #[test]
    fn resolve_stays_under_root() {
        let root = StorageRoot::new("/srv/drop");
        assert_eq!(
            root.resolve("2024-01-01/report.txt"),
            Some(PathBuf::from("/srv/drop/2024-01-01/report.txt"))
        );
        assert_eq!(root.resolve(""), Some(PathBuf::from("/srv/drop")));
        assert_eq!(root.resolve("/etc/passwd"), Some(PathBuf::from("/srv/drop/etc/passwd")));
        assert_eq!(root.resolve("./a/./b"), Some(PathBuf::from("/srv/drop/a/b")));
        assert_eq!(root.resolve("../secret"), None);
        assert_eq!(root.resolve("a/../../secret"), None);
    }

    #[test]
    fn upload_dir_is_date_partitioned() {
        let root = StorageRoot::new("/srv/drop");
        let day = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(root.upload_dir(day), PathBuf::from("/srv/drop/2025-12-31"));
    }

    #[tokio::test]
    async fn capture_with_same_name_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let root = StorageRoot::new(tmp.path());

        let first = root.write_capture("1.2.3.4_x.txt", b"first").await.unwrap();
        let second = root.write_capture("1.2.3.4_x.txt", b"second").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
