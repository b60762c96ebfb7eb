//! Image files on local disk, addressed by storage keys such as `photos/<session>/<id>.jpg`.

use anyhow::Context;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use uuid::Uuid;

/// URL prefix under which the upload directory is served.
pub const PUBLIC_UPLOAD_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_UPLOAD_PREFIX, key)
    }

    pub async fn put(&self, key: &str, body: &[u8]) -> anyhow::Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Returns `false` when the file was already gone.
    pub async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    /// Removes everything under `<kind>/<scope>/`. Returns `false` when nothing was there.
    pub async fn delete_dir(&self, prefix: &str) -> anyhow::Result<bool> {
        let path = self.path_for(prefix);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove dir {}", path.display())),
        }
    }
}

/// Directory prefix `<kind>/<scope>` shared by every key from [`new_key`] with the same arguments.
pub fn scope_prefix(kind: &str, scope: impl std::fmt::Display) -> String {
    format!("{}/{}", kind, scope)
}

/// Builds a fresh key `<kind>/<scope>/<uuid>.<ext>`.
pub fn new_key(kind: &str, scope: impl std::fmt::Display, ext: &str) -> String {
    format!("{}/{}.{}", scope_prefix(kind, scope), Uuid::new_v4(), ext)
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[tokio::test]
    async fn put_then_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let key = new_key("photos", "abc", "jpg");

        storage.put(&key, b"jpeg-bytes").await.unwrap();
        assert_eq!(tokio::fs::read(storage.path_for(&key)).await.unwrap(), b"jpeg-bytes");
        assert!(storage.public_url(&key).starts_with("/uploads/photos/abc/"));

        assert!(storage.delete(&key).await.unwrap());
        assert!(!storage.delete(&key).await.unwrap());
    }

    #[tokio::test]
    async fn delete_dir_removes_every_key_in_scope() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let first = new_key("results", "s1", "png");
        let second = new_key("results", "s1", "png");
        let other = new_key("results", "s2", "png");
        for key in [&first, &second, &other] {
            storage.put(key, b"png").await.unwrap();
        }

        assert!(storage.delete_dir(&scope_prefix("results", "s1")).await.unwrap());
        assert!(!storage.path_for(&first).exists());
        assert!(!storage.path_for(&second).exists());
        assert!(storage.path_for(&other).exists());
        assert!(!storage.delete_dir(&scope_prefix("results", "s1")).await.unwrap());
    }
}
