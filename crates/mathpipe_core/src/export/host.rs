//! Download hosts and the object URL guard.

use super::ExportError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Serialized bytes waiting to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl Blob {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: PDF_MIME_TYPE,
        }
    }
}

/// Environment able to hand a blob over to the user as a named file.
///
/// A blob is registered under an object URL, downloaded through that URL and
/// the URL is revoked afterwards to release the blob.
#[async_trait]
pub trait DownloadHost: Send + Sync {
    /// Register `blob` and return the URL naming it.
    fn create_object_url(&self, blob: Blob) -> String;

    /// Save the blob behind `url` as `file_name`, returning where it landed.
    async fn download(&self, url: &str, file_name: &str) -> Result<PathBuf, ExportError>;

    /// Release the blob behind `url`.
    fn revoke_object_url(&self, url: &str);
}

/// Object URL revoked when dropped.
///
/// Dropping happens on success, on error and when the export future is
/// cancelled, so the URL is always revoked exactly once.
pub struct ObjectUrl<'h, H: DownloadHost + ?Sized> {
    host: &'h H,
    url: String,
}

impl<'h, H: DownloadHost + ?Sized> ObjectUrl<'h, H> {
    pub fn register(host: &'h H, blob: Blob) -> Self {
        let url = host.create_object_url(blob);
        Self { host, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<H: DownloadHost + ?Sized> Drop for ObjectUrl<'_, H> {
    fn drop(&mut self) {
        tracing::trace!(url = %self.url, "Revoking object URL");
        self.host.revoke_object_url(&self.url);
    }
}

/// Host keeping blobs in memory and downloading them into a directory.
#[derive(Debug)]
pub struct DirectoryHost {
    dir: PathBuf,
    blobs: Mutex<HashMap<String, Blob>>,
    next_id: AtomicU64,
}

impl DirectoryHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            blobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of object URLs not revoked yet.
    pub fn live_urls(&self) -> usize {
        self.blobs.lock().len()
    }
}

#[async_trait]
impl DownloadHost for DirectoryHost {
    fn create_object_url(&self, blob: Blob) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:mathpipe/{id}");
        self.blobs.lock().insert(url.clone(), blob);
        url
    }

    async fn download(&self, url: &str, file_name: &str) -> Result<PathBuf, ExportError> {
        let bytes = {
            let blobs = self.blobs.lock();
            let blob = blobs
                .get(url)
                .ok_or_else(|| ExportError::Download(format!("unknown object URL: {url}")))?;
            blob.bytes.clone()
        };

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        Ok(path)
    }

    fn revoke_object_url(&self, url: &str) {
        self.blobs.lock().remove(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_host_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let host = DirectoryHost::new(dir.path().join("downloads"));

        let url = host.create_object_url(Blob::pdf(b"%PDF-1.5".to_vec()));
        assert!(url.starts_with("blob:mathpipe/"));
        assert_eq!(host.live_urls(), 1);

        let path = host.download(&url, "a.pdf").await.unwrap();
        assert_eq!(path, dir.path().join("downloads").join("a.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");

        host.revoke_object_url(&url);
        assert_eq!(host.live_urls(), 0);
    }

    #[tokio::test]
    async fn test_download_unknown_url() {
        let dir = tempfile::tempdir().unwrap();
        let host = DirectoryHost::new(dir.path());
        let err = host.download("blob:mathpipe/42", "a.pdf").await.unwrap_err();
        assert!(matches!(err, ExportError::Download(_)));
    }

    #[test]
    fn test_guard_revokes_on_drop() {
        let host = DirectoryHost::new("unused");
        {
            let first = ObjectUrl::register(&host, Blob::pdf(vec![1]));
            let second = ObjectUrl::register(&host, Blob::pdf(vec![2]));
            assert_ne!(first.url(), second.url());
            assert_eq!(host.live_urls(), 2);
        }
        assert_eq!(host.live_urls(), 0);
    }
}
