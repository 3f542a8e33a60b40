use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::Rng;
use tokio::fs;
use tracing::{info, warn};

/// Filesystem store for uploaded avatar images.
///
/// Files are written under generated names (`<unix-millis>-<random><ext>`)
/// and exposed to clients through the `/uploads/` static route; rows store
/// the public path.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Upload directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an uploaded file and return its public `/uploads/...` path.
    /// The stored name keeps the original extension only.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        let filename = format!("{}-{}{}", chrono::Utc::now().timestamp_millis(), suffix, ext);

        fs::write(self.dir.join(&filename), data).await?;
        Ok(format!("/uploads/{filename}"))
    }

    /// Remove a previously stored file given its public path.
    ///
    /// Only the basename is honored, so a stored path can never resolve
    /// outside the upload directory. A file that is already gone counts as
    /// success; any other failure is the caller's to judge.
    pub async fn remove(&self, public_path: &str) -> std::io::Result<()> {
        let Some(name) = Path::new(public_path).file_name() else {
            return Ok(());
        };
        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("avatar file {} already gone", name.to_string_lossy());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort variant of [`UploadStore::remove`]: failures are logged
    /// and swallowed.
    pub async fn remove_quietly(&self, public_path: &str) {
        if let Err(e) = self.remove(public_path).await {
            warn!("failed to delete old avatar {public_path}: {e}");
        }
    }
}
