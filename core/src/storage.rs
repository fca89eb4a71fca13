use camino::Utf8PathBuf as PathBuf;
use eyre::{Context, Result};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum StorageReadError {
    #[error("File with key '{0}' does not exist")]
    FileNotFound(String),
    #[error(transparent)]
    IOError {
        #[from]
        source: tokio::io::Error,
    },
}

/// Flat directory of uploaded files.
///
/// Keys are plain file names. Anything that could point outside of the root
/// (separators, `..`) is never resolved.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> UploadStorage {
        UploadStorage { root: root.into() }
    }

    pub async fn create_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .wrap_err_with(|| format!("could not create upload directory {}", self.root))
    }

    fn resolve(&self, key: &str) -> Option<PathBuf> {
        let is_plain_name = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        is_plain_name.then(|| self.root.join(key))
    }

    #[instrument(skip(self, data), fields(len = data.len()), level = "debug")]
    pub async fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self
            .resolve(key)
            .ok_or_else(|| eyre::eyre!("invalid storage key '{}'", key))?;
        let mut file = tokio::fs::File::create(&path)
            .await
            .wrap_err_with(|| format!("could not create file {}", path))?;
        file.write_all(data)
            .await
            .wrap_err_with(|| format!("could not write file {}", path))?;
        file.flush().await?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn open_read_stream(
        &self,
        key: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageReadError> {
        let path = self
            .resolve(key)
            .ok_or_else(|| StorageReadError::FileNotFound(key.to_owned()))?;
        let is_file = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => return Err(err.into()),
        };
        if !is_file {
            return Err(StorageReadError::FileNotFound(key.to_owned()));
        }
        let file = tokio::fs::File::open(&path).await?;
        Ok(Box::new(file))
    }
}
