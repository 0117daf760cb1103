use crate::{Error, Result};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs, io::AsyncWriteExt};

/// Remove `folder` and everything in it. A missing folder is fine.
pub async fn clear(folder: &Path) -> Result<()> {
    match fs::remove_dir_all(folder).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(Error::fs(folder, e)),
        _ => Ok(()),
    }
}

/// Write `bytes` to `folder/file_name`, creating `folder` and its parents first.
pub async fn write(folder: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(folder)
        .await
        .map_err(|e| Error::fs(folder, e))?;

    let path = folder.join(file_name);
    let mut file = fs::File::create(&path)
        .await
        .map_err(|e| Error::fs(&path, e))?;
    file.write_all(bytes).await.map_err(|e| Error::fs(&path, e))?;
    file.flush().await.map_err(|e| Error::fs(&path, e))?;
    Ok(path)
}
