use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::invoice::errors::StorageError;
use crate::domain::invoice::ports::LocalStorage;

/// Local storage backed by a directory: key `k` lives in `<base>/k.json`.
///
/// Writes go to a sibling temp file which is synced and renamed over the
/// target, so a crash mid-write leaves the previous value intact.
pub struct FileLocalStorage {
  base_path: PathBuf,
}

impl FileLocalStorage {
  pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
    let base_path = base_path.into();
    fs::create_dir_all(&base_path).await?;
    tracing::info!("Local storage directory: {}", base_path.display());
    Ok(Self { base_path })
  }

  fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
    let valid = !key.is_empty()
      && key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
      && !key.starts_with('.');
    if !valid {
      return Err(StorageError::Unavailable(format!(
        "Invalid storage key '{}'",
        key
      )));
    }
    Ok(self.base_path.join(format!("{}.json", key)))
  }
}

#[async_trait]
impl LocalStorage for FileLocalStorage {
  async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
    let path = self.path_for(key)?;
    match fs::read_to_string(&path).await {
      Ok(contents) => Ok(Some(contents)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let path = self.path_for(key)?;
    let tmp_path = self.base_path.join(format!(".{}.json.tmp", key));

    let mut file = fs::File::create(&tmp_path).await?;
    let written = async {
      file.write_all(value.as_bytes()).await?;
      file.sync_all().await
    }
    .await;
    drop(file);

    if let Err(e) = written {
      let _ = fs::remove_file(&tmp_path).await;
      return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, &path).await {
      let _ = fs::remove_file(&tmp_path).await;
      return Err(e.into());
    }

    tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
    Ok(())
  }

  async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
    let path = self.path_for(key)?;
    match fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_missing_key_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileLocalStorage::new(dir.path()).await.unwrap();
    assert_eq!(storage.get_item("invoice_history").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_set_get_remove() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileLocalStorage::new(dir.path().join("nested")).await.unwrap();

    storage.set_item("invoice_history", "[1]").await.unwrap();
    storage.set_item("invoice_history", "[1,2]").await.unwrap();
    assert_eq!(
      storage.get_item("invoice_history").await.unwrap().as_deref(),
      Some("[1,2]")
    );
    assert!(dir.path().join("nested/invoice_history.json").exists());
    assert!(!dir.path().join("nested/.invoice_history.json.tmp").exists());

    storage.remove_item("invoice_history").await.unwrap();
    storage.remove_item("invoice_history").await.unwrap();
    assert_eq!(storage.get_item("invoice_history").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_values_survive_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    FileLocalStorage::new(dir.path())
      .await
      .unwrap()
      .set_item("invoice_history", "{\"version\":1,\"invoices\":[]}")
      .await
      .unwrap();

    let reopened = FileLocalStorage::new(dir.path()).await.unwrap();
    assert!(reopened.get_item("invoice_history").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn test_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileLocalStorage::new(dir.path()).await.unwrap();
    for key in ["", "../escape", "a/b", ".hidden"] {
      assert!(storage.set_item(key, "x").await.is_err(), "key {:?}", key);
    }
  }
}
