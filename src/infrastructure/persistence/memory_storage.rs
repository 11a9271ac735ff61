use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::invoice::errors::StorageError;
use crate::domain::invoice::ports::LocalStorage;

/// Process-local storage for ephemeral runs and tests.
#[derive(Default)]
pub struct InMemoryLocalStorage {
  items: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl LocalStorage for InMemoryLocalStorage {
  async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.items.read().await.get(key).cloned())
  }

  async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
    self
      .items
      .write()
      .await
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
    self.items.write().await.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_set_get_remove() {
    let storage = InMemoryLocalStorage::new();
    assert_eq!(storage.get_item("k").await.unwrap(), None);
    storage.set_item("k", "v").await.unwrap();
    assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v"));
    storage.remove_item("k").await.unwrap();
    assert_eq!(storage.get_item("k").await.unwrap(), None);
  }
}
