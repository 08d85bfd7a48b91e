//! Host-owned storage for study artifacts.
//!
//! Each repository is a keyed map that remembers insertion order, so listings come
//! back in the order topics were first studied.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::answers::Submission;

#[async_trait]
pub trait Repository<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V>;
    /// Insert or replace. A replaced key keeps its original position.
    async fn put(&self, key: &str, value: V);
    async fn list(&self) -> Vec<(String, V)>;
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Debug)]
pub struct InMemoryRepository<V> {
    entries: Arc<RwLock<Vec<(String, V)>>>,
}

impl<V> Default for InMemoryRepository<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<V> Clone for InMemoryRepository<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

#[async_trait]
impl<V> Repository<V> for InMemoryRepository<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    async fn put(&self, key: &str, value: V) {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => entries.push((key.to_string(), value)),
        }
    }

    async fn list(&self) -> Vec<(String, V)> {
        self.entries.read().await.clone()
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Everything a study session accumulates, passed by reference to whoever needs it
pub struct StudyStore {
    /// topic -> generated quiz text
    pub question_bank: Arc<dyn Repository<String>>,
    /// topic -> narrated audio file
    pub audio_topics: Arc<dyn Repository<PathBuf>>,
    /// subject -> mock question paper
    pub mock_papers: Arc<dyn Repository<String>>,
    /// subject -> latest submitted answer sheet
    pub submissions: Arc<dyn Repository<Submission>>,
}

impl Default for StudyStore {
    fn default() -> Self {
        Self {
            question_bank: Arc::new(InMemoryRepository::<String>::default()),
            audio_topics: Arc::new(InMemoryRepository::<PathBuf>::default()),
            mock_papers: Arc::new(InMemoryRepository::<String>::default()),
            submissions: Arc::new(InMemoryRepository::<Submission>::default()),
        }
    }
}

impl std::fmt::Debug for StudyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_roundtrip() {
        let repo = InMemoryRepository::<String>::default();
        assert!(repo.is_empty().await);
        repo.put("photosynthesis", "Q1".to_string()).await;
        assert_eq!(repo.get("photosynthesis").await.as_deref(), Some("Q1"));
        assert_eq!(repo.get("osmosis").await, None);
    }

    #[tokio::test]
    async fn replace_keeps_position() {
        let repo = InMemoryRepository::<String>::default();
        repo.put("a", "1".to_string()).await;
        repo.put("b", "2".to_string()).await;
        repo.put("a", "3".to_string()).await;

        let keys: Vec<_> = repo.list().await.into_iter().collect();
        assert_eq!(
            keys,
            vec![("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let repo = InMemoryRepository::<u32>::default();
        let other = repo.clone();
        other.put("x", 7).await;
        assert_eq!(repo.get("x").await, Some(7));
    }

    #[tokio::test]
    async fn study_store_starts_empty() {
        let store = StudyStore::default();
        assert!(store.question_bank.is_empty().await);
        assert!(store.audio_topics.is_empty().await);
        assert!(store.mock_papers.is_empty().await);
        assert!(store.submissions.is_empty().await);
    }
}
