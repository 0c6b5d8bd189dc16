// In-memory store for router and handler tests
use super::{
    NewThought, Result, StoreError, Thought, ThoughtId, ThoughtPatch, ThoughtReplacement,
    ThoughtStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryThoughtStore {
    thoughts: RwLock<HashMap<ThoughtId, Thought>>,
}

impl MemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, bypassing validation.
    pub async fn seed(&self, thought: Thought) {
        self.thoughts.write().await.insert(thought.id, thought);
    }
}

impl Thought {
    fn apply_patch(&mut self, patch: ThoughtPatch) {
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(hearts) = patch.hearts {
            self.hearts = hearts;
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
    }

    fn apply_replacement(&mut self, replacement: ThoughtReplacement) {
        self.message = replacement.message;
        self.hearts = replacement.hearts;
        if let Some(created_at) = replacement.created_at {
            self.created_at = created_at;
        }
    }
}

fn check_unique(
    thoughts: &HashMap<ThoughtId, Thought>,
    id: Option<ThoughtId>,
    message: &str,
) -> Result<()> {
    let taken = thoughts
        .values()
        .any(|t| t.message == message && Some(t.id) != id);
    if taken {
        return Err(StoreError::Duplicate {
            field: "message",
            value: message.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl ThoughtStore for MemoryThoughtStore {
    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>> {
        let mut thoughts: Vec<Thought> = self.thoughts.read().await.values().cloned().collect();
        thoughts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        thoughts.truncate(limit);
        Ok(thoughts)
    }

    async fn insert(&self, thought: NewThought) -> Result<Thought> {
        let mut thoughts = self.thoughts.write().await;
        check_unique(&thoughts, None, &thought.message)?;

        let thought = Thought {
            id: ThoughtId::new(),
            message: thought.message,
            hearts: 0,
            created_at: Utc::now(),
        };
        thoughts.insert(thought.id, thought.clone());
        Ok(thought)
    }

    async fn increment_hearts(&self, id: ThoughtId) -> Result<Option<Thought>> {
        let mut thoughts = self.thoughts.write().await;
        Ok(thoughts.get_mut(&id).map(|t| {
            t.hearts += 1;
            t.clone()
        }))
    }

    async fn update(&self, id: ThoughtId, patch: ThoughtPatch) -> Result<Option<Thought>> {
        let mut thoughts = self.thoughts.write().await;
        if !thoughts.contains_key(&id) {
            return Ok(None);
        }
        if let Some(message) = &patch.message {
            check_unique(&thoughts, Some(id), message)?;
        }

        Ok(thoughts.get_mut(&id).map(|t| {
            t.apply_patch(patch);
            t.clone()
        }))
    }

    async fn replace(
        &self,
        id: ThoughtId,
        replacement: ThoughtReplacement,
    ) -> Result<Option<Thought>> {
        let mut thoughts = self.thoughts.write().await;
        if !thoughts.contains_key(&id) {
            return Ok(None);
        }
        check_unique(&thoughts, Some(id), &replacement.message)?;

        Ok(thoughts.get_mut(&id).map(|t| {
            t.apply_replacement(replacement);
            t.clone()
        }))
    }

    async fn delete(&self, id: ThoughtId) -> Result<Option<Thought>> {
        Ok(self.thoughts.write().await.remove(&id))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.thoughts.read().await.len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_thought(message: &str) -> NewThought {
        NewThought {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_defaults() {
        let store = MemoryThoughtStore::new();
        let thought = store.insert(new_thought("Hello world")).await.unwrap();
        assert_eq!(thought.hearts, 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_message_is_rejected() {
        let store = MemoryThoughtStore::new();
        store.insert(new_thought("Hello world")).await.unwrap();
        let err = store.insert(new_thought("Hello world")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "message", .. }));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let store = MemoryThoughtStore::new();
        let base = Utc::now();
        for i in 0..25 {
            store
                .seed(Thought {
                    id: ThoughtId::new(),
                    message: format!("thought {}", "x".repeat(i + 1)),
                    hearts: 0,
                    created_at: base + Duration::seconds(i as i64),
                })
                .await;
        }

        let listed = store.list_recent(20).await.unwrap();
        assert_eq!(listed.len(), 20);
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(listed[0].created_at, base + Duration::seconds(24));
    }

    #[tokio::test]
    async fn patch_cannot_steal_another_message() {
        let store = MemoryThoughtStore::new();
        store.insert(new_thought("First thought")).await.unwrap();
        let second = store.insert(new_thought("Second thought")).await.unwrap();

        let err = store
            .update(
                second.id,
                ThoughtPatch {
                    message: Some("First thought".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // Re-setting its own message is fine
        let same = store
            .update(
                second.id,
                ThoughtPatch {
                    message: Some("Second thought".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(same.is_some());
    }

    #[tokio::test]
    async fn patch_only_touches_given_fields() {
        let store = MemoryThoughtStore::new();
        let before = store.insert(new_thought("Hello world")).await.unwrap();
        let after = store
            .update(
                before.id,
                ThoughtPatch {
                    hearts: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.hearts, 5);
        assert_eq!(after.message, before.message);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn replace_keeps_created_at_when_absent() {
        let store = MemoryThoughtStore::new();
        let before = store.insert(new_thought("Hello world")).await.unwrap();
        store.increment_hearts(before.id).await.unwrap();
        let after = store
            .replace(
                before.id,
                ThoughtReplacement {
                    message: "Rainy evening".to_string(),
                    hearts: 0,
                    created_at: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.message, "Rainy evening");
        assert_eq!(after.hearts, 0);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn missing_id_yields_none() {
        let store = MemoryThoughtStore::new();
        let id = ThoughtId::new();
        assert!(store.increment_hearts(id).await.unwrap().is_none());
        assert!(store.delete(id).await.unwrap().is_none());
        assert!(store
            .update(id, ThoughtPatch::default())
            .await
            .unwrap()
            .is_none());
    }
}
