#[cfg(test)]
pub mod memory;
pub mod models;
pub mod mongo;

#[cfg(test)]
pub use memory::MemoryThoughtStore;
pub use models::{NewThought, Thought, ThoughtId, ThoughtPatch, ThoughtReplacement};
pub use mongo::MongoThoughtStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for {field}: {value:?}")]
    Duplicate { field: &'static str, value: String },

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("stored documents hold duplicate values for {field}; unique index cannot be built")]
    IndexConflict { field: &'static str },

    #[error("corrupt document {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for the thoughts collection.
///
/// Every operation touches a single document. Lookups by id return `None`
/// when nothing matches.
#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Newest first, at most `limit` records.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>>;

    async fn insert(&self, thought: NewThought) -> Result<Thought>;

    /// Atomically add one heart and return the updated record.
    async fn increment_hearts(&self, id: ThoughtId) -> Result<Option<Thought>>;

    async fn update(&self, id: ThoughtId, patch: ThoughtPatch) -> Result<Option<Thought>>;

    async fn replace(
        &self,
        id: ThoughtId,
        replacement: ThoughtReplacement,
    ) -> Result<Option<Thought>>;

    /// Remove and return the record.
    async fn delete(&self, id: ThoughtId) -> Result<Option<Thought>>;

    async fn count(&self) -> Result<u64>;

    async fn ping(&self) -> Result<()>;
}
