use super::{
    NewThought, Result, StoreError, Thought, ThoughtId, ThoughtPatch, ThoughtReplacement,
    ThoughtStore,
};
use crate::config::StorageConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// On-disk shape of a thought. Unknown fields (e.g. `__v`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThoughtDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    message: String,
    #[serde(default)]
    hearts: i64,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
}

impl TryFrom<ThoughtDocument> for Thought {
    type Error = StoreError;

    fn try_from(doc: ThoughtDocument) -> Result<Self> {
        let created_at = from_bson_datetime(doc.created_at).ok_or_else(|| StoreError::Corrupt {
            id: doc.id.to_hex(),
            reason: "createdAt out of range".to_string(),
        })?;

        Ok(Thought {
            id: doc.id,
            message: doc.message,
            hearts: doc.hearts,
            created_at,
        })
    }
}

fn to_bson_datetime(ts: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(ts.timestamp_millis())
}

fn from_bson_datetime(ts: bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ts.timestamp_millis())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Map a driver error, reporting unique-index violations on `message`.
fn map_write_error(err: mongodb::error::Error, message: Option<&str>) -> StoreError {
    match message {
        Some(value) if is_duplicate_key(&err) => StoreError::Duplicate {
            field: "message",
            value: value.to_string(),
        },
        _ => StoreError::Database(err),
    }
}

/// Building the unique index fails when stored thoughts already share a message.
fn map_index_error(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        error!(
            error = %err,
            "Stored thoughts share messages; remove duplicates before the `message` index can be built"
        );
        return StoreError::IndexConflict { field: "message" };
    }
    StoreError::Database(err)
}

/// `$set` body for a patch. Empty when the patch names no field.
fn patch_document(patch: &ThoughtPatch) -> Document {
    let mut set = Document::new();
    if let Some(message) = &patch.message {
        set.insert("message", message.as_str());
    }
    if let Some(hearts) = patch.hearts {
        set.insert("hearts", hearts);
    }
    if let Some(created_at) = patch.created_at {
        set.insert("createdAt", to_bson_datetime(created_at));
    }
    set
}

fn replacement_document(replacement: &ThoughtReplacement) -> Document {
    let mut set = doc! {
        "message": replacement.message.as_str(),
        "hearts": replacement.hearts,
    };
    if let Some(created_at) = replacement.created_at {
        set.insert("createdAt", to_bson_datetime(created_at));
    }
    set
}

fn into_thought(doc: Option<ThoughtDocument>) -> Result<Option<Thought>> {
    doc.map(Thought::try_from).transpose()
}

/// MongoDB-backed thought store
pub struct MongoThoughtStore {
    database: Database,
    collection: Collection<ThoughtDocument>,
}

impl MongoThoughtStore {
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.mongo_url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.database));
        let collection = database.collection::<ThoughtDocument>(&config.collection);

        info!(
            database = %database.name(),
            collection = %config.collection,
            "Connected to MongoDB"
        );

        Ok(Self {
            database,
            collection,
        })
    }

    /// Unique index on `message`, descending index on `createdAt`.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique_message = IndexModel::builder()
            .keys(doc! { "message": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let newest_first = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .build();

        self.collection
            .create_indexes([unique_message, newest_first])
            .await
            .map_err(map_index_error)?;
        Ok(())
    }
}

#[async_trait]
impl ThoughtStore for MongoThoughtStore {
    async fn list_recent(&self, limit: usize) -> Result<Vec<Thought>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .limit(limit as i64)
            .await?;

        let docs: Vec<ThoughtDocument> = cursor.try_collect().await?;
        docs.into_iter().map(Thought::try_from).collect()
    }

    async fn insert(&self, thought: NewThought) -> Result<Thought> {
        let doc = ThoughtDocument {
            id: ObjectId::new(),
            message: thought.message,
            hearts: 0,
            created_at: bson::DateTime::now(),
        };

        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| map_write_error(e, Some(&doc.message)))?;

        Thought::try_from(doc)
    }

    async fn increment_hearts(&self, id: ThoughtId) -> Result<Option<Thought>> {
        let doc = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "hearts": 1 } })
            .return_document(ReturnDocument::After)
            .await?;
        into_thought(doc)
    }

    async fn update(&self, id: ThoughtId, patch: ThoughtPatch) -> Result<Option<Thought>> {
        if patch.is_empty() {
            let doc = self.collection.find_one(doc! { "_id": id }).await?;
            return into_thought(doc);
        }

        let set = patch_document(&patch);

        let doc = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write_error(e, patch.message.as_deref()))?;
        into_thought(doc)
    }

    async fn replace(
        &self,
        id: ThoughtId,
        replacement: ThoughtReplacement,
    ) -> Result<Option<Thought>> {
        let set = replacement_document(&replacement);
        let doc = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write_error(e, Some(&replacement.message)))?;
        into_thought(doc)
    }

    async fn delete(&self, id: ThoughtId) -> Result<Option<Thought>> {
        let doc = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        into_thought(doc)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
