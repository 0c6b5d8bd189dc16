use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::Serialize;

pub type ThoughtId = ObjectId;

/// A stored thought, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thought {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ThoughtId,
    pub message: String,
    pub hearts: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A validated message ready to be stored.
#[derive(Debug, Clone)]
pub struct NewThought {
    pub message: String,
}

/// Fields to merge into an existing thought. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ThoughtPatch {
    pub message: Option<String>,
    pub hearts: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ThoughtPatch {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.hearts.is_none() && self.created_at.is_none()
    }
}

/// Full representation written over an existing thought.
///
/// `created_at` is only overwritten when supplied.
#[derive(Debug, Clone)]
pub struct ThoughtReplacement {
    pub message: String,
    pub hearts: i64,
    pub created_at: Option<DateTime<Utc>>,
}
