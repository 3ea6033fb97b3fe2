use async_trait::async_trait;
use mongodb::Client;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::record::AdjustmentRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for adjustment records.
///
/// Exactly one insert attempt is made per request; a failure is surfaced
/// immediately and never retried.
#[async_trait]
pub trait AdjustmentStore: Send + Sync {
    async fn insert(&self, record: &AdjustmentRecord) -> Result<(), StoreError>;
}

/// MongoDB-backed store.
///
/// A fresh client connection is established per insert with no pooling or
/// reuse. The driver's default acknowledged write concern confirms the
/// insert before `insert` returns.
pub struct MongoStore {
    url: String,
    database: String,
    collection: String,
}

impl MongoStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            url: config.url.clone(),
            database: config.database.clone(),
            collection: config.collection.clone(),
        }
    }
}

#[async_trait]
impl AdjustmentStore for MongoStore {
    async fn insert(&self, record: &AdjustmentRecord) -> Result<(), StoreError> {
        let client = Client::with_uri_str(&self.url).await?;
        let collection = client
            .database(&self.database)
            .collection::<AdjustmentRecord>(&self.collection);
        collection.insert_one(record).await?;
        Ok(())
    }
}
