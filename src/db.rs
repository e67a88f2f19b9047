use std::time::Duration;

use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{
    Client, Collection, Database as MongoDatabase,
    bson::{Document, doc, oid::ObjectId},
};
use once_cell::sync::OnceCell;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::CONFIG;
use crate::data_models::ChatDoc;

/// Global database instance
static DB: OnceCell<Database> = OnceCell::new();

/// Collection names as constants for consistency
pub mod collections {
    pub const CHATS: &str = "chats";
}

/// Main database wrapper providing connection management and collection access
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    db: MongoDatabase,
}

impl Database {
    /// Create a new Database instance with custom URI and database name.
    /// Useful for testing with a different database.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        let client_options = ClientOptions::parse(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;

        let client =
            Client::with_options(client_options).context("Failed to create MongoDB client")?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .context("Failed to connect to MongoDB")?;

        log::info!("Connected to MongoDB database: {}", db_name);

        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Create a Database instance using environment configuration
    pub async fn from_config() -> Result<Self> {
        Self::new(&CONFIG.mongo_uri, &CONFIG.mongo_db_name).await
    }

    /// Initialize the global database instance.
    /// Call this once at application startup.
    pub async fn init_global() -> Result<&'static Database> {
        let db = Self::from_config().await?;
        DB.set(db)
            .map_err(|_| anyhow::anyhow!("Database already initialized"))?;
        Ok(DB.get().unwrap())
    }

    /// Get the global database instance.
    /// Panics if database hasn't been initialized.
    pub fn get() -> &'static Database {
        DB.get()
            .expect("Database not initialized. Call Database::init_global() first.")
    }

    /// Get a typed collection by name
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.db.collection(name)
    }

    /// Get the underlying MongoDB client (for advanced operations)
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the chats collection
    pub fn chats(&self) -> Collection<ChatDoc> {
        self.collection(collections::CHATS)
    }

    /// Get a repository for chat documents
    pub fn chats_repo(&self) -> Repository<ChatDoc> {
        Repository::new(self.chats())
    }
}

// =============================================================================
// Generic CRUD operations
// =============================================================================

/// Thin generic repository over a collection for the common operations the
/// chat history needs.
pub struct Repository<T>
where
    T: Send + Sync,
{
    collection: Collection<T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }

    /// Insert a single document
    pub async fn insert(&self, doc: &T) -> Result<ObjectId> {
        let result = self
            .collection
            .insert_one(doc)
            .await
            .context("Failed to insert document")?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| anyhow::anyhow!("Failed to get inserted ObjectId"))
    }

    /// Find a document by ObjectId
    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>> {
        let filter = doc! { "_id": id };
        self.collection
            .find_one(filter)
            .await
            .context("Failed to find document by id")
    }

    /// Count documents matching a filter
    pub async fn count(&self, filter: Document) -> Result<u64> {
        self.collection
            .count_documents(filter)
            .await
            .context("Failed to count documents")
    }

    /// Delete a document by ObjectId
    pub async fn delete_by_id(&self, id: ObjectId) -> Result<bool> {
        let filter = doc! { "_id": id };
        let result = self
            .collection
            .delete_one(filter)
            .await
            .context("Failed to delete document")?;

        Ok(result.deleted_count > 0)
    }
}

// =============================================================================
// Chat-history operations
// =============================================================================

const MAX_SAVE_ATTEMPTS: u32 = 3;
const SAVE_BACKOFF_MS: u64 = 500;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Persistence for chat turns. Writes retry with linear backoff; reads are a
/// single attempt.
pub struct ChatRepo {
    repo: Repository<ChatDoc>,
}

impl ChatRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            repo: db.chats_repo(),
        }
    }

    /// Insert one chat turn, retrying up to [`MAX_SAVE_ATTEMPTS`] times with
    /// linear backoff. A turn without user/session ids is rejected before
    /// any write.
    pub async fn save_turn(&self, turn: &ChatDoc) -> Result<ObjectId> {
        validate_turn(turn)?;

        let mut last_err = None;
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            match self.repo.insert(turn).await {
                Ok(id) => return Ok(id),
                Err(e) => {
                    log::warn!("saving chat turn failed (attempt {attempt}): {e:#}");
                    last_err = Some(e);
                    if attempt < MAX_SAVE_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(SAVE_BACKOFF_MS * attempt as u64))
                            .await;
                    }
                }
            }
        }
        Err(last_err.unwrap())
    }

    /// Most recent turns for a user, newest first.
    pub async fn recent_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<ChatDoc>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .build();

        let cursor = self
            .repo
            .collection
            .find(doc! { "user_id": user_id })
            .with_options(options)
            .await
            .context("Failed to query chat history")?;

        cursor
            .try_collect()
            .await
            .context("Failed to collect chat history")
    }

    /// Number of persisted turns for a user.
    pub async fn count_for_user(&self, user_id: &str) -> Result<u64> {
        self.repo.count(doc! { "user_id": user_id }).await
    }
}

fn validate_turn(turn: &ChatDoc) -> Result<()> {
    if turn.user_id.is_empty() || turn.session_id.is_empty() {
        anyhow::bail!("chat turn requires user and session ids");
    }
    Ok(())
}

// =============================================================================
// Test utilities
// =============================================================================

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TEST_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Create a unique test database name
    pub fn unique_test_db_name() -> String {
        let count = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis();
        format!("pandu_test_{}_{}", timestamp, count)
    }

    /// Create a test database instance.
    /// Uses MONGO_URI from environment but creates a unique test database.
    pub async fn create_test_db() -> Result<(Database, String)> {
        dotenvy::dotenv().ok();
        let uri =
            std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = unique_test_db_name();
        let db = Database::new(&uri, &db_name).await?;
        Ok((db, db_name))
    }

    /// Clean up a test database by dropping it
    pub async fn cleanup_test_db(db: &Database, db_name: &str) -> Result<()> {
        db.client()
            .database(db_name)
            .drop()
            .await
            .context("Failed to drop test database")?;
        Ok(())
    }
}
