//! Link store backed by the embedded redb database
//!
//! Defines the database tables, the `LinkStore` handle with its persistence
//! operations, and the application state shared across request handlers.
//!
//! Every operation runs as a single redb transaction. redb serializes write
//! transactions, which is what makes the create-uniqueness check and the
//! click increment race-safe without any application-level locking.

use std::sync::Arc;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::model::Link;

/// Main table for link records
///
/// Key: short code as string
/// Value: JSON-serialized Link as string
///
/// Example:
/// - Key: "abc123"
/// - Value: '{"id":"...","code":"abc123","targetUrl":"https://example.com",...}'
pub const TABLE_LINKS: TableDefinition<&str, &str> = TableDefinition::new("links_v1");

/// Creation-time index for newest-first listing
///
/// Key: composite key in format "{zero-padded created_at micros}:{code}"
/// Value: the short code
///
/// Keys sort ascending by creation time, so iterating in reverse yields
/// newest first. The value is only the code (not the record) so listings
/// always read current click counts from the main table.
pub const TABLE_CREATED_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("created_index_v1");

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the persistent link store.
    pub store: LinkStore,

    /// Base URL used to compose short URLs in API responses.
    pub base_url: String,
}

/// Persistent store for link records.
///
/// Cheap to clone; all clones share one embedded database.
#[derive(Clone)]
pub struct LinkStore {
    db: Arc<Database>,
}

impl LinkStore {
    /// Opens (or creates) the database file and ensures both tables exist.
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let db = Database::create(db_path)?;

        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(TABLE_LINKS)?;
            write_txn.open_table(TABLE_CREATED_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Looks up a link by its short code.
    pub fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINKS)?;

        match table.get(code)? {
            Some(guard) => Ok(Some(serde_json::from_str(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Creates a new link record for `code`.
    ///
    /// The existence check and the insert happen inside one write
    /// transaction, so two concurrent creates with the same code cannot both
    /// succeed; the loser gets [`StoreError::Duplicate`].
    pub fn create(&self, code: &str, target_url: &str) -> Result<Link, StoreError> {
        let link = Link::new(code, target_url);
        let record = serde_json::to_string(&link)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut links = write_txn.open_table(TABLE_LINKS)?;

            if links.get(code)?.is_some() {
                // Dropping the transaction aborts it.
                return Err(StoreError::Duplicate);
            }
            links.insert(code, record.as_str())?;

            let mut index = write_txn.open_table(TABLE_CREATED_INDEX)?;
            index.insert(Self::index_key(&link).as_str(), code)?;
        }
        write_txn.commit()?;

        Ok(link)
    }

    /// Atomically increments the click counter and stamps the last-click
    /// time, returning the updated record.
    ///
    /// An absent code is a no-op that returns `None`; a concurrent delete
    /// therefore degrades to a lost hit, never an error.
    pub fn record_hit(&self, code: &str) -> Result<Option<Link>, StoreError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut links = write_txn.open_table(TABLE_LINKS)?;

            let existing = match links.get(code)? {
                Some(guard) => Some(serde_json::from_str::<Link>(guard.value())?),
                None => None,
            };

            match existing {
                Some(mut link) => {
                    link.total_clicks += 1;
                    link.last_clicked_at = Some(Utc::now());
                    let record = serde_json::to_string(&link)?;
                    links.insert(code, record.as_str())?;
                    Some(link)
                }
                None => None,
            }
        };
        write_txn.commit()?;

        Ok(updated)
    }

    /// Hard-deletes a link and its index entry. Returns whether a record
    /// existed.
    pub fn delete(&self, code: &str) -> Result<bool, StoreError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut links = write_txn.open_table(TABLE_LINKS)?;

            let existing = match links.remove(code)? {
                Some(guard) => Some(serde_json::from_str::<Link>(guard.value())?),
                None => None,
            };

            match existing {
                Some(link) => {
                    let mut index = write_txn.open_table(TABLE_CREATED_INDEX)?;
                    index.remove(Self::index_key(&link).as_str())?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;

        Ok(removed)
    }

    /// Lists all links ordered by creation time, newest first.
    pub fn list_all(&self) -> Result<Vec<Link>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let links = read_txn.open_table(TABLE_LINKS)?;
        let index = read_txn.open_table(TABLE_CREATED_INDEX)?;

        let mut result = Vec::new();
        for entry in index.iter()?.rev() {
            let (_, code) = entry?;
            if let Some(guard) = links.get(code.value())? {
                result.push(serde_json::from_str(guard.value())?);
            }
        }

        Ok(result)
    }

    /// Composite index key: zero-padded creation micros plus the code for
    /// uniqueness.
    fn index_key(link: &Link) -> String {
        format!("{:020}:{}", link.created_at.timestamp_micros(), link.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_store() -> (LinkStore, NamedTempFile) {
        let temp_db = NamedTempFile::new().expect("Failed to create temp file");
        let store = LinkStore::open(temp_db.path().to_str().unwrap())
            .expect("Failed to open test store");
        (store, temp_db)
    }

    #[test]
    fn test_create_and_find() {
        let (store, _temp_db) = temp_store();

        let created = store.create("abc123", "https://example.com").unwrap();
        assert_eq!(created.total_clicks, 0);
        assert!(created.last_clicked_at.is_none());

        let found = store.find_by_code("abc123").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.target_url, "https://example.com");
    }

    #[test]
    fn test_find_absent_code() {
        let (store, _temp_db) = temp_store();
        assert!(store.find_by_code("nothere").unwrap().is_none());
    }

    #[test]
    fn test_create_duplicate_code() {
        let (store, _temp_db) = temp_store();

        store.create("abc123", "https://x.com").unwrap();
        let err = store.create("abc123", "https://y.com").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));

        // First record must be untouched.
        let found = store.find_by_code("abc123").unwrap().unwrap();
        assert_eq!(found.target_url, "https://x.com");
    }

    #[test]
    fn test_record_hit_increments_and_touches() {
        let (store, _temp_db) = temp_store();

        let created = store.create("abc123", "https://example.com").unwrap();

        let hit = store.record_hit("abc123").unwrap().unwrap();
        assert_eq!(hit.total_clicks, 1);
        let clicked_at = hit.last_clicked_at.unwrap();
        assert!(clicked_at >= created.created_at);

        let hit = store.record_hit("abc123").unwrap().unwrap();
        assert_eq!(hit.total_clicks, 2);
    }

    #[test]
    fn test_record_hit_absent_code() {
        let (store, _temp_db) = temp_store();
        assert!(store.record_hit("nothere").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (store, _temp_db) = temp_store();

        store.create("abc123", "https://example.com").unwrap();
        assert!(store.delete("abc123").unwrap());
        assert!(store.find_by_code("abc123").unwrap().is_none());
        assert!(!store.delete("abc123").unwrap());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_all_newest_first() {
        let (store, _temp_db) = temp_store();

        store.create("first1", "https://example.com/1").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.create("second2", "https://example.com/2").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        store.create("third33", "https://example.com/3").unwrap();

        let codes: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["third33", "second2", "first1"]);
    }

    #[test]
    fn test_list_reflects_current_clicks() {
        let (store, _temp_db) = temp_store();

        store.create("abc123", "https://example.com").unwrap();
        store.record_hit("abc123").unwrap();

        let links = store.list_all().unwrap();
        assert_eq!(links[0].total_clicks, 1);
    }
}
