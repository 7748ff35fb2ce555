//! Shared data store for users, inventory and reservations
//!
//! All four collections live in memory behind one lock and are written
//! through to a [`Storage`] backend after every mutation. A mutation that
//! cannot be persisted is rolled back, so readers only ever see stored state.

pub mod equipment;
pub mod reservations;
pub mod rooms;
pub mod seed;
pub mod storage;
pub mod users;

use chrono::Utc;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::error::{AppError, AppResult};
use crate::models::{Equipment, Reservation, Room, User};
use storage::Storage;

/// Records keyed by id, in insertion order
pub type Collection<T> = IndexMap<String, T>;

/// Snapshot of every collection
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub users: Collection<User>,
    pub equipment: Collection<Equipment>,
    pub rooms: Collection<Room>,
    pub reservations: Collection<Reservation>,
}

/// A record type stored as one collection under a fixed storage key
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Storage key of the collection
    const KEY: &'static str;
    /// Prefix of generated ids
    const ID_PREFIX: &'static str;
    /// Human readable name used in error messages
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn collection(data: &DataSet) -> &Collection<Self>;
    fn collection_mut(data: &mut DataSet) -> &mut Collection<Self>;

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("{} {} not found", Self::LABEL, id))
    }
}

/// Next id for a collection: the prefix followed by one more than the largest
/// numeric suffix in use. Ids that do not follow the pattern are ignored.
pub fn next_id<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a String>) -> String {
    let max = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{}", prefix, max.saturating_add(1))
}

/// Main repository handle, cheap to clone
#[derive(Clone)]
pub struct Repository {
    data: Arc<RwLock<DataSet>>,
    storage: Arc<dyn Storage>,
}

impl Repository {
    /// Load every collection from `storage`.
    ///
    /// A key that was never written is seeded with the built-in data set when
    /// `seed_defaults` is set (empty otherwise). A key that cannot be read or
    /// parsed is logged and replaced by the same fallback.
    pub async fn open(storage: Arc<dyn Storage>, seed_defaults: bool) -> AppResult<Self> {
        let now = Utc::now();
        let data = DataSet {
            users: load_collection(storage.as_ref(), seed_defaults, seed::users).await?,
            equipment: load_collection(storage.as_ref(), seed_defaults, seed::equipment).await?,
            rooms: load_collection(storage.as_ref(), seed_defaults, seed::rooms).await?,
            reservations: load_collection(storage.as_ref(), seed_defaults, || {
                seed::reservations(now)
            })
            .await?,
        };

        tracing::info!(
            users = data.users.len(),
            equipment = data.equipment.len(),
            rooms = data.rooms.len(),
            reservations = data.reservations.len(),
            "Data store loaded"
        );

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            storage,
        })
    }

    /// Read access to every collection at once
    pub async fn read(&self) -> RwLockReadGuard<'_, DataSet> {
        self.data.read().await
    }

    pub async fn list<T: Record>(&self) -> Vec<T> {
        T::collection(&*self.data.read().await)
            .values()
            .cloned()
            .collect()
    }

    pub async fn get<T: Record>(&self, id: &str) -> AppResult<T> {
        T::collection(&*self.data.read().await)
            .get(id)
            .cloned()
            .ok_or_else(|| T::not_found(id))
    }

    /// Insert the record built by `build` under a freshly allocated id.
    /// `build` sees the whole data set so it can check cross-record rules.
    pub async fn insert_with<T, F>(&self, build: F) -> AppResult<T>
    where
        T: Record,
        F: FnOnce(&DataSet, String) -> AppResult<T>,
    {
        self.transact::<T, _, _>(|data| {
            let id = next_id(T::ID_PREFIX, T::collection(data).keys());
            if T::collection(data).contains_key(&id) {
                return Err(AppError::Conflict(format!("No free {} id left", T::LABEL)));
            }
            let record = build(&*data, id.clone())?;
            T::collection_mut(data).insert(id, record.clone());
            Ok(record)
        })
        .await
    }

    /// Apply `change` to the record `id` and return its new state.
    pub async fn update_with<T, F>(&self, id: &str, change: F) -> AppResult<T>
    where
        T: Record,
        F: FnOnce(&DataSet, &mut T) -> AppResult<()>,
    {
        self.transact::<T, _, _>(|data| {
            let mut record = T::collection(data)
                .get(id)
                .cloned()
                .ok_or_else(|| T::not_found(id))?;
            change(&*data, &mut record)?;
            T::collection_mut(data).insert(id.to_string(), record.clone());
            Ok(record)
        })
        .await
    }

    /// Remove exactly the record `id`, returning it
    pub async fn delete<T: Record>(&self, id: &str) -> AppResult<T> {
        self.transact::<T, _, _>(|data| {
            T::collection_mut(data)
                .shift_remove(id)
                .ok_or_else(|| T::not_found(id))
        })
        .await
    }

    /// Run `f` under the write lock, then persist `T`'s collection.
    /// The collection is restored if `f` fails or the write does.
    async fn transact<T, R, F>(&self, f: F) -> AppResult<R>
    where
        T: Record,
        F: FnOnce(&mut DataSet) -> AppResult<R>,
    {
        let mut data = self.data.write().await;
        let snapshot = T::collection(&*data).clone();

        let result = match f(&mut *data) {
            Ok(out) => write_collection(self.storage.as_ref(), T::collection(&*data))
                .await
                .map(|()| out),
            Err(e) => Err(e),
        };

        if result.is_err() {
            *T::collection_mut(&mut *data) = snapshot;
        }
        result
    }
}

async fn write_collection<T: Record>(storage: &dyn Storage, collection: &Collection<T>) -> AppResult<()> {
    let records: Vec<&T> = collection.values().collect();
    let body = serde_json::to_string(&records)?;
    storage.set(T::KEY, &body).await
}

async fn load_collection<T, F>(storage: &dyn Storage, seed_defaults: bool, defaults: F) -> AppResult<Collection<T>>
where
    T: Record,
    F: FnOnce() -> Vec<T>,
{
    let fallback = |defaults: F| if seed_defaults { defaults() } else { Vec::new() };

    let records = match storage.get(T::KEY).await {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => return Ok(index_records(records)),
            Err(e) => {
                tracing::error!("Failed to parse stored {}: {}. Falling back to defaults", T::KEY, e);
                fallback(defaults)
            }
        },
        Ok(None) => {
            tracing::debug!("No stored {}, initializing", T::KEY);
            fallback(defaults)
        }
        Err(e) => {
            tracing::error!("Failed to read stored {}: {}. Falling back to defaults", T::KEY, e);
            fallback(defaults)
        }
    };

    let collection = index_records(records);
    write_collection(storage, &collection).await?;
    Ok(collection)
}

fn index_records<T: Record>(records: Vec<T>) -> Collection<T> {
    let mut collection = Collection::with_capacity(records.len());
    for record in records {
        let id = record.id().to_string();
        if collection.insert(id.clone(), record).is_some() {
            tracing::warn!("Duplicate {} id {} in storage, keeping the last one", T::LABEL, id);
        }
    }
    collection
}

#[cfg(test)]
mod tests {
    use super::storage::{MemoryStorage, EQUIPMENT_KEY, RESERVATIONS_KEY, USERS_KEY};
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;

    #[test]
    fn test_next_id() {
        let ids: Vec<String> = vec!["e1".into(), "e7".into(), "e3".into(), "custom".into()];
        assert_eq!(next_id("e", &ids), "e8");
        assert_eq!(next_id("res", &Vec::<String>::new()), "res1");
        let user_ids: Vec<String> = vec!["1".into(), "2".into(), "3".into()];
        assert_eq!(next_id("", &user_ids), "4");
    }

    #[tokio::test]
    async fn test_exhausted_id_space_is_a_conflict() {
        let ids: Vec<String> = vec![format!("e{}", u64::MAX)];
        assert_eq!(next_id("e", &ids), format!("e{}", u64::MAX));

        let storage = Arc::new(MemoryStorage::new());
        let mut seeded = seed::equipment();
        seeded[0].id = format!("e{}", u64::MAX);
        storage
            .set(EQUIPMENT_KEY, &serde_json::to_string(&seeded).unwrap())
            .await
            .unwrap();
        let repo = Repository::open(storage, true).await.unwrap();

        let mut template = seeded[1].clone();
        let result = repo
            .insert_with::<Equipment, _>(move |_, id| {
                template.id = id;
                Ok(template)
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repo.list::<Equipment>().await.len(), 6);
    }

    #[tokio::test]
    async fn test_open_seeds_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let repo = Repository::open(storage.clone(), true).await.unwrap();

        assert_eq!(repo.list::<User>().await.len(), 3);
        assert_eq!(repo.list::<Equipment>().await.len(), 6);
        assert_eq!(repo.list::<Room>().await.len(), 3);
        assert_eq!(repo.list::<Reservation>().await.len(), 3);

        let stored = storage.get(USERS_KEY).await.unwrap().unwrap();
        let users: Vec<User> = serde_json::from_str(&stored).unwrap();
        assert_eq!(users[2].username, "admin");
    }

    #[tokio::test]
    async fn test_open_without_seed_is_empty() {
        let repo = Repository::open(Arc::new(MemoryStorage::new()), false).await.unwrap();
        assert!(repo.list::<User>().await.is_empty());
        assert!(repo.list::<Reservation>().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_falls_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(EQUIPMENT_KEY, "{not json").await.unwrap();
        storage.set(RESERVATIONS_KEY, "[]").await.unwrap();

        let repo = Repository::open(storage.clone(), true).await.unwrap();
        assert_eq!(repo.list::<Equipment>().await.len(), 6);
        // A stored empty list is real data, not a missing key
        assert!(repo.list::<Reservation>().await.is_empty());
    }

    #[tokio::test]
    async fn test_reload_preserves_data() {
        let storage = Arc::new(MemoryStorage::new());
        let repo = Repository::open(storage.clone(), true).await.unwrap();
        let before = repo.get::<Reservation>("res2").await.unwrap();
        repo.delete::<Room>("r2").await.unwrap();

        let reopened = Repository::open(storage, true).await.unwrap();
        assert_eq!(reopened.get::<Reservation>("res2").await.unwrap(), before);
        let rooms: Vec<String> = reopened.list::<Room>().await.into_iter().map(|r| r.id).collect();
        assert_eq!(rooms, vec!["r1", "r3"]);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one_record() {
        let repo = Repository::open(Arc::new(MemoryStorage::new()), true).await.unwrap();
        let removed = repo.delete::<Equipment>("e3").await.unwrap();
        assert_eq!(removed.name, "Sony a7 IV");

        let ids: Vec<String> = repo.list::<Equipment>().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["e1", "e2", "e4", "e5", "e6"]);
        assert!(matches!(repo.delete::<Equipment>("e3").await, Err(AppError::NotFound(_))));
    }

    struct FailingWrites(MemoryStorage);

    #[async_trait]
    impl Storage for FailingWrites {
        async fn get(&self, key: &str) -> AppResult<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let seeded = MemoryStorage::new();
        for key in [USERS_KEY, EQUIPMENT_KEY, RESERVATIONS_KEY, storage::ROOMS_KEY] {
            seeded.set(key, "[]").await.unwrap();
        }
        let repo = Repository::open(Arc::new(FailingWrites(seeded)), false).await.unwrap();

        let result = repo
            .insert_with::<Room, _>(|_, id| {
                Ok(Room {
                    id,
                    name: "Studio B".to_string(),
                    capacity: 4,
                    equipment: vec!["Mixer".to_string()],
                    image_url: String::new(),
                    ai_hint: "studio".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(repo.list::<Room>().await.is_empty());
    }
}
