//! In-process table and photo container with per-operation failure injection.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{BackendError, CabinTable, PhotoBucket};
use crate::cabins::{Cabin, CabinRow, PhotoUpload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    SelectAll,
    SelectById,
    Insert,
    Update,
    Delete,
    Restore,
    Upload,
    Remove,
}

#[derive(Default)]
struct State {
    rows: BTreeMap<i64, Cabin>,
    blobs: BTreeMap<String, PhotoUpload>,
    last_id: i64,
    failing: HashSet<Op>,
    calls: Vec<Op>,
    last_update: HashMap<i64, Cabin>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    /// Every later call of `op` fails.
    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.lock().calls.clone()
    }

    pub fn row(&self, id: i64) -> Option<Cabin> {
        self.lock().rows.get(&id).cloned()
    }

    pub fn rows(&self) -> Vec<Cabin> {
        self.lock().rows.values().cloned().collect()
    }

    pub fn blob_names(&self) -> Vec<String> {
        self.lock().blobs.keys().cloned().collect()
    }

    /// Row as written by the most recent `update` of `id`.
    pub fn last_update(&self, id: i64) -> Option<Cabin> {
        self.lock().last_update.get(&id).cloned()
    }

    /// Puts a row in place without recording a call.
    pub fn seed(&self, id: i64, row: &CabinRow) {
        let mut state = self.lock();
        state.last_id = state.last_id.max(id);
        state.rows.insert(id, cabin_from_row(id, row));
    }

    /// Puts a blob in place without recording a call.
    pub fn seed_blob(&self, blob_name: &str) {
        let photo = PhotoUpload {
            file_name: blob_name.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8],
        };
        self.lock().blobs.insert(blob_name.to_string(), photo);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the call and returns the state unless `op` is set to fail.
    fn begin(&self, op: Op) -> Result<MutexGuard<'_, State>, BackendError> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.failing.contains(&op) {
            let message = format!("injected {:?} failure", op);
            return Err(match op {
                Op::Upload | Op::Remove => BackendError::Storage(message),
                _ => BackendError::Database(sqlx::Error::Protocol(message)),
            });
        }
        Ok(state)
    }
}

fn cabin_from_row(id: i64, row: &CabinRow) -> Cabin {
    Cabin {
        id,
        created_at: Utc::now(),
        name: row.name.clone(),
        max_capacity: row.max_capacity,
        regular_price: row.regular_price,
        discount: row.discount,
        description: row.description.clone(),
        image: row.image.clone(),
    }
}

#[async_trait]
impl CabinTable for MemoryBackend {
    async fn select_all(&self) -> Result<Vec<Cabin>, BackendError> {
        let state = self.begin(Op::SelectAll)?;
        Ok(state.rows.values().cloned().collect())
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Cabin>, BackendError> {
        let state = self.begin(Op::SelectById)?;
        Ok(state.rows.get(&id).cloned())
    }

    async fn insert(&self, row: &CabinRow) -> Result<Cabin, BackendError> {
        let mut state = self.begin(Op::Insert)?;
        state.last_id += 1;
        let cabin = cabin_from_row(state.last_id, row);
        state.rows.insert(cabin.id, cabin.clone());
        Ok(cabin)
    }

    async fn update(&self, id: i64, row: &CabinRow) -> Result<Option<Cabin>, BackendError> {
        let mut state = self.begin(Op::Update)?;
        let Some(existing) = state.rows.get(&id) else {
            return Ok(None);
        };
        let cabin = Cabin {
            created_at: existing.created_at,
            ..cabin_from_row(id, row)
        };
        state.rows.insert(id, cabin.clone());
        state.last_update.insert(id, cabin.clone());
        Ok(Some(cabin))
    }

    async fn delete(&self, id: i64) -> Result<bool, BackendError> {
        let mut state = self.begin(Op::Delete)?;
        Ok(state.rows.remove(&id).is_some())
    }

    async fn restore(&self, cabin: &Cabin) -> Result<(), BackendError> {
        let mut state = self.begin(Op::Restore)?;
        state.rows.insert(cabin.id, cabin.clone());
        Ok(())
    }
}

#[async_trait]
impl PhotoBucket for MemoryBackend {
    async fn upload(&self, blob_name: &str, photo: &PhotoUpload) -> Result<(), BackendError> {
        let mut state = self.begin(Op::Upload)?;
        state.blobs.insert(blob_name.to_string(), photo.clone());
        Ok(())
    }

    async fn remove(&self, blob_name: &str) -> Result<(), BackendError> {
        let mut state = self.begin(Op::Remove)?;
        state.blobs.remove(blob_name);
        Ok(())
    }
}
