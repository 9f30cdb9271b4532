//! Append-only modification log with listeners.
//!
//! Records are keyed by (object name, normalized path). Besides the full
//! sequence, the tracker keeps the latest record per key so the UI can
//! mark modified properties without scanning history.
//!
//! The log and the listener list sit behind read/write locks. Readers get
//! snapshots, and listeners are invoked after the log lock is released on a
//! cloned listener list, so observers may enumerate the log (or read it
//! from inside a callback) while the editing session keeps appending.

pub mod record;
pub mod stats;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::model::Value;
use crate::path::{is_same_or_descendant, normalize_path};

pub use record::{ModificationKind, ModificationRecord};
pub use stats::ModificationStats;

/// Observer notified synchronously for every appended record.
pub trait ModificationListener: Send + Sync {
    fn on_modification(&self, record: &ModificationRecord);
}

impl<F> ModificationListener for F
where
    F: Fn(&ModificationRecord) + Send + Sync,
{
    fn on_modification(&self, record: &ModificationRecord) {
        self(record)
    }
}

/// Handle returned by [`ModificationTracker::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type RecordKey = (String, String);

#[derive(Debug, Default)]
struct Log {
    records: Vec<Arc<ModificationRecord>>,
    latest: FxHashMap<RecordKey, Arc<ModificationRecord>>,
    next_sequence: u64,
}

/// The modification audit log.
#[derive(Default)]
pub struct ModificationTracker {
    log: RwLock<Log>,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn ModificationListener>)>>,
    next_listener: AtomicU64,
}

impl ModificationTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and notifies listeners before returning.
    ///
    /// Records without an object name are dropped and `None` is returned.
    pub fn record(
        &self,
        object: impl Into<String>,
        path: impl Into<String>,
        old_value: Option<Value>,
        new_value: Value,
        kind: ModificationKind,
        description: impl Into<String>,
    ) -> Option<Arc<ModificationRecord>> {
        let object = object.into();
        let path = path.into();
        if object.trim().is_empty() {
            tracing::warn!(path = %path, kind = %kind, "modification without object name dropped");
            return None;
        }

        let record = {
            let mut log = self.log.write();
            let sequence = log.next_sequence;
            log.next_sequence += 1;
            let key = (object.clone(), normalize_path(&path));
            let record = Arc::new(ModificationRecord {
                object,
                path,
                old_value,
                new_value,
                kind,
                description: description.into(),
                sequence,
            });
            log.records.push(Arc::clone(&record));
            log.latest.insert(key, Arc::clone(&record));
            record
        };

        self.notify(&record);
        Some(record)
    }

    fn notify(&self, record: &ModificationRecord) {
        let listeners: Vec<Arc<dyn ModificationListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener.on_modification(record);
        }
    }

    /// Removes one record. If it was the latest for its key, the next most
    /// recent record with that key takes its place, or the key is cleared.
    ///
    /// Matches by identity: only a record handed out by this tracker is
    /// removed. Returns false if the record is not in this tracker.
    pub fn remove_modification(&self, record: &ModificationRecord) -> bool {
        let mut guard = self.log.write();
        let log = &mut *guard;
        let Some(position) = log
            .records
            .iter()
            .position(|r| std::ptr::eq(Arc::as_ptr(r), record))
        else {
            return false;
        };
        let removed = log.records.remove(position);
        let key = (removed.object.clone(), normalize_path(&removed.path));

        let was_latest = log
            .latest
            .get(&key)
            .is_some_and(|latest| Arc::ptr_eq(latest, &removed));
        if was_latest {
            let replacement = log
                .records
                .iter()
                .rev()
                .find(|r| r.object == key.0 && normalize_path(&r.path) == key.1)
                .cloned();
            match replacement {
                Some(replacement) => {
                    log.latest.insert(key, replacement);
                }
                None => {
                    log.latest.remove(&key);
                }
            }
        }
        true
    }

    /// Registers a listener.
    pub fn add_listener(&self, listener: impl ModificationListener + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        let listener: Arc<dyn ModificationListener> = Arc::new(listener);
        self.listeners.write().push((id, listener));
        id
    }

    /// Unregisters a listener; returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Snapshot of every record in append order.
    pub fn records(&self) -> Vec<Arc<ModificationRecord>> {
        self.log.read().records.clone()
    }

    /// Snapshot of the records of one object in append order.
    pub fn records_for_object(&self, object: &str) -> Vec<Arc<ModificationRecord>> {
        self.log
            .read()
            .records
            .iter()
            .filter(|r| r.object == object)
            .cloned()
            .collect()
    }

    /// Latest record for (object, path); `NAME.[i]` and `NAME[i]` are the same path.
    pub fn latest(&self, object: &str, path: &str) -> Option<Arc<ModificationRecord>> {
        let key = (object.to_string(), normalize_path(path));
        self.log.read().latest.get(&key).cloned()
    }

    /// The latest record of every key, in append order.
    pub fn latest_records(&self) -> Vec<Arc<ModificationRecord>> {
        let mut latest: Vec<_> = self.log.read().latest.values().cloned().collect();
        latest.sort_by_key(|r| r.sequence);
        latest
    }

    /// Returns true if (object, path) has a record.
    pub fn has_modification(&self, object: &str, path: &str) -> bool {
        let key = (object.to_string(), normalize_path(path));
        self.log.read().latest.contains_key(&key)
    }

    /// Returns true if `path` or anything below it has a record.
    pub fn has_modification_under(&self, object: &str, path: &str) -> bool {
        self.log
            .read()
            .latest
            .keys()
            .any(|(o, p)| o == object && is_same_or_descendant(p, path))
    }

    pub fn len(&self) -> usize {
        self.log.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().records.is_empty()
    }

    /// Forgets every record. Sequence numbers keep increasing.
    pub fn clear(&self) {
        let mut log = self.log.write();
        log.records.clear();
        log.latest.clear();
    }

    /// Aggregate statistics over all records.
    pub fn stats(&self) -> ModificationStats {
        let log = self.log.read();
        ModificationStats::collect(log.records.iter().map(Arc::as_ref))
    }
}

impl std::fmt::Debug for ModificationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModificationTracker")
            .field("records", &self.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
