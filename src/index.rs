//! Concurrent exclusion index
//!
//! This module implements the public index that maps keys to interval trees
//! and enforces the exclusion invariant: no two live entries under the same
//! key may hold overlapping intervals. Each key owns a partition guarded by
//! its own reader-writer lock, so mutations on different keys never contend.
//!
//! Lock order is fixed everywhere: the partition map lock is taken and
//! released on its own, a partition's tree lock is taken next, and the id
//! registry lock is only ever taken while holding at most one tree lock.
//! Registry writes happen inside the owning partition's write critical
//! section, so readers can never observe the two structures disagreeing.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

use ahash::RandomState;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::EntryId;
use crate::config::{IndexConfig, LockPolicy};
use crate::error::{ConflictError, ConflictList, ConflictingEntry, Error};
use crate::interval::Interval;
use crate::tree::IntervalTree;

/// Owned copy of one live entry.
///
/// Returned by queries and snapshots; never aliases index-internal storage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<K, T, P> {
    /// Identifier assigned at insert, unique for the life of the index
    pub id: EntryId,
    /// Partition key
    pub key: K,
    /// Claimed interval
    pub interval: Interval<T>,
    /// Caller-supplied payload
    pub payload: P,
}

/// Point-in-time counters describing the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    /// Live entries across all keys
    pub entries: usize,
    /// Keys holding at least one live entry
    pub keys: usize,
    /// Height of the tallest per-key tree
    pub max_tree_height: usize,
}

/// Matches of one overlap query, in ascending `(low, high, id)` order.
///
/// The matches are copied out under the key's read lock when the query runs;
/// iterating holds no lock. [`Overlapping::rewind`] restarts iteration over
/// the same result set.
#[derive(Debug, Clone)]
pub struct Overlapping<K, T, P> {
    matches: Vec<Entry<K, T, P>>,
    cursor: usize,
}

impl<K, T, P> Overlapping<K, T, P> {
    /// Restart iteration from the first match.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl<K: Clone, T: Clone, P: Clone> Iterator for Overlapping<K, T, P> {
    type Item = Entry<K, T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.matches.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.matches.len() - self.cursor;
        (rest, Some(rest))
    }
}

impl<K: Clone, T: Clone, P: Clone> ExactSizeIterator for Overlapping<K, T, P> {}

/// Read view of one key, lent to a [`ExclusionIndex::with_key`] closure.
///
/// Every query through the same view observes the same state. The view holds
/// the key's read lock, so mutating that key from inside the closure blocks
/// under [`LockPolicy::Block`]; use a non-blocking policy for such probes.
#[derive(Debug, Clone, Copy)]
pub struct KeyView<'a, T, P> {
    tree: &'a IntervalTree<T, P>,
}

impl<T: Ord + Clone, P> KeyView<'_, T, P> {
    /// Live entries under this key.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the key holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Whether any non-empty entry contains the point.
    pub fn contains(&self, point: &T) -> bool {
        self.tree.contains_point(point)
    }

    /// Whether any entry matches the query interval.
    pub fn any_overlap(&self, interval: impl Into<Interval<T>>) -> Result<bool, Error<T>> {
        let query = interval.into();
        if !query.is_valid() {
            return Err(Error::InvalidInterval(query));
        }
        Ok(self.tree.any_match(&query))
    }

    /// Visit every match of the query in ascending `(low, high, id)` order.
    pub fn for_each_overlapping<F>(
        &self,
        interval: impl Into<Interval<T>>,
        f: F,
    ) -> Result<(), Error<T>>
    where
        F: FnMut(EntryId, &Interval<T>, &P),
    {
        let query = interval.into();
        if !query.is_valid() {
            return Err(Error::InvalidInterval(query));
        }
        self.tree.for_each_match(&query, f);
        Ok(())
    }

    /// Visit every entry under this key in ascending `(low, high, id)` order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(EntryId, &Interval<T>, &P),
    {
        self.tree.for_each(f);
    }
}

/// Registry record resolving an id to its key and current interval.
#[derive(Debug, Clone)]
struct EntryMeta<K, T> {
    key: K,
    interval: Interval<T>,
}

/// One key's tree behind its own lock.
#[derive(Debug)]
struct Partition<T, P> {
    tree: RwLock<IntervalTree<T, P>>,
}

impl<T: Ord + Clone, P> Partition<T, P> {
    fn new() -> Self {
        Self {
            tree: RwLock::new(IntervalTree::new()),
        }
    }

    fn read(&self, policy: LockPolicy) -> Result<RwLockReadGuard<'_, IntervalTree<T, P>>, Error<T>> {
        match policy {
            LockPolicy::Block => Ok(self.tree.read()),
            LockPolicy::NoWait => self.tree.try_read().ok_or(Error::Timeout {
                waited: Duration::ZERO,
            }),
            LockPolicy::Timeout(limit) => self
                .tree
                .try_read_for(limit)
                .ok_or(Error::Timeout { waited: limit }),
        }
    }

    fn write(
        &self,
        policy: LockPolicy,
    ) -> Result<RwLockWriteGuard<'_, IntervalTree<T, P>>, Error<T>> {
        match policy {
            LockPolicy::Block => Ok(self.tree.write()),
            LockPolicy::NoWait => self.tree.try_write().ok_or(Error::Timeout {
                waited: Duration::ZERO,
            }),
            LockPolicy::Timeout(limit) => self
                .tree
                .try_write_for(limit)
                .ok_or(Error::Timeout { waited: limit }),
        }
    }
}

/// Concurrent index enforcing range-overlap exclusion per key.
///
/// Every live entry is a `(key, interval, payload)` triple. Inserting or
/// re-intervaling an entry whose interval overlaps a live entry under the
/// same key fails with [`Error::Conflict`]; the same intervals under
/// different keys coexist freely. All operations are atomic: a failed call
/// leaves the index exactly as it was.
#[derive(Debug)]
pub struct ExclusionIndex<K, T, P> {
    /// Per-key partitions; a partition is never dropped once created, so a
    /// cloned `Arc` always refers to the key's live tree
    partitions: RwLock<HashMap<K, Arc<Partition<T, P>>, RandomState>>,
    /// id -> (key, interval) for every live entry
    registry: RwLock<HashMap<EntryId, EntryMeta<K, T>, RandomState>>,
    /// Next id to assign; ids are never reused
    next_id: AtomicU64,
    config: IndexConfig,
}

impl<K, T, P> ExclusionIndex<K, T, P>
where
    K: Eq + Hash + Clone,
    T: Ord + Clone,
{
    /// Create an empty index with the default configuration.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            partitions: RwLock::new(HashMap::with_capacity_and_hasher(
                config.expected_keys,
                RandomState::new(),
            )),
            registry: RwLock::new(HashMap::default()),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    /// Get or create the partition for a key.
    fn partition(&self, key: &K) -> Arc<Partition<T, P>> {
        if let Some(partition) = self.partitions.read().get(key) {
            return Arc::clone(partition);
        }
        let mut partitions = self.partitions.write();
        Arc::clone(
            partitions
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Partition::new())),
        )
    }

    fn existing_partition(&self, key: &K) -> Option<Arc<Partition<T, P>>> {
        self.partitions.read().get(key).map(Arc::clone)
    }

    /// Insert an entry, enforcing exclusion against the key's live entries.
    ///
    /// The conflict check and the commit run under one acquisition of the
    /// key's write lock. On conflict the error carries every live entry the
    /// interval overlaps, in ascending `(low, high, id)` order, and nothing
    /// is inserted. Empty intervals conflict with nothing and always insert.
    pub fn insert(
        &self,
        key: K,
        interval: impl Into<Interval<T>>,
        payload: P,
    ) -> Result<EntryId, Error<T>> {
        self.insert_with(key, interval, payload, self.config.lock_policy)
    }

    /// [`insert`](Self::insert) with an explicit lock policy.
    pub fn insert_with(
        &self,
        key: K,
        interval: impl Into<Interval<T>>,
        payload: P,
        policy: LockPolicy,
    ) -> Result<EntryId, Error<T>> {
        let interval = interval.into();
        if !interval.is_valid() {
            return Err(Error::InvalidInterval(interval));
        }
        let partition = self.partition(&key);
        let mut tree = partition.write(policy)?;
        if !interval.is_empty() {
            let mut conflicts = ConflictList::new();
            tree.for_each_match(&interval, |id, stored, _| {
                conflicts.push(ConflictingEntry {
                    id,
                    interval: stored.clone(),
                });
            });
            if !conflicts.is_empty() {
                return Err(Error::Conflict(ConflictError {
                    attempted: interval,
                    conflicts,
                }));
            }
        }
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        // Register before linking into the tree; both happen under the
        // partition write lock, so neither is visible without the other.
        self.registry.write().insert(
            id,
            EntryMeta {
                key,
                interval: interval.clone(),
            },
        );
        tree.insert(id, interval, payload);
        Ok(id)
    }

    /// Remove a live entry, returning its payload.
    ///
    /// Fails with [`Error::NotFound`] for ids never assigned or already
    /// removed. The freed span becomes claimable the moment this returns.
    pub fn remove(&self, id: EntryId) -> Result<P, Error<T>> {
        self.remove_with(id, self.config.lock_policy)
    }

    /// [`remove`](Self::remove) with an explicit lock policy.
    pub fn remove_with(&self, id: EntryId, policy: LockPolicy) -> Result<P, Error<T>> {
        let key = match self.registry.read().get(&id) {
            Some(meta) => meta.key.clone(),
            None => return Err(Error::NotFound(id)),
        };
        let partition = self.partition(&key);
        let mut tree = partition.write(policy)?;
        // Re-read under the lock: the entry may have moved or been removed
        // while we waited. Ids are never reused, so the key cannot change.
        let interval = match self.registry.read().get(&id) {
            Some(meta) => meta.interval.clone(),
            None => return Err(Error::NotFound(id)),
        };
        let removed = tree.remove(id, &interval);
        if removed.is_some() {
            self.registry.write().remove(&id);
        }
        removed.ok_or(Error::NotFound(id))
    }

    /// Atomically replace a live entry's interval, keeping id and payload.
    ///
    /// The entry never conflicts with itself, so an interval overlapping the
    /// old one is fine. On [`Error::Conflict`] the entry keeps its old
    /// interval untouched.
    pub fn update(&self, id: EntryId, new_interval: impl Into<Interval<T>>) -> Result<(), Error<T>> {
        self.update_with(id, new_interval, self.config.lock_policy)
    }

    /// [`update`](Self::update) with an explicit lock policy.
    pub fn update_with(
        &self,
        id: EntryId,
        new_interval: impl Into<Interval<T>>,
        policy: LockPolicy,
    ) -> Result<(), Error<T>> {
        let new_interval = new_interval.into();
        if !new_interval.is_valid() {
            return Err(Error::InvalidInterval(new_interval));
        }
        let key = match self.registry.read().get(&id) {
            Some(meta) => meta.key.clone(),
            None => return Err(Error::NotFound(id)),
        };
        let partition = self.partition(&key);
        let mut tree = partition.write(policy)?;
        let old_interval = match self.registry.read().get(&id) {
            Some(meta) => meta.interval.clone(),
            None => return Err(Error::NotFound(id)),
        };
        if !new_interval.is_empty() {
            let mut conflicts = ConflictList::new();
            tree.for_each_match(&new_interval, |found, stored, _| {
                if found != id {
                    conflicts.push(ConflictingEntry {
                        id: found,
                        interval: stored.clone(),
                    });
                }
            });
            if !conflicts.is_empty() {
                return Err(Error::Conflict(ConflictError {
                    attempted: new_interval,
                    conflicts,
                }));
            }
        }
        let Some(payload) = tree.remove(id, &old_interval) else {
            return Err(Error::NotFound(id));
        };
        tree.insert(id, new_interval.clone(), payload);
        self.registry.write().insert(
            id,
            EntryMeta {
                key,
                interval: new_interval,
            },
        );
        Ok(())
    }

    /// Query the entries under a key whose intervals match the query.
    ///
    /// A non-empty query matches by strict half-open overlap, so it never
    /// matches empty entries. An empty query `[x, x)` is a point probe: it
    /// matches entries containing `x` plus the empty entry at exactly `x`.
    pub fn overlapping(
        &self,
        key: &K,
        interval: impl Into<Interval<T>>,
    ) -> Result<Overlapping<K, T, P>, Error<T>>
    where
        P: Clone,
    {
        self.overlapping_with(key, interval, self.config.lock_policy)
    }

    /// [`overlapping`](Self::overlapping) with an explicit lock policy.
    pub fn overlapping_with(
        &self,
        key: &K,
        interval: impl Into<Interval<T>>,
        policy: LockPolicy,
    ) -> Result<Overlapping<K, T, P>, Error<T>>
    where
        P: Clone,
    {
        let query = interval.into();
        if !query.is_valid() {
            return Err(Error::InvalidInterval(query));
        }
        let Some(partition) = self.existing_partition(key) else {
            return Ok(Overlapping {
                matches: Vec::new(),
                cursor: 0,
            });
        };
        let tree = partition.read(policy)?;
        let mut matches = Vec::new();
        tree.for_each_match(&query, |id, stored, payload| {
            matches.push(Entry {
                id,
                key: key.clone(),
                interval: stored.clone(),
                payload: payload.clone(),
            });
        });
        Ok(Overlapping { matches, cursor: 0 })
    }

    /// Whether any entry under the key contains the point (`low <= p < high`).
    ///
    /// Empty entries contain no point, so this can disagree with an empty
    /// [`overlapping`](Self::overlapping) probe at the same position.
    pub fn contains(&self, key: &K, point: &T) -> Result<bool, Error<T>> {
        self.contains_with(key, point, self.config.lock_policy)
    }

    /// [`contains`](Self::contains) with an explicit lock policy.
    pub fn contains_with(
        &self,
        key: &K,
        point: &T,
        policy: LockPolicy,
    ) -> Result<bool, Error<T>> {
        let Some(partition) = self.existing_partition(key) else {
            return Ok(false);
        };
        let tree = partition.read(policy)?;
        Ok(tree.contains_point(point))
    }

    /// Run a closure against a consistent read view of one key.
    ///
    /// Holds the key's read lock for the duration of the closure, so every
    /// query through the [`KeyView`] observes the same state. A key with no
    /// entries yields an empty view.
    pub fn with_key<R, F>(&self, key: &K, f: F) -> Result<R, Error<T>>
    where
        F: FnOnce(KeyView<'_, T, P>) -> R,
    {
        self.with_key_with(key, self.config.lock_policy, f)
    }

    /// [`with_key`](Self::with_key) with an explicit lock policy.
    pub fn with_key_with<R, F>(&self, key: &K, policy: LockPolicy, f: F) -> Result<R, Error<T>>
    where
        F: FnOnce(KeyView<'_, T, P>) -> R,
    {
        match self.existing_partition(key) {
            Some(partition) => {
                let tree = partition.read(policy)?;
                Ok(f(KeyView { tree: &tree }))
            }
            None => {
                let empty = IntervalTree::new();
                Ok(f(KeyView { tree: &empty }))
            }
        }
    }

    /// Owned copy of one live entry, or `None` for unknown ids.
    pub fn get(&self, id: EntryId) -> Option<Entry<K, T, P>>
    where
        P: Clone,
    {
        let key = self.registry.read().get(&id)?.key.clone();
        let partition = self.existing_partition(&key)?;
        let tree = partition.tree.read();
        let interval = self.registry.read().get(&id)?.interval.clone();
        let payload = tree.get(id, &interval)?.clone();
        Some(Entry {
            id,
            key,
            interval,
            payload,
        })
    }

    /// Number of live entries across all keys.
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Whether the index holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys holding at least one live entry.
    pub fn key_count(&self) -> usize {
        let partitions = self.partitions.read();
        partitions
            .values()
            .filter(|partition| !partition.tree.read().is_empty())
            .count()
    }

    /// Owned copy of every live entry, sorted by id.
    ///
    /// Takes every per-key read lock at once, so the result is a consistent
    /// cut across keys: a concurrent mutation lands entirely before or
    /// entirely after it.
    pub fn snapshot(&self) -> Vec<Entry<K, T, P>>
    where
        P: Clone,
    {
        let partitions = self.partitions.read();
        let guards: Vec<(&K, RwLockReadGuard<'_, IntervalTree<T, P>>)> = partitions
            .iter()
            .map(|(key, partition)| (key, partition.tree.read()))
            .collect();
        let mut entries = Vec::new();
        for (key, tree) in &guards {
            tree.for_each(|id, interval, payload| {
                entries.push(Entry {
                    id,
                    key: (*key).clone(),
                    interval: interval.clone(),
                    payload: payload.clone(),
                });
            });
        }
        entries.sort_by_key(|entry| entry.id);
        entries
    }

    /// Rebuild an index from snapshot entries.
    ///
    /// Re-validates everything the snapshot claims: intervals must be valid,
    /// ids unique, and entries under one key overlap-free. Restored ids stay
    /// live, and freshly assigned ids continue above the restored maximum.
    pub fn from_snapshot<I>(entries: I, config: IndexConfig) -> Result<Self, Error<T>>
    where
        I: IntoIterator<Item = Entry<K, T, P>>,
    {
        let mut trees: HashMap<K, IntervalTree<T, P>, RandomState> = HashMap::default();
        let mut registry: HashMap<EntryId, EntryMeta<K, T>, RandomState> = HashMap::default();
        let mut max_id = 0;
        for entry in entries {
            let Entry {
                id,
                key,
                interval,
                payload,
            } = entry;
            if !interval.is_valid() {
                return Err(Error::InvalidInterval(interval));
            }
            if registry.contains_key(&id) {
                return Err(Error::Corrupted(format!("duplicate entry id {}", id)));
            }
            let tree = trees.entry(key.clone()).or_default();
            if !interval.is_empty() {
                let mut conflicts = ConflictList::new();
                tree.for_each_match(&interval, |found, stored, _| {
                    conflicts.push(ConflictingEntry {
                        id: found,
                        interval: stored.clone(),
                    });
                });
                if !conflicts.is_empty() {
                    return Err(Error::Conflict(ConflictError {
                        attempted: interval,
                        conflicts,
                    }));
                }
            }
            registry.insert(
                id,
                EntryMeta {
                    key,
                    interval: interval.clone(),
                },
            );
            tree.insert(id, interval, payload);
            max_id = max_id.max(id);
        }
        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| Error::Corrupted(format!("entry id {} exhausts the id space", max_id)))?;
        let partitions = trees
            .into_iter()
            .map(|(key, tree)| {
                (
                    key,
                    Arc::new(Partition {
                        tree: RwLock::new(tree),
                    }),
                )
            })
            .collect();
        Ok(Self {
            partitions: RwLock::new(partitions),
            registry: RwLock::new(registry),
            next_id: AtomicU64::new(next_id),
            config,
        })
    }

    /// [`from_snapshot`](Self::from_snapshot) building per-key trees on the
    /// rayon thread pool. Worth it for snapshots spanning many keys.
    #[cfg(feature = "parallel")]
    pub fn from_snapshot_parallel(
        entries: Vec<Entry<K, T, P>>,
        config: IndexConfig,
    ) -> Result<Self, Error<T>>
    where
        K: Send,
        T: Send + Sync,
        P: Send + Sync,
    {
        use rayon::prelude::*;

        let mut groups: HashMap<K, Vec<(EntryId, Interval<T>, P)>, RandomState> =
            HashMap::default();
        let mut registry: HashMap<EntryId, EntryMeta<K, T>, RandomState> = HashMap::default();
        let mut max_id = 0;
        for entry in entries {
            let Entry {
                id,
                key,
                interval,
                payload,
            } = entry;
            if !interval.is_valid() {
                return Err(Error::InvalidInterval(interval));
            }
            if registry.contains_key(&id) {
                return Err(Error::Corrupted(format!("duplicate entry id {}", id)));
            }
            registry.insert(
                id,
                EntryMeta {
                    key: key.clone(),
                    interval: interval.clone(),
                },
            );
            groups.entry(key).or_default().push((id, interval, payload));
            max_id = max_id.max(id);
        }
        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| Error::Corrupted(format!("entry id {} exhausts the id space", max_id)))?;
        let groups: Vec<(K, Vec<(EntryId, Interval<T>, P)>)> = groups.into_iter().collect();
        let built = groups
            .into_par_iter()
            .map(|(key, items)| {
                let mut tree = IntervalTree::new();
                for (id, interval, payload) in items {
                    if !interval.is_empty() {
                        let mut conflicts = ConflictList::new();
                        tree.for_each_match(&interval, |found, stored, _| {
                            conflicts.push(ConflictingEntry {
                                id: found,
                                interval: stored.clone(),
                            });
                        });
                        if !conflicts.is_empty() {
                            return Err(Error::Conflict(ConflictError {
                                attempted: interval,
                                conflicts,
                            }));
                        }
                    }
                    tree.insert(id, interval, payload);
                }
                Ok((
                    key,
                    Arc::new(Partition {
                        tree: RwLock::new(tree),
                    }),
                ))
            })
            .collect::<Result<Vec<_>, Error<T>>>()?;
        Ok(Self {
            partitions: RwLock::new(built.into_iter().collect()),
            registry: RwLock::new(registry),
            next_id: AtomicU64::new(next_id),
            config,
        })
    }

    /// Point-in-time counters. Sampled key by key, not a consistent cut.
    pub fn stats(&self) -> IndexStats {
        let partitions = self.partitions.read();
        let mut stats = IndexStats {
            entries: 0,
            keys: 0,
            max_tree_height: 0,
        };
        for partition in partitions.values() {
            let tree = partition.tree.read();
            if !tree.is_empty() {
                stats.entries += tree.len();
                stats.keys += 1;
                stats.max_tree_height = stats.max_tree_height.max(tree.height());
            }
        }
        stats
    }

    /// Audit the whole index: per-key tree structure, the exclusion
    /// invariant, and agreement between the trees and the id registry.
    pub fn validate(&self) -> Result<(), Error<T>> {
        let partitions = self.partitions.read();
        let guards: Vec<(&K, RwLockReadGuard<'_, IntervalTree<T, P>>)> = partitions
            .iter()
            .map(|(key, partition)| (key, partition.tree.read()))
            .collect();
        // Registry last, matching the lock order of the write paths.
        let registry = self.registry.read();

        let mut total = 0;
        for (key, tree) in &guards {
            if let Err(defect) = tree.validate() {
                return Err(Error::Corrupted(format!("key partition damaged: {}", defect)));
            }
            let mut mismatch = None;
            tree.for_each(|id, interval, _| {
                let consistent = registry
                    .get(&id)
                    .is_some_and(|meta| meta.key == **key && meta.interval == *interval);
                if !consistent && mismatch.is_none() {
                    mismatch = Some(id);
                }
            });
            if let Some(id) = mismatch {
                return Err(Error::Corrupted(format!(
                    "entry {} not consistently registered",
                    id
                )));
            }
            total += tree.len();
        }
        if total != registry.len() {
            return Err(Error::Corrupted(format!(
                "registry holds {} entries, key partitions hold {}",
                registry.len(),
                total
            )));
        }
        Ok(())
    }
}

impl<K, T, P> Default for ExclusionIndex<K, T, P>
where
    K: Eq + Hash + Clone,
    T: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
