//! Overlock: keyed interval index with exclusion semantics
//!
//! This crate provides a concurrent index over `(key, interval, payload)`
//! entries that enforces the rule behind SQL range exclusion constraints:
//! under any single key, no two live entries may hold overlapping half-open
//! intervals. Conflict checks and overlap queries run on per-key augmented
//! interval trees, and distinct keys mutate fully in parallel under their
//! own locks.

#![warn(missing_docs)]

/// Interval value types and overlap predicates
pub mod interval;

/// Augmented interval tree backing each key
pub mod tree;

/// The concurrent index
pub mod index;

/// Stress tests for concurrent index usage
#[cfg(test)]
pub mod stress_tests;

// Re-exports
pub use config::{IndexConfig, LockPolicy};
pub use error::{ConflictError, ConflictingEntry, Error};
pub use index::{Entry, ExclusionIndex, IndexStats, KeyView, Overlapping};
pub use interval::{Endpoint, Interval};
pub use tree::{IntervalTree, TreeDefect};

/// Identifier assigned to an entry at insert; never reused by an index.
pub type EntryId = u64;

/// Error types for index operations
pub mod error {
    use std::error::Error as StdError;
    use std::fmt;
    use std::time::Duration;

    use smallvec::SmallVec;

    use crate::EntryId;
    use crate::interval::Interval;

    /// Conflicts reported by one rejected mutation.
    ///
    /// Inline capacity of two: most rejections collide with one or two
    /// neighboring entries.
    pub type ConflictList<T> = SmallVec<[ConflictingEntry<T>; 2]>;

    /// One live entry that blocked a mutation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ConflictingEntry<T> {
        /// Id of the blocking entry
        pub id: EntryId,
        /// Interval the blocking entry holds
        pub interval: Interval<T>,
    }

    /// Details of an insert or update rejected by exclusion.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ConflictError<T> {
        /// The interval the caller tried to claim
        pub attempted: Interval<T>,
        /// Every live entry it overlaps, ascending by `(low, high, id)`
        pub conflicts: ConflictList<T>,
    }

    impl<T: fmt::Display> fmt::Display for ConflictError<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.conflicts.split_first() {
                Some((first, rest)) => {
                    write!(
                        f,
                        "interval {} conflicts with existing entry {} at {}",
                        self.attempted, first.id, first.interval
                    )?;
                    if !rest.is_empty() {
                        write!(f, " and {} more", rest.len())?;
                    }
                    Ok(())
                }
                None => write!(
                    f,
                    "interval {} conflicts with existing entries",
                    self.attempted
                ),
            }
        }
    }

    impl<T: fmt::Debug + fmt::Display> StdError for ConflictError<T> {}

    /// Errors that can occur in index operations
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Error<T> {
        /// The interval's lower bound exceeds its upper bound
        InvalidInterval(Interval<T>),
        /// The mutation would break exclusion; nothing was changed
        Conflict(ConflictError<T>),
        /// No live entry carries this id
        NotFound(EntryId),
        /// A lock was not acquired under the requested policy
        Timeout {
            /// How long the operation waited before giving up
            waited: Duration,
        },
        /// Internal structures disagree; reported by restore and validation
        Corrupted(String),
    }

    impl<T: fmt::Display> fmt::Display for Error<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Error::InvalidInterval(interval) => write!(
                    f,
                    "invalid interval {}: lower bound exceeds upper bound",
                    interval
                ),
                Error::Conflict(conflict) => write!(f, "{}", conflict),
                Error::NotFound(id) => write!(f, "entry {} not found", id),
                Error::Timeout { waited } => {
                    write!(f, "lock wait timed out after {:?}", waited)
                }
                Error::Corrupted(msg) => write!(f, "corrupted index: {}", msg),
            }
        }
    }

    impl<T: fmt::Debug + fmt::Display + 'static> StdError for Error<T> {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            match self {
                Error::Conflict(conflict) => Some(conflict),
                _ => None,
            }
        }
    }

    impl<T> From<ConflictError<T>> for Error<T> {
        fn from(err: ConflictError<T>) -> Self {
            Error::Conflict(err)
        }
    }
}

/// Configuration options for an index
pub mod config {
    use std::time::Duration;

    /// How an operation behaves when its key's lock is contended.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LockPolicy {
        /// Wait until the lock is granted
        Block,
        /// Fail immediately with `Timeout` if the lock is held
        NoWait,
        /// Wait at most this long, then fail with `Timeout`
        Timeout(Duration),
    }

    /// Configuration for an exclusion index.
    #[derive(Debug, Clone)]
    pub struct IndexConfig {
        /// Lock policy applied when an operation does not name one
        pub lock_policy: LockPolicy,
        /// Initial capacity of the key partition map
        pub expected_keys: usize,
    }

    impl Default for IndexConfig {
        fn default() -> Self {
            Self {
                lock_policy: LockPolicy::Block,
                expected_keys: 16,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_surface() {
        let index: ExclusionIndex<&str, u32, &str> = ExclusionIndex::new();
        let id = index
            .insert("chair", Interval::new(100, 200), "first")
            .unwrap();
        assert!(matches!(
            index.insert("chair", 150..250, "second"),
            Err(Error::Conflict(_))
        ));
        assert!(index.contains(&"chair", &150).unwrap());
        assert_eq!(index.remove(id).unwrap(), "first");
    }

    #[test]
    fn test_error_display() {
        let err: Error<i64> = Error::NotFound(7);
        assert_eq!(err.to_string(), "entry 7 not found");

        let err: Error<i64> = Error::InvalidInterval(Interval::new(9, 3));
        assert_eq!(
            err.to_string(),
            "invalid interval [9, 3): lower bound exceeds upper bound"
        );

        let err: Error<i64> = Error::Corrupted("duplicate entry id 4".to_string());
        assert_eq!(err.to_string(), "corrupted index: duplicate entry id 4");
    }
}
