//! Stress tests exercising the index under real thread contention.

use crate::EntryId;
use crate::config::{IndexConfig, LockPolicy};
use crate::error::Error;
use crate::index::ExclusionIndex;
use crate::interval::Interval;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[cfg(test)]
mod index_stress {
    use super::*;

    #[test]
    fn stress_test_same_key_single_winner() {
        let index: Arc<ExclusionIndex<&str, i64, usize>> = Arc::new(ExclusionIndex::new());
        let num_threads = 8;
        let barrier = Arc::new(Barrier::new(num_threads));

        let mut handles = vec![];
        for thread_id in 0..num_threads {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait(); // Synchronize start
                index.insert("contested", Interval::new(0, 100), thread_id)
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winner_ids: Vec<EntryId> = results.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
        assert_eq!(winner_ids.len(), 1, "exactly one insert must win the race");
        for result in &results {
            if let Err(err) = result {
                match err {
                    Error::Conflict(conflict) => {
                        assert_eq!(conflict.conflicts.len(), 1);
                        assert_eq!(conflict.conflicts[0].id, winner_ids[0]);
                        assert_eq!(conflict.conflicts[0].interval, Interval::new(0, 100));
                    }
                    other => panic!("losers must see the conflict, got {:?}", other),
                }
            }
        }
        assert_eq!(index.len(), 1);
        index.validate().expect("exclusion invariant violated");
    }

    #[test]
    fn stress_test_distinct_keys_never_conflict() {
        let index: Arc<ExclusionIndex<String, i64, usize>> = Arc::new(ExclusionIndex::new());
        let num_threads = 8;
        let inserts_per_thread = 200;
        let barrier = Arc::new(Barrier::new(num_threads));

        let mut handles = vec![];
        for thread_id in 0..num_threads {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait(); // Synchronize start
                let key = format!("key-{:02}", thread_id);
                let mut ids = vec![];
                for i in 0..inserts_per_thread {
                    let low = i as i64 * 10;
                    let id = index
                        .insert(key.clone(), Interval::new(low, low + 10), thread_id)
                        .expect("distinct keys must never conflict");
                    ids.push(id);
                }
                ids
            }));
        }

        let mut all_ids = vec![];
        for handle in handles {
            all_ids.extend(handle.join().unwrap());
        }

        // No id is ever handed out twice.
        all_ids.sort_unstable();
        let mut unique_ids = all_ids.clone();
        unique_ids.dedup();
        assert_eq!(all_ids.len(), unique_ids.len(), "id collision detected");
        assert_eq!(index.len(), num_threads * inserts_per_thread);
        assert_eq!(index.key_count(), num_threads);
        index.validate().expect("exclusion invariant violated");
    }

    #[test]
    fn stress_test_slot_race_on_one_key() {
        let index: Arc<ExclusionIndex<&str, i64, usize>> = Arc::new(ExclusionIndex::new());
        let num_threads = 8;
        let num_slots = 50i64;
        let barrier = Arc::new(Barrier::new(num_threads));

        let mut handles = vec![];
        for thread_id in 0..num_threads {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait(); // Synchronize start
                let mut wins = 0;
                for slot in 0..num_slots {
                    match index.insert(
                        "calendar",
                        Interval::new(slot * 10, slot * 10 + 10),
                        thread_id,
                    ) {
                        Ok(_) => wins += 1,
                        Err(Error::Conflict(_)) => {}
                        Err(other) => panic!("unexpected error: {:?}", other),
                    }
                }
                wins
            }));
        }

        let total_wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_wins as i64, num_slots, "each slot must be won exactly once");
        assert_eq!(index.len() as i64, num_slots);
        for slot in 0..num_slots {
            assert!(index.contains(&"calendar", &(slot * 10)).unwrap());
        }
        index.validate().expect("exclusion invariant violated");
    }

    #[test]
    fn stress_test_mixed_readers_and_writers() {
        let index: Arc<ExclusionIndex<&str, i64, usize>> = Arc::new(ExclusionIndex::new());
        let num_writers = 3;
        let num_readers = 3;
        let duration = Duration::from_millis(300);
        let stop_flag = Arc::new(AtomicBool::new(false));

        let mut handles = vec![];

        // Writers claim and release slots on one hot key.
        for writer_id in 0..num_writers {
            let index = Arc::clone(&index);
            let stop_flag = Arc::clone(&stop_flag);
            handles.push(thread::spawn(move || {
                let mut owned = vec![];
                let mut counter: i64 = writer_id as i64;
                while !stop_flag.load(Ordering::Relaxed) {
                    let slot = counter % 64;
                    counter += 1;
                    match index.insert("hot", Interval::new(slot * 10, slot * 10 + 10), writer_id)
                    {
                        Ok(id) => {
                            if counter % 2 == 0 {
                                index.remove(id).expect("own entry vanished");
                            } else {
                                owned.push(id);
                            }
                        }
                        Err(Error::Conflict(_)) => {}
                        Err(other) => panic!("unexpected error: {:?}", other),
                    }
                }
                // Release everything we still hold.
                for id in owned {
                    index.remove(id).expect("own entry vanished");
                }
            }));
        }

        // Readers must only ever observe overlap-free states.
        let mut reader_handles = vec![];
        for _ in 0..num_readers {
            let index = Arc::clone(&index);
            let stop_flag = Arc::clone(&stop_flag);
            reader_handles.push(thread::spawn(move || {
                let mut observations = 0usize;
                while !stop_flag.load(Ordering::Relaxed) {
                    let entries: Vec<_> =
                        index.overlapping(&"hot", Interval::from(..)).unwrap().collect();
                    for pair in entries.windows(2) {
                        assert!(
                            pair[0].interval.high <= pair[1].interval.low,
                            "observed overlapping entries {:?} and {:?}",
                            pair[0],
                            pair[1]
                        );
                    }
                    if observations % 32 == 0 {
                        index.validate().expect("exclusion invariant violated");
                    }
                    observations += 1;
                }
                observations
            }));
        }

        thread::sleep(duration);
        stop_flag.store(true, Ordering::Relaxed);
        for handle in handles {
            handle.join().unwrap();
        }
        let observations: usize = reader_handles.into_iter().map(|h| h.join().unwrap()).sum();
        println!("reader scans completed: {}", observations);

        assert!(index.is_empty(), "writers must have released every entry");
        index.validate().expect("exclusion invariant violated");
    }

    #[test]
    fn stress_test_snapshot_is_consistent_cut() {
        let index: Arc<ExclusionIndex<&str, i64, usize>> = Arc::new(ExclusionIndex::new());
        let keys = ["a", "b", "c", "d"];
        let stop_flag = Arc::new(AtomicBool::new(false));

        let mut handles = vec![];
        for (writer_id, key) in keys.iter().enumerate() {
            let index = Arc::clone(&index);
            let stop_flag = Arc::clone(&stop_flag);
            let key = *key;
            handles.push(thread::spawn(move || {
                let mut counter: i64 = 0;
                while !stop_flag.load(Ordering::Relaxed) {
                    let slot = counter % 32;
                    counter += 1;
                    if let Ok(id) =
                        index.insert(key, Interval::new(slot * 10, slot * 10 + 10), writer_id)
                    {
                        if counter % 3 == 0 {
                            index.remove(id).expect("own entry vanished");
                        }
                    }
                }
            }));
        }

        // Every snapshot must be restorable: ids unique, intervals valid,
        // and each key's entries overlap-free.
        for round in 0..20 {
            let snap = index.snapshot();
            assert!(snap.windows(2).all(|w| w[0].id < w[1].id));

            let mut by_key: HashMap<&str, Vec<Interval<i64>>> = HashMap::new();
            for entry in &snap {
                by_key.entry(entry.key).or_default().push(entry.interval);
            }
            for intervals in by_key.values_mut() {
                intervals.sort_by(|a, b| a.position_cmp(b));
                for pair in intervals.windows(2) {
                    assert!(!pair[0].overlaps(&pair[1]), "snapshot caught an overlap");
                }
            }

            ExclusionIndex::from_snapshot(snap, IndexConfig::default())
                .unwrap_or_else(|err| panic!("snapshot {} not restorable: {}", round, err));
        }

        stop_flag.store(true, Ordering::Relaxed);
        for handle in handles {
            handle.join().unwrap();
        }
        index.validate().expect("exclusion invariant violated");
    }

    #[test]
    fn stress_test_nowait_fails_while_reader_holds_key() {
        let index: Arc<ExclusionIndex<&str, i64, usize>> = Arc::new(ExclusionIndex::new());
        index.insert("busy", Interval::new(0, 10), 0).unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let reader = {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                index
                    .with_key(&"busy", |view| {
                        barrier.wait(); // View is held; let the writer probe
                        let len = view.len();
                        barrier.wait(); // Writer is done probing
                        len
                    })
                    .unwrap()
            })
        };

        let writer = {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let nowait = index.insert_with("busy", Interval::new(20, 30), 1, LockPolicy::NoWait);
                let timed = index.insert_with(
                    "busy",
                    Interval::new(20, 30),
                    1,
                    LockPolicy::Timeout(Duration::from_millis(2)),
                );
                // Another key is untouched by the held view.
                let elsewhere =
                    index.insert_with("idle", Interval::new(0, 10), 1, LockPolicy::NoWait);
                barrier.wait();
                (nowait, timed, elsewhere)
            })
        };

        assert_eq!(reader.join().unwrap(), 1);
        let (nowait, timed, elsewhere) = writer.join().unwrap();
        assert!(matches!(nowait, Err(Error::Timeout { .. })));
        assert!(matches!(timed, Err(Error::Timeout { .. })));
        elsewhere.expect("an uncontended key must not time out");

        // With the view released, the blocked insert now succeeds.
        index
            .insert_with("busy", Interval::new(20, 30), 1, LockPolicy::NoWait)
            .unwrap();
        index.validate().expect("exclusion invariant violated");
    }

    #[test]
    fn stress_test_update_remove_race() {
        let index: Arc<ExclusionIndex<&str, i64, usize>> = Arc::new(ExclusionIndex::new());
        let id = index.insert("k", Interval::new(0, 10), 0).unwrap();
        let barrier = Arc::new(Barrier::new(2));

        let updater = {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait(); // Synchronize start
                let mut successes = 0;
                loop {
                    let target = if successes % 2 == 0 {
                        Interval::new(100, 110)
                    } else {
                        Interval::new(0, 10)
                    };
                    match index.update(id, target) {
                        Ok(()) => successes += 1,
                        Err(Error::NotFound(_)) => break,
                        Err(other) => panic!("unexpected error: {:?}", other),
                    }
                }
                successes
            })
        };

        let remover = {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait(); // Synchronize start
                thread::sleep(Duration::from_millis(10));
                index.remove(id).expect("first remove must succeed")
            })
        };

        let successes = updater.join().unwrap();
        remover.join().unwrap();
        println!("updates applied before removal: {}", successes);

        assert!(index.is_empty());
        assert!(matches!(index.remove(id), Err(Error::NotFound(_))));
        assert!(matches!(
            index.update(id, Interval::new(0, 1)),
            Err(Error::NotFound(_))
        ));
        index.validate().expect("exclusion invariant violated");
    }
}
