//! Lock Policy and Contention Demo
//!
//! This example measures the index under concurrent load and shows how the
//! non-blocking lock policies behave while another thread holds a key.

use overlock::{Error, ExclusionIndex, LockPolicy};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

fn main() {
    println!("🔒 Lock Policy and Contention Demo\n");

    println!("📊 Demo 1: Writers on distinct keys");
    distinct_keys_demo();

    println!("\n📊 Demo 2: Racing for one slot");
    slot_race_demo();

    println!("\n📊 Demo 3: NoWait and Timeout policies");
    lock_policy_demo();

    println!("\n📊 Demo 4: Mixed readers and writers");
    mixed_workload_demo();

    println!("\n✅ Demo completed successfully!");
}

fn distinct_keys_demo() {
    let index: Arc<ExclusionIndex<String, i64, usize>> = Arc::new(ExclusionIndex::new());
    let writers = 8usize;
    let bookings_per_writer = 5_000usize;

    let start = Instant::now();
    let mut handles = vec![];

    for writer_id in 0..writers {
        let index_clone = index.clone();
        let handle = thread::spawn(move || {
            let key = format!("resource-{:02}", writer_id);
            for i in 0..bookings_per_writer {
                let low = (i as i64) * 10;
                index_clone
                    .insert(key.clone(), low..low + 10, i)
                    .expect("insert failed");
            }
        });
        handles.push(handle);
    }

    // Wait for all writers to complete
    for handle in handles {
        handle.join().unwrap();
    }

    let elapsed = start.elapsed();
    let total_ops = writers * bookings_per_writer;
    let stats = index.stats();

    println!(
        "  • {} writers × {} inserts in {:?} ({:.0} ops/sec)",
        writers,
        bookings_per_writer,
        elapsed,
        total_ops as f64 / elapsed.as_secs_f64()
    );
    println!(
        "  • {} entries across {} keys, deepest tree {} levels",
        stats.entries, stats.keys, stats.max_tree_height
    );
}

fn slot_race_demo() {
    let index: Arc<ExclusionIndex<&'static str, i64, usize>> = Arc::new(ExclusionIndex::new());
    let contenders = 8usize;
    let barrier = Arc::new(Barrier::new(contenders));

    let mut handles = vec![];
    for contender in 0..contenders {
        let index_clone = index.clone();
        let barrier_clone = barrier.clone();
        let handle = thread::spawn(move || {
            barrier_clone.wait(); // Synchronize start
            index_clone.insert("january-week-2", 8..15, contender)
        });
        handles.push(handle);
    }

    let mut winners = 0;
    let mut losers = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(id) => {
                winners += 1;
                println!("  • entry {} claimed the slot ✅", id);
            }
            Err(Error::Conflict(_)) => losers += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    println!(
        "  • {} of {} contenders rejected with the winner's entry id",
        losers, contenders
    );
    assert_eq!(winners, 1);
}

fn lock_policy_demo() {
    let index: Arc<ExclusionIndex<&'static str, i64, usize>> = Arc::new(ExclusionIndex::new());
    index.insert("popular", 0..10, 0).expect("seed insert failed");

    let view_taken = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));

    let holder = {
        let index = index.clone();
        let view_taken = view_taken.clone();
        let release = release.clone();
        thread::spawn(move || {
            index
                .with_key(&"popular", |view| {
                    view_taken.wait(); // Synchronize start
                    release.wait();
                    view.len()
                })
                .expect("read view failed")
        })
    };

    view_taken.wait();

    // A reader is parked on the key, so the write lock cannot be had.
    match index.insert_with("popular", 20..30, 1, LockPolicy::NoWait) {
        Err(Error::Timeout { waited }) => {
            println!("  • NoWait gave up instantly (waited {:?}) ✅", waited)
        }
        other => panic!("expected a timeout, got {:?}", other),
    }

    let start = Instant::now();
    match index.insert_with(
        "popular",
        20..30,
        1,
        LockPolicy::Timeout(Duration::from_millis(50)),
    ) {
        Err(Error::Timeout { waited }) => println!(
            "  • Timeout(50ms) waited {:?} before giving up (measured {:?}) ✅",
            waited,
            start.elapsed()
        ),
        other => panic!("expected a timeout, got {:?}", other),
    }

    release.wait();
    let held = holder.join().unwrap();
    println!("  • reader released the key after seeing {} entries", held);

    index
        .insert_with("popular", 20..30, 1, LockPolicy::Block)
        .expect("insert after release failed");
    println!("  • Block insert succeeded once the key was free ✅");
}

fn mixed_workload_demo() {
    let index: Arc<ExclusionIndex<String, i64, usize>> = Arc::new(ExclusionIndex::new());
    for i in 0..10_000usize {
        let low = (i as i64) * 10;
        index
            .insert("calendar".to_string(), low..low + 10, i)
            .expect("populate failed");
    }

    let readers = 4usize;
    let writers = 2usize;
    let ops_per_thread = 5_000usize;

    let start = Instant::now();
    let mut handles = vec![];

    for reader_id in 0..readers {
        let index_clone = index.clone();
        let handle = thread::spawn(move || {
            let key = "calendar".to_string();
            for i in 0..ops_per_thread {
                let probe = (((reader_id * ops_per_thread + i) % 10_000) as i64) * 10;
                let hits = index_clone
                    .overlapping(&key, probe..probe + 25)
                    .expect("query failed");
                assert!(hits.len() > 0);
            }
        });
        handles.push(handle);
    }

    for writer_id in 0..writers {
        let index_clone = index.clone();
        let handle = thread::spawn(move || {
            let key = "calendar".to_string();
            for i in 0..ops_per_thread {
                let low = 1_000_000 + ((writer_id * ops_per_thread + i) as i64) * 10;
                let id = index_clone
                    .insert(key.clone(), low..low + 10, i)
                    .expect("insert failed");
                index_clone.remove(id).expect("remove failed");
            }
        });
        handles.push(handle);
    }

    // Wait for all threads to complete
    for handle in handles {
        handle.join().unwrap();
    }

    let elapsed = start.elapsed();
    let total_ops = (readers + writers) * ops_per_thread;
    println!("  • {} readers + {} writers on one key", readers, writers);
    println!(
        "  • {} operations in {:?} ({:.0} ops/sec)",
        total_ops,
        elapsed,
        total_ops as f64 / elapsed.as_secs_f64()
    );
    index.validate().expect("index must be sound");
    println!("  • invariant verified after the storm ✅");
}
