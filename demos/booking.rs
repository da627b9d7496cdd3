//! Room Booking Walkthrough
//!
//! This example walks a month of meeting-room reservations through the index:
//! taking bookings, rejecting double-bookings with full conflict details,
//! probing who holds a date, and rebuilding everything from a snapshot.

use chrono::NaiveDate;
use overlock::{Error, ExclusionIndex, IndexConfig, Interval};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).expect("valid January day")
}

fn main() {
    println!("📅 Room Booking Walkthrough\n");

    let index: ExclusionIndex<String, NaiveDate, String> = ExclusionIndex::new();
    let room_12 = String::from("room-12");
    let room_14 = String::from("room-14");

    // Checkout day equals the next guest's check-in day, so back-to-back
    // stays never collide.
    println!("📊 Taking reservations");
    let alice = index
        .insert(room_12.clone(), day(1)..day(8), "alice".to_string())
        .expect("booking failed");
    println!(
        "  • alice holds {} {} (entry {})",
        room_12,
        Interval::new(day(1), day(8)),
        alice
    );

    let bob = index
        .insert(room_12.clone(), day(8)..day(15), "bob".to_string())
        .expect("booking failed");
    println!(
        "  • bob checks in the day alice leaves (entry {}) ✅",
        bob
    );

    // A stay crossing both existing bookings is rejected with every
    // blocking entry listed.
    println!("\n📊 Double-booking rejected");
    match index.insert(room_12.clone(), day(5)..day(12), "carol".to_string()) {
        Err(Error::Conflict(conflict)) => {
            println!("  • carol rejected ❌: {}", conflict);
            for taken in &conflict.conflicts {
                println!("      blocked by entry {} at {}", taken.id, taken.interval);
            }
        }
        other => panic!("expected a conflict, got {:?}", other),
    }

    let carol = index
        .insert(room_14.clone(), day(5)..day(12), "carol".to_string())
        .expect("booking failed");
    println!("  • carol takes {} instead (entry {}) ✅", room_14, carol);

    // An empty interval is a point probe: who holds January 10?
    println!("\n📊 Probing a date");
    let on_the_tenth = index
        .overlapping(&room_12, Interval::empty_at(day(10)))
        .expect("probe failed");
    for entry in on_the_tenth {
        println!("  • January 10 in {} belongs to {} ({})", room_12, entry.payload, entry.interval);
    }
    let occupied = index.contains(&room_12, &day(10)).expect("probe failed");
    println!("  • contains({}) on January 10: {}", room_12, occupied);

    // Cancelling frees the span immediately.
    println!("\n📊 Cancel and rebook");
    let guest = index.remove(alice).expect("cancellation failed");
    println!("  • {} cancelled, first week released", guest);
    let dave = index
        .insert(room_12.clone(), day(1)..day(8), "dave".to_string())
        .expect("rebooking failed");
    println!("  • dave picks up the freed week (entry {}) ✅", dave);

    // An update never conflicts with the entry's own old interval.
    println!("\n📊 Extending a stay");
    index.update(bob, day(8)..day(17)).expect("extension failed");
    let extended = index.get(bob).expect("bob must still be booked");
    println!("  • bob now holds {} ✅", extended.interval);

    let erin = index
        .insert(room_14.clone(), day(12)..day(20), "erin".to_string())
        .expect("booking failed");
    match index.update(carol, day(5)..day(14)) {
        Err(Error::Conflict(conflict)) => {
            println!("  • carol cannot extend past erin (entry {}) ❌: {}", erin, conflict);
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
    let unchanged = index.get(carol).expect("carol must still be booked");
    println!("  • rejected update left carol at {} ✅", unchanged.interval);

    // A snapshot is a consistent cut; restoring re-checks every booking.
    println!("\n📊 Snapshot and restore");
    let entries = index.snapshot();
    println!(
        "  • snapshot holds {} bookings across {} rooms",
        entries.len(),
        index.key_count()
    );
    let restored = ExclusionIndex::from_snapshot(entries, IndexConfig::default())
        .expect("restore failed");
    restored.validate().expect("restored index must be sound");
    println!("  • restored copy verified: {} bookings ✅", restored.len());

    println!("\n📊 Final roster");
    for entry in restored.snapshot() {
        println!("  • {} {} {}", entry.key, entry.interval, entry.payload);
    }

    println!("\n✅ Walkthrough completed successfully!");
}
