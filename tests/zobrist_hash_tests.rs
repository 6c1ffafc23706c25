
use mill_engine::{
    constants::MAX_PIECES_PER_SIDE,
    types::{Occupant, Side, Square},
    zobrist_hash::{
        MAX_PENDING_REMOVALS, ZOBRIST_HASH_TABLE, ZOBRIST_LOCK_TABLE, ZobristTables,
        zobrist_keys, zobrist_locks,
    },
};
use std::collections::HashSet;
use test_utils::ensure_zobrist_initialized;

/// Every constant of one table
fn all_values(table: &ZobristTables) -> Vec<u64> {
    let mut values = Vec::new();

    for square in Square::iter() {
        for occupant in Occupant::iter() {
            values.push(table.occupant_key(square, occupant));
        }
    }

    values.push(table.side_to_move);

    for side in Side::iter() {
        for count in 0..=MAX_PIECES_PER_SIDE as u8 {
            values.push(table.in_hand_key(side, count));
        }
    }

    for count in 0..=MAX_PENDING_REMOVALS as u8 {
        values.push(table.pending_removals_key(count));
    }

    values
}

#[test]
fn zobrist_tables_initialize_once() {
    ensure_zobrist_initialized();
    ensure_zobrist_initialized();

    assert!(ZOBRIST_HASH_TABLE.get().is_some());
    assert!(ZOBRIST_LOCK_TABLE.get().is_some());

    assert!(
        std::ptr::eq(zobrist_keys(), zobrist_keys()),
        "Tables should be built once and shared"
    );
}

#[test]
fn zobrist_keys_are_nonzero_and_unique() {
    ensure_zobrist_initialized();

    let values = all_values(zobrist_keys());
    let unique: HashSet<u64> = values.iter().copied().collect();

    assert!(
        values.iter().all(|&value| value != 0),
        "No key should be zero"
    );
    assert_eq!(
        unique.len(),
        values.len(),
        "Every key should be distinct"
    );
}

#[test]
fn zobrist_locks_are_independent_of_keys() {
    ensure_zobrist_initialized();

    let keys: HashSet<u64> = all_values(zobrist_keys()).into_iter().collect();
    let locks = all_values(zobrist_locks());

    assert!(
        locks.iter().all(|lock| !keys.contains(lock)),
        "Lock constants should not reuse key constants"
    );
}

#[test]
fn zobrist_keys_are_reproducible() {
    ensure_zobrist_initialized();

    // The tables come from a fixed seed, so a known position always has the same key
    let a = test_utils::position_from("W.......B............... b 8 8");
    let b = test_utils::position_from("W.......B............... b 8 8");

    assert_eq!(a.key(), b.key());
    assert_eq!(a.hash(), a.compute_hash());
}
