//! Process-wide allocator for root tree identifiers.
//!
//! Every root tree gets a fresh `u64` from a single atomic counter, so two
//! occurrences are identical only if they came from the same root. The
//! counter is the one piece of shared mutable state in the crate.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ROOT_ID: AtomicU64 = AtomicU64::new(0);

/// Issues the next root identifier. Strictly increasing; no two callers ever
/// observe the same value, regardless of how many threads are drawing.
pub(crate) fn next() -> u64 {
    NEXT_ROOT_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// The most recently issued identifier, without allocating a new one.
/// Returns 0 before any identifier has been issued.
#[allow(dead_code)]
pub(crate) fn current() -> u64 {
    NEXT_ROOT_ID.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn next_is_strictly_increasing() {
        let a = next();
        let b = next();
        let c = next();
        assert!(a < b && b < c);
    }

    #[test]
    fn current_does_not_allocate() {
        let issued = next();
        assert!(current() >= issued);
        let observed = current();
        assert_eq!(current(), observed);
    }

    #[test]
    fn concurrent_draws_are_all_distinct() {
        const THREADS: usize = 8;
        const DRAWS: usize = 1000;

        let (tx, rx) = mpsc::channel();
        let mut handles = Vec::new();
        for _ in 0..THREADS {
            let tx = tx.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..DRAWS {
                    tx.send(next()).unwrap();
                }
            }));
        }
        drop(tx);
        for handle in handles {
            handle.join().unwrap();
        }

        let ids: Vec<u64> = rx.iter().collect();
        assert_eq!(ids.len(), THREADS * DRAWS);
        let distinct: HashSet<u64> = ids.into_iter().collect();
        assert_eq!(distinct.len(), THREADS * DRAWS);
    }
}
