#![no_main]

use heapkit::ds::{IndexedHeap, PushOutcome};
use heapkit::error::Error;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IndexedHeap
//
// Tests random sequences of push, pop, pushpop, replace, remove, peek and
// capacity changes, checking the index after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut heap: IndexedHeap<u16> = IndexedHeap::with_capacity(usize::from(data[0] % 64));

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let value = u16::from(data[idx + 1]);

        match op {
            0 | 1 => {
                // push
                let was_present = heap.contains(&value);
                let old_len = heap.len();
                match heap.push(value) {
                    Ok(PushOutcome::Inserted) => assert_eq!(heap.len(), old_len + 1),
                    Ok(PushOutcome::Displaced(old)) => {
                        assert_eq!(heap.len(), old_len);
                        assert!(!heap.contains(&old));
                        assert!(heap.contains(&value));
                    },
                    Ok(PushOutcome::Rejected(item)) => {
                        assert_eq!(item, value);
                        assert!(!heap.contains(&value));
                    },
                    Err(err) => {
                        assert!(was_present);
                        assert_eq!(err, Error::AlreadyPresent);
                    },
                }
            },
            2 => {
                // pop
                let expected = heap.items().iter().min().copied();
                match heap.pop() {
                    Ok(top) => assert_eq!(Some(top), expected),
                    Err(err) => {
                        assert_eq!(err, Error::Empty);
                        assert!(heap.is_empty());
                    },
                }
            },
            3 => {
                // pushpop
                if let Ok(out) = heap.pushpop(value) {
                    assert!(!heap.contains(&out));
                }
            },
            4 => {
                // replace
                if let Ok(old) = heap.replace(value) {
                    assert!(heap.contains(&value));
                    assert!(!heap.contains(&old));
                }
            },
            5 => {
                // remove
                let was_present = heap.contains(&value);
                assert_eq!(heap.remove(&value).is_ok(), was_present);
                assert!(!heap.contains(&value));
            },
            6 => {
                // peeks
                if let Ok(top) = heap.peek_top() {
                    assert_eq!(Some(top), heap.items().iter().min());
                }
                let max = heap.items().iter().max().copied();
                assert_eq!(heap.peek_extremum().ok().copied(), max);
            },
            7 => {
                // set_capacity
                let capacity = usize::from(value % 48);
                heap.set_capacity(capacity).unwrap();
                assert!(heap.len() <= capacity);
            },
            _ => unreachable!(),
        }

        assert!(heap.len() <= heap.capacity());
        heap.check_invariants().unwrap();
        idx += 2;
    }
});
