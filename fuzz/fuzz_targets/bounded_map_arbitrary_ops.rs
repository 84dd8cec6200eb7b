#![no_main]

use heapkit::error::Error;
use heapkit::policy::bounded_map::BoundedMap;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on BoundedMap
//
// Tests random sequences of set, set_or_replace, remove, get and
// set_capacity, checking map/heap agreement after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut map: BoundedMap<u8, u8> = BoundedMap::new(usize::from(data[0] % 32));

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 5;
        let key = data[idx + 1];
        let value = data[idx + 2];

        match op {
            0 => {
                // set
                let was_present = map.contains_key(&key);
                match map.set(key, value) {
                    Ok(Some((evicted, _))) => assert!(!map.contains_key(&evicted)),
                    Ok(None) => assert_eq!(map.get(&key), Ok(&value)),
                    Err(err) => {
                        assert!(was_present);
                        assert_eq!(err, Error::AlreadyPresent);
                    },
                }
            },
            1 => {
                // set_or_replace
                let previous = map.get(&key).ok().copied();
                let replaced = map.set_or_replace(key, value).unwrap();
                if previous.is_some() {
                    assert_eq!(replaced, previous);
                    assert_eq!(map.get(&key), Ok(&value));
                }
            },
            2 => {
                // remove
                let expected = map.get(&key).ok().copied();
                assert_eq!(map.remove(&key).ok(), expected);
                assert!(!map.contains_key(&key));
            },
            3 => {
                // peek
                match map.peek_extremum_key().copied() {
                    Ok(top) => {
                        let min = map.values().into_iter().min();
                        assert_eq!(map.get(&top).ok().copied(), min);
                    },
                    Err(err) => {
                        assert_eq!(err, Error::Empty);
                        assert!(map.is_empty());
                    },
                }
            },
            4 => {
                // set_capacity
                let capacity = usize::from(value % 24);
                map.set_capacity(capacity).unwrap();
                assert!(map.len() <= capacity);
            },
            _ => unreachable!(),
        }

        assert!(map.len() <= map.capacity());
        map.check_invariants().unwrap();
        idx += 3;
    }
});
