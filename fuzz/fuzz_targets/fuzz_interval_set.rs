//! Fuzzt die Intervallmenge mit zufaelligen Operationsfolgen und prueft
//! danach die Kern-Invarianten (Sortierung, Luecken, Laengen-Cache).

#![no_main]

use dcc_selection::IntervalSet;
use libfuzzer_sys::fuzz_target;

fn check_invariants(set: &IntervalSet<u32>) {
    let intervals = set.intervals();
    let mut total = 0usize;
    for interval in intervals {
        assert!(interval.start <= interval.end);
        total += interval.len();
    }
    for window in intervals.windows(2) {
        assert!(u64::from(window[0].end) + 1 < u64::from(window[1].start));
    }
    assert_eq!(set.len(), total);
}

fuzz_target!(|data: &[u8]| {
    let mut set: IntervalSet<u32> = IntervalSet::new();

    // Je 3 Bytes: 1 Opcode + 2 Bytes Wert. Werte bleiben klein genug,
    // dass successor/predecessor nie an Typgrenzen laufen.
    for chunk in data.chunks_exact(3) {
        let value = u32::from(u16::from_le_bytes([chunk[1], chunk[2]]));
        match chunk[0] % 4 {
            0 => {
                set.insert(value);
            }
            1 => {
                set.remove(value);
            }
            2 => {
                let other = IntervalSet::from_values([value, value / 2, value.saturating_add(7)]);
                set.union_with(&other);
            }
            _ => {
                let other = IntervalSet::from_values([value, value.saturating_add(1)]);
                set.difference_with(&other);
            }
        }
        check_invariants(&set);
    }

    // Flatten und Lazy-Iteration muessen uebereinstimmen
    let flattened = set.to_vec();
    let lazy: Vec<u32> = set.iter().collect();
    assert_eq!(flattened, lazy);
    for &value in &flattened {
        assert!(set.contains(value));
    }
});
