//! CPU-bound workload kernel

/// Run `units` iterations of a linear-congruential recurrence, folding in
/// the iteration index so consecutive states never cycle.
///
/// The accumulated value is returned only so callers can pass it through
/// `black_box`; nobody interprets it. Runtime is proportional to `units`.
pub fn compute_work(units: u64) -> u32 {
    let mut acc: u32 = 0;
    for i in 0..units {
        acc = acc
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223)
            .wrapping_add(i as u32);
    }
    std::hint::black_box(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_units() {
        assert_eq!(compute_work(0), 0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(compute_work(200_000), compute_work(200_000));
    }

    #[test]
    fn test_units_change_result() {
        assert_ne!(compute_work(1000), compute_work(1001));
    }

    #[test]
    fn test_first_iterations() {
        // acc_1 = 0 * 1664525 + 1013904223 + 0
        assert_eq!(compute_work(1), 1_013_904_223);
        // acc_2 = acc_1 * 1664525 + 1013904223 + 1 (mod 2^32)
        let expected = 1_013_904_223u32
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223)
            .wrapping_add(1);
        assert_eq!(compute_work(2), expected);
    }
}
