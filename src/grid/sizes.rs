//! Split size arithmetic
//!
//! Sizes are percentages of the parent split. After every resize they sum to
//! exactly 100 and, whenever the minimums fit, no entry is below the minimum.

/// Tolerance used when comparing size totals
pub const SIZE_EPSILON: f64 = 0.01;

/// Clamp sizes to a minimum and renormalize them to sum to 100
///
/// 1. Every size is raised to at least `min` (non-finite entries become `min`).
/// 2. If the total now exceeds 100 and the minimums alone need 100 or more,
///    the space is split equally. Otherwise the overflow is taken from the
///    entries above `min`, in proportion to how far above `min` they are.
/// 3. The result is rescaled to sum to 100, with the largest entry absorbing
///    floating point residue.
pub fn enforce_minimum_sizes(sizes: &[f64], min: f64) -> Vec<f64> {
    let count = sizes.len();
    if count == 0 {
        return Vec::new();
    }
    let min = if min.is_finite() { min.max(0.0) } else { 0.0 };
    let equal = 100.0 / count as f64;
    if min * count as f64 >= 100.0 {
        return vec![equal; count];
    }

    let mut clamped: Vec<f64> = sizes
        .iter()
        .map(|s| if s.is_finite() { s.max(min) } else { min })
        .collect();

    let total: f64 = clamped.iter().sum();
    if total > 100.0 {
        let overflow = total - 100.0;
        let shrinkable: f64 = clamped.iter().map(|s| s - min).sum();
        if shrinkable > 0.0 {
            for size in &mut clamped {
                let above = *size - min;
                *size -= overflow * above / shrinkable;
            }
        }
    }

    renormalize(&mut clamped, min);
    clamped
}

/// Scale sizes to sum to exactly 100 without pushing any entry below `min`
fn renormalize(sizes: &mut [f64], min: f64) {
    let total: f64 = sizes.iter().sum();
    if total <= 0.0 {
        let equal = 100.0 / sizes.len() as f64;
        sizes.iter_mut().for_each(|s| *s = equal);
        return;
    }
    let factor = 100.0 / total;
    for size in sizes.iter_mut() {
        *size = (*size * factor).max(min);
    }

    let Some(largest) = sizes
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
    else {
        return;
    };
    let others: f64 = sizes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != largest)
        .map(|(_, s)| s)
        .sum();
    sizes[largest] = 100.0 - others;
}

/// Sizes for a two-way split where the first child gets `ratio` of the space
pub fn ratio_sizes(ratio: f64, min: f64) -> Vec<f64> {
    enforce_minimum_sizes(&[ratio * 100.0, (1.0 - ratio) * 100.0], min)
}

/// True when the sizes satisfy the sum and minimum invariants
pub fn sizes_valid(sizes: &[f64], min: f64) -> bool {
    if sizes.is_empty() {
        return false;
    }
    let total: f64 = sizes.iter().sum();
    // With too many children the minimum cannot hold; equal shares are the floor
    let floor = min.min(100.0 / sizes.len() as f64);
    (total - 100.0).abs() <= SIZE_EPSILON && sizes.iter().all(|s| *s >= floor - SIZE_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sizes(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_drag_past_minimum_clamps() {
        let sizes = enforce_minimum_sizes(&[95.0, 5.0], 10.0);
        assert_sizes(&sizes, &[90.0, 10.0]);
    }

    #[test]
    fn test_overflow_taken_proportionally() {
        // Clamped to [10, 60, 40] = 110; shrinkable 50 and 30 lose 10 * 5/8 and 10 * 3/8
        let sizes = enforce_minimum_sizes(&[0.0, 60.0, 40.0], 10.0);
        assert_sizes(&sizes, &[10.0, 53.75, 36.25]);
    }

    #[test]
    fn test_minimums_exceeding_total_distribute_equally() {
        let sizes = enforce_minimum_sizes(&[50.0, 20.0, 20.0, 10.0], 30.0);
        assert_sizes(&sizes, &[25.0, 25.0, 25.0, 25.0]);
    }

    #[test]
    fn test_under_full_total_scales_up() {
        let sizes = enforce_minimum_sizes(&[20.0, 30.0], 10.0);
        assert_sizes(&sizes, &[40.0, 60.0]);
    }

    #[test]
    fn test_non_finite_entries_become_minimum() {
        let sizes = enforce_minimum_sizes(&[f64::NAN, 100.0], 10.0);
        assert!(sizes_valid(&sizes, 10.0));
        assert!((sizes[0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_sizes() {
        assert_sizes(&ratio_sizes(0.5, 10.0), &[50.0, 50.0]);
        assert_sizes(&ratio_sizes(0.99, 10.0), &[90.0, 10.0]);
    }

    #[test]
    fn test_sum_is_exact() {
        let sizes = enforce_minimum_sizes(&[33.3, 33.3, 33.3], 10.0);
        let total: f64 = sizes.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
