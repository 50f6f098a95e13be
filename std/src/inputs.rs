//! Input construction for battle mode and "randomize" features.
//!
//! Runners are pure, so randomness lives here: callers pass an explicit
//! `Rng`, build an input, and every trace generated from it downstream is
//! deterministic.

use crate::runners::sorting::SortingInput;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The starting arrangement of a generated battle array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayShape {
    Random,
    Sorted,
    Reverse,
    NearlySorted,
}

/// `size` values drawn uniformly from 1..=100.
pub fn random_array(rng: &mut impl Rng, size: usize) -> Vec<i64> {
    (0..size).map(|_| rng.random_range(1..=100)).collect()
}

/// `size` ascending values spread across 1..=100.
pub fn sorted_array(size: usize) -> Vec<i64> {
    (0..size)
        .map(|i| ((i as f64 / size as f64) * 100.0) as i64 + 1)
        .collect()
}

/// [`sorted_array`] reversed.
pub fn reverse_array(size: usize) -> Vec<i64> {
    let mut arr = sorted_array(size);
    arr.reverse();
    arr
}

/// A sorted array with `size / 5` random pair swaps applied.
pub fn nearly_sorted_array(rng: &mut impl Rng, size: usize) -> Vec<i64> {
    let mut arr = sorted_array(size);
    if size == 0 {
        return arr;
    }
    for _ in 0..size / 5 {
        let a = rng.random_range(0..size);
        let b = rng.random_range(0..size);
        arr.swap(a, b);
    }
    arr
}

/// A ready-to-race sorting input of the requested shape.
pub fn battle_array(rng: &mut impl Rng, shape: ArrayShape, size: usize) -> SortingInput {
    let array = match shape {
        ArrayShape::Random => random_array(rng, size),
        ArrayShape::Sorted => sorted_array(size),
        ArrayShape::Reverse => reverse_array(size),
        ArrayShape::NearlySorted => nearly_sorted_array(rng, size),
    };
    SortingInput { array }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sorted_and_reverse_shapes() {
        let sorted = sorted_array(10);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sorted.len(), 10);

        let reversed = reverse_array(10);
        assert!(reversed.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_random_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let arr = random_array(&mut rng, 50);
        assert_eq!(arr.len(), 50);
        assert!(arr.iter().all(|&v| (1..=100).contains(&v)));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = battle_array(&mut StdRng::seed_from_u64(42), ArrayShape::Random, 20);
        let b = battle_array(&mut StdRng::seed_from_u64(42), ArrayShape::Random, 20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nearly_sorted_keeps_elements() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut arr = nearly_sorted_array(&mut rng, 25);
        let mut reference = sorted_array(25);
        arr.sort_unstable();
        reference.sort_unstable();
        assert_eq!(arr, reference);
    }
}
