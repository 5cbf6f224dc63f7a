//! Random selection for the shuffle button
//!
//! Shuffle picks one item uniformly over the whole library. It does not
//! reorder anything and may pick the item that is already playing.

use rand::Rng;

/// Uniformly random index into a library of `len` items
///
/// Returns `None` for an empty library.
pub fn random_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn empty_library_has_no_index() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_index(&mut rng, 0), None);
    }

    #[test]
    fn indices_stay_in_range_and_cover_library() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for _ in 0..500 {
            let index = random_index(&mut rng, 5).unwrap();
            assert!(index < 5);
            seen.insert(index);
        }

        assert_eq!(seen.len(), 5, "every index should come up eventually");
    }
}
