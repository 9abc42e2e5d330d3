//! Placeholder banners for clips whose image never materialized.

use rand::seq::SliceRandom;
use rand::Rng;

/// Deadpan "content removed" banners.
pub const PLACEHOLDER_BANNERS: [&str; 6] = [
    "[IMAGE REMOVED]",
    "This image has been removed\nfor violating community guidelines",
    "Image unavailable in your region",
    "[CONTENT REDACTED]",
    "The artist refused to draw this",
    "Visual withheld for legal reasons",
];

/// One banner, uniformly at random.
pub fn pick_banner<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PLACEHOLDER_BANNERS
        .choose(rng)
        .copied()
        .unwrap_or(PLACEHOLDER_BANNERS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_banner_comes_from_fixed_set() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert!(PLACEHOLDER_BANNERS.contains(&pick_banner(&mut rng)));
        }
    }
}
