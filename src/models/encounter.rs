use std::ops::RangeInclusive;

use rand::seq::IndexedRandom;
use rand::Rng;

/// A contiguous range of species ids with its encounter weight.
#[derive(Debug, Clone)]
pub struct GenerationBand {
    pub generation: u8,
    pub ids: RangeInclusive<u32>,
    pub weight: f64,
}

/// Weights sum to 1.0.
pub static GENERATION_BANDS: [GenerationBand; 5] = [
    GenerationBand {
        generation: 1,
        ids: 1..=151,
        weight: 0.40,
    },
    GenerationBand {
        generation: 2,
        ids: 152..=251,
        weight: 0.30,
    },
    GenerationBand {
        generation: 3,
        ids: 252..=386,
        weight: 0.15,
    },
    GenerationBand {
        generation: 4,
        ids: 387..=493,
        weight: 0.10,
    },
    GenerationBand {
        generation: 5,
        ids: 494..=649,
        weight: 0.05,
    },
];

/// Chance that a wild level comes from the low range.
const LOW_LEVEL_CHANCE: f64 = 0.8;
const LOW_LEVELS: RangeInclusive<u32> = 1..=20;
const HIGH_LEVELS: RangeInclusive<u32> = 20..=75;

/// Pick a generation band by weight, then a species id uniformly inside it.
pub fn generate_species_id<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let band = GENERATION_BANDS
        .choose_weighted(rng, |band| band.weight)
        .unwrap_or(&GENERATION_BANDS[0]);
    rng.random_range(band.ids.clone())
}

/// 80%: uniform in 1..=20, otherwise uniform in 20..=75. Both ranges include 20.
pub fn generate_level<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.random_bool(LOW_LEVEL_CHANCE) {
        rng.random_range(LOW_LEVELS)
    } else {
        rng.random_range(HIGH_LEVELS)
    }
}

/// `floor(base_hp * 2 * level / 100 + level + 10)`
pub fn scaled_hp(base_hp: u32, level: u32) -> u32 {
    let base = base_hp as f64;
    let level = level as f64;
    (base * 2.0 * level / 100.0 + level + 10.0).floor() as u32
}

/// Generation a species id belongs to, if it is in an encounter band.
pub fn generation_of(id: u32) -> Option<u8> {
    GENERATION_BANDS
        .iter()
        .find(|band| band.ids.contains(&id))
        .map(|band| band.generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = GENERATION_BANDS.iter().map(|b| b.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bands_are_contiguous() {
        let mut next = 1;
        for band in &GENERATION_BANDS {
            assert_eq!(*band.ids.start(), next);
            next = band.ids.end() + 1;
        }
        assert_eq!(next, 650);
    }

    #[test]
    fn test_species_ids_follow_band_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = 100_000;
        let mut counts = [0usize; 5];
        for _ in 0..samples {
            let id = generate_species_id(&mut rng);
            assert!((1..=649).contains(&id), "id {id} out of range");
            let generation = generation_of(id).unwrap();
            counts[(generation - 1) as usize] += 1;
        }
        for (band, count) in GENERATION_BANDS.iter().zip(counts) {
            let share = count as f64 / samples as f64;
            assert!(
                (share - band.weight).abs() < 0.01,
                "generation {} share {share} expected {}",
                band.generation,
                band.weight
            );
        }
    }

    #[test]
    fn test_levels_stay_in_range_and_skew_low() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples = 50_000;
        let mut low = 0;
        for _ in 0..samples {
            let level = generate_level(&mut rng);
            assert!((1..=75).contains(&level));
            if level < 20 {
                low += 1;
            }
        }
        // P(level < 20) = 0.8 * 19/20 = 0.76
        let share = low as f64 / samples as f64;
        assert!((share - 0.76).abs() < 0.015, "low share {share}");
    }

    #[test]
    fn test_scaled_hp() {
        assert_eq!(scaled_hp(100, 50), 160);
        assert_eq!(scaled_hp(35, 5), 18);
        assert_eq!(scaled_hp(45, 1), 11);
        assert_eq!(scaled_hp(255, 75), 467);
    }

    #[test]
    fn test_generation_of() {
        assert_eq!(generation_of(1), Some(1));
        assert_eq!(generation_of(151), Some(1));
        assert_eq!(generation_of(152), Some(2));
        assert_eq!(generation_of(649), Some(5));
        assert_eq!(generation_of(650), None);
        assert_eq!(generation_of(0), None);
    }
}
