//! Loot roll on enemy death

use rand::Rng;

use super::entities::PowerupKind;

/// Cumulative thresholds for one uniform draw in [0, 1)
const LOOT_TABLE: [(f64, PowerupKind); 3] = [
    (0.05, PowerupKind::Life),
    (0.10, PowerupKind::Energy),
    (0.20, PowerupKind::Cake),
];

/// Map a uniform draw onto the loot table
pub fn loot_for(draw: f64) -> Option<PowerupKind> {
    LOOT_TABLE
        .iter()
        .find(|(threshold, _)| draw < *threshold)
        .map(|&(_, kind)| kind)
}

/// Roll at most one powerup
pub fn roll_loot<R: Rng>(rng: &mut R) -> Option<PowerupKind> {
    loot_for(rng.random::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_loot_thresholds() {
        assert_eq!(loot_for(0.0), Some(PowerupKind::Life));
        assert_eq!(loot_for(0.0499), Some(PowerupKind::Life));
        assert_eq!(loot_for(0.05), Some(PowerupKind::Energy));
        assert_eq!(loot_for(0.1), Some(PowerupKind::Cake));
        assert_eq!(loot_for(0.1999), Some(PowerupKind::Cake));
        assert_eq!(loot_for(0.2), None);
        assert_eq!(loot_for(0.99), None);
    }

    #[test]
    fn test_loot_distribution() {
        const N: usize = 100_000;
        let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
        let (mut life, mut energy, mut cake, mut none) = (0usize, 0usize, 0usize, 0usize);
        for _ in 0..N {
            match roll_loot(&mut rng) {
                Some(PowerupKind::Life) => life += 1,
                Some(PowerupKind::Energy) => energy += 1,
                Some(PowerupKind::Cake) => cake += 1,
                None => none += 1,
            }
        }

        // Five standard deviations of a binomial at N = 100k is under 0.7%
        let rate = |count: usize| count as f64 / N as f64;
        assert!((rate(life) - 0.05).abs() < 0.007, "life rate {}", rate(life));
        assert!((rate(energy) - 0.05).abs() < 0.007, "energy rate {}", rate(energy));
        assert!((rate(cake) - 0.10).abs() < 0.01, "cake rate {}", rate(cake));
        assert!((rate(none) - 0.80).abs() < 0.01, "none rate {}", rate(none));
    }
}
