use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::constants::FULL_TURN_DEGREES;
use crate::sector_map::SectorMap;

/// How a terminal angle was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleSource {
    Targeted(usize),
    Random,
    /// A target was requested but it is not a valid prize index, so the spin was
    /// resolved exactly like an untargeted one.
    OutOfRangeFallback { requested: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub terminal_angle: f64,
    pub source: AngleSource,
}

/// Computes the terminal rotation for a spin, always moving forward from the wheel's
/// current visual angle and adding `min_rotations` full turns.
#[derive(Debug, Clone, Copy)]
pub struct AngleResolver {
    sectors: SectorMap,
    min_rotations: u32,
}

impl AngleResolver {
    pub fn new(sectors: SectorMap, min_rotations: u32) -> Self {
        Self { sectors, min_rotations }
    }

    /// Rotation (before extra turns) that centres `target` under the top pointer:
    /// `360 - target * width - width / 2`.
    pub fn base_angle(&self, target: usize) -> f64 {
        let width = self.sectors.sector_width();
        FULL_TURN_DEGREES - self.sectors.sector_offset(target) - width / 2.0
    }

    pub fn terminal_angle<R: Rng + ?Sized>(&self, target: Option<usize>, current_angle: f64, rng: &mut R) -> Resolution {
        let turns = self.min_rotations as f64 * FULL_TURN_DEGREES;

        match target {
            Some(index) if index < self.sectors.prize_count() => {
                // Align the forward offset to the wheel's current orientation so the
                // sector centre still ends under the pointer.
                let offset = (self.base_angle(index) - current_angle).rem_euclid(FULL_TURN_DEGREES);
                Resolution {
                    terminal_angle: current_angle + turns + offset,
                    source: AngleSource::Targeted(index),
                }
            }
            Some(requested) => Resolution {
                terminal_angle: current_angle + turns + rng.gen_range(0.0..FULL_TURN_DEGREES),
                source: AngleSource::OutOfRangeFallback { requested },
            },
            None => Resolution {
                terminal_angle: current_angle + turns + rng.gen_range(0.0..FULL_TURN_DEGREES),
                source: AngleSource::Random,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn resolver(count: usize, rotations: u32) -> AngleResolver {
        AngleResolver::new(SectorMap::new(count).unwrap(), rotations)
    }

    #[test]
    fn test_targeted_angle_from_rest() {
        let mut rng = StdRng::seed_from_u64(7);
        let resolution = resolver(4, 3).terminal_angle(Some(2), 0.0, &mut rng);
        assert_eq!(resolution.source, AngleSource::Targeted(2));
        assert_eq!(resolution.terminal_angle, 1215.0);
    }

    #[test]
    fn test_every_target_lands_under_pointer() {
        let mut rng = StdRng::seed_from_u64(1);
        for count in 1..=10 {
            let r = resolver(count, 3);
            let map = SectorMap::new(count).unwrap();
            for target in 0..count {
                for current in [0.0, 720.0, 37.0, 1234.5] {
                    let resolution = r.terminal_angle(Some(target), current, &mut rng);
                    assert_eq!(map.index_at_pointer(resolution.terminal_angle), target);
                    assert!(resolution.terminal_angle >= current + 3.0 * 360.0);
                    assert!(resolution.terminal_angle < current + 4.0 * 360.0);
                }
            }
        }
    }

    #[test]
    fn test_random_angle_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let r = resolver(6, 2);
        for _ in 0..200 {
            let resolution = r.terminal_angle(None, 360.0, &mut rng);
            assert_eq!(resolution.source, AngleSource::Random);
            assert!(resolution.terminal_angle >= 360.0 + 720.0);
            assert!(resolution.terminal_angle < 360.0 + 1080.0);
        }
    }

    #[test]
    fn test_out_of_range_target_falls_back_to_random() {
        let r = resolver(4, 3);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        let fallback = r.terminal_angle(Some(99), 0.0, &mut a);
        let random = r.terminal_angle(None, 0.0, &mut b);

        assert_eq!(fallback.source, AngleSource::OutOfRangeFallback { requested: 99 });
        assert_eq!(fallback.terminal_angle, random.terminal_angle);
        assert!(SectorMap::new(4).unwrap().index_at_pointer(fallback.terminal_angle) < 4);
    }
}
