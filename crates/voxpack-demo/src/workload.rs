//! Synthetic section contents used by the demo.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use voxpack_array::{ArrayError, BlockArray, LightArray, MAX_LIGHT, SECTION_EDGE, SECTION_VOLUME};

/// Linear index of `(x, y, z)` inside a section (x varies fastest, then z, then y).
pub fn section_index(x: usize, y: usize, z: usize) -> usize {
    debug_assert!(x < SECTION_EDGE && y < SECTION_EDGE && z < SECTION_EDGE);
    (y << 8) | (z << 4) | x
}

/// A layout change observed while filling a block array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Index whose `set` caused the change.
    pub index: usize,
    /// Bits per value after the change.
    pub bits: u8,
    /// Whether the array switched to direct storage.
    pub direct: bool,
}

/// Fills `array` with `distinct` different global ids and returns what was
/// written plus every layout change along the way.
///
/// The first `distinct` indices receive each id once, the rest are drawn at
/// random from the same set. `distinct` is clamped to what a section and the
/// direct width can hold.
pub fn fill_blocks(
    array: &mut BlockArray,
    distinct: u32,
    seed: u64,
) -> Result<(Vec<u64>, Vec<Transition>), ArrayError> {
    let count = u64::from(distinct.max(1))
        .min(SECTION_VOLUME as u64)
        .min(array.limits().direct_max());
    let ids: Vec<u64> = (1..=count).collect();

    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut written = Vec::with_capacity(SECTION_VOLUME);
    let mut transitions = Vec::new();
    let mut bits = array.bits_per_value();

    for index in 0..SECTION_VOLUME {
        let value = match ids.get(index) {
            Some(&id) => id,
            None => ids[rng.gen_range(0..ids.len())],
        };
        array.set(index, value)?;
        written.push(value);

        if array.bits_per_value() != bits {
            bits = array.bits_per_value();
            transitions.push(Transition {
                index,
                bits,
                direct: array.is_direct(),
            });
        }
    }
    Ok((written, transitions))
}

/// Counts elements whose stored value differs from `expected`.
pub fn count_mismatches(array: &BlockArray, expected: &[u64]) -> Result<usize, ArrayError> {
    let mut mismatches = 0;
    for (index, &value) in expected.iter().enumerate() {
        if array.get(index)? != value {
            mismatches += 1;
        }
    }
    Ok(mismatches)
}

/// Fills `light` with sky light that loses `falloff` levels per layer below the top.
pub fn fill_sky_light(light: &mut LightArray, falloff: u8) -> Result<(), ArrayError> {
    for y in 0..SECTION_EDGE {
        let depth = (SECTION_EDGE - 1 - y) as u8;
        let level = MAX_LIGHT.saturating_sub(depth.saturating_mul(falloff));
        for z in 0..SECTION_EDGE {
            for x in 0..SECTION_EDGE {
                light.set(section_index(x, y, z), level)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_index_layout() {
        assert_eq!(section_index(0, 0, 0), 0);
        assert_eq!(section_index(1, 0, 0), 1);
        assert_eq!(section_index(0, 0, 1), 16);
        assert_eq!(section_index(0, 1, 0), 256);
        assert_eq!(section_index(15, 15, 15), 4095);
    }

    #[test]
    fn test_fill_reports_each_growth_step() {
        let mut array = BlockArray::empty();
        let (written, transitions) = fill_blocks(&mut array, 300, 42).unwrap();
        let bits: Vec<u8> = transitions.iter().map(|t| t.bits).collect();
        assert_eq!(bits, vec![5, 6, 7, 8, 13]);
        assert!(transitions.last().unwrap().direct);
        assert_eq!(count_mismatches(&array, &written).unwrap(), 0);
    }

    #[test]
    fn test_fill_is_deterministic_per_seed() {
        let mut a = BlockArray::empty();
        let mut b = BlockArray::empty();
        let (first, _) = fill_blocks(&mut a, 20, 9).unwrap();
        let (second, _) = fill_blocks(&mut b, 20, 9).unwrap();
        assert_eq!(first, second);
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_fill_stays_narrow() {
        let mut array = BlockArray::empty();
        let (_, transitions) = fill_blocks(&mut array, 10, 1).unwrap();
        assert!(transitions.is_empty());
        assert_eq!(array.bits_per_value(), 4);
        assert_eq!(array.count_distinct().unwrap(), 10);
    }

    #[test]
    fn test_sky_light_falls_off_with_depth() {
        let mut light = LightArray::new();
        fill_sky_light(&mut light, 2).unwrap();
        assert_eq!(light.get(section_index(3, 15, 3)).unwrap(), 15);
        assert_eq!(light.get(section_index(3, 14, 3)).unwrap(), 13);
        assert_eq!(light.get(section_index(3, 0, 3)).unwrap(), 0);
    }
}
