//! Compact per-voxel storage for 16×16×16 chunk sections: a paletted,
//! variable-width block array that repacks itself as it grows, and a fixed
//! 4-bit light array.

pub mod bit_packed;
pub mod block;
pub mod error;
pub mod light;
pub mod limits;
pub mod palette;
pub mod section;

/// Side length of a chunk section in voxels.
pub const SECTION_EDGE: usize = 16;

/// Number of elements in every section array (16³).
pub const SECTION_VOLUME: usize = SECTION_EDGE * SECTION_EDGE * SECTION_EDGE;

pub use bit_packed::BitPackedArray;
pub use block::{BlockArray, BlockArrayParts};
pub use error::ArrayError;
pub use light::{LIGHT_BYTES, LightArray, MAX_LIGHT};
pub use limits::{DIRECT_BITS, MAX_PALETTE_BITS, MIN_PALETTE_BITS, PaletteLimits};
pub use section::{SectionArray, Values};
