//! Global tile identifiers as stored in tile layer cells.

/// Horizontal flip flag.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal flip flag (anti-diagonal swap, used for rotation).
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// All three flip flags.
pub const FLIP_MASK: u32 = FLIP_H | FLIP_V | FLIP_D;
/// Tile reference bits.
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// A raw cell value: 1-based tileset index plus optional flip flags. `0` is "no tile".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

impl TileId {
    /// The tile reference without flags.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// Any flip flag set.
    #[inline] pub fn is_flipped(self) -> bool { (self.0 & FLIP_MASK) != 0 }

    /// Zero-based tileset index, `None` for an empty cell.
    #[inline]
    pub fn tile_index(self) -> Option<u32> {
        self.clean().checked_sub(1)
    }
}
