use std::fmt;

/// Height/width pair, in tiles or in pixels depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Rows
    pub height: u32,
    /// Columns
    pub width: u32,
}

impl Size {
    /// Note the argument order: height first.
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Number of cells or pixels. Only call on sizes already bounded by
    /// [`Size::checked_area`].
    #[inline]
    pub fn area(self) -> usize {
        self.height as usize * self.width as usize
    }

    /// Area as `u64`, `None` if it exceeds `limit`.
    pub fn checked_area(self, limit: u64) -> Option<u64> {
        let area = self.height as u64 * self.width as u64;
        (area <= limit).then_some(area)
    }

    /// True if either axis is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.height == 0 || self.width == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
