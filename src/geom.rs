//! Integer geometry shared by images, glyphs and the packer.

use std::ops::{Add, Sub, SubAssign};

/// A 2-D integer vector, used for both positions and sizes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Both components set to `v`.
    #[inline]
    pub fn splat(v: i32) -> Self {
        Self { x: v, y: v }
    }
}

impl Add for IVec2 {
    type Output = IVec2;

    #[inline]
    fn add(self, rhs: IVec2) -> IVec2 {
        IVec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for IVec2 {
    type Output = IVec2;

    #[inline]
    fn sub(self, rhs: IVec2) -> IVec2 {
        IVec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<i32> for IVec2 {
    type Output = IVec2;

    #[inline]
    fn add(self, rhs: i32) -> IVec2 {
        IVec2::new(self.x + rhs, self.y + rhs)
    }
}

impl Sub<i32> for IVec2 {
    type Output = IVec2;

    #[inline]
    fn sub(self, rhs: i32) -> IVec2 {
        IVec2::new(self.x - rhs, self.y - rhs)
    }
}

impl SubAssign<i32> for IVec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: i32) {
        self.x -= rhs;
        self.y -= rhs;
    }
}

/// An axis-aligned rectangle with integer position and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IntRect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl IntRect {
    pub const ZERO: Self = Self {
        pos: IVec2::ZERO,
        size: IVec2::ZERO,
    };

    #[inline]
    pub fn new(pos: IVec2, size: IVec2) -> Self {
        Self { pos, size }
    }

    /// One past the rightmost column.
    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    /// One past the bottom row.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// True when the rectangles share at least one pixel.
    pub fn intersects(&self, other: &IntRect) -> bool {
        self.pos.x < other.right()
            && other.pos.x < self.right()
            && self.pos.y < other.bottom()
            && other.pos.y < self.bottom()
    }
}
