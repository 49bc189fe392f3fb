//! Axis-aligned rectangles in image pixel space.

/// Rectangle with the origin at the top-left corner of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Normalizes the corners so that `left <= right` and `top <= bottom`.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Tightest rectangle around a set of points. `None` for an empty set or non-finite input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        points
            .into_iter()
            .filter(|[x, y]| x.is_finite() && y.is_finite())
            .map(|[x, y]| Self::new(x, y, x, y))
            .reduce(Self::union)
    }

    /// Outer rectangle: min left/top, max right/bottom.
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Width over height; `0.0` for a degenerate (zero-height) rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        let height = self.height();
        if height == 0.0 {
            0.0
        } else {
            self.width() / height
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        ]
    }

    /// Whether `inner` lies within `self`, allowing `tolerance` pixels of slack on each edge.
    pub fn encloses(&self, inner: &Self, tolerance: f64) -> bool {
        inner.left >= self.left - tolerance
            && inner.top >= self.top - tolerance
            && inner.right <= self.right + tolerance
            && inner.bottom <= self.bottom + tolerance
    }
}

/// Outer rectangle of all `rects`; `None` when empty.
pub fn outer_rect<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(Rect::union)
}
