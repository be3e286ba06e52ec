//! Vector math, rectangle derivation and arena clamping.

/// Margin kept between an entity's scaled box and the arena edge.
pub const ARENA_MARGIN: f64 = 40.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }
}

/// Position plus orientation (degrees) and uniform scale of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vector2,
    pub angle: f64,
    pub scale: f64,
}

impl Placement {
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Placement {
            position: Vector2::new(x, y),
            angle: 0.0,
            scale,
        }
    }
}

/// Axis-aligned box in arena coordinates. `x0 <= x1` and `y0 <= y1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CollisionRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        CollisionRect {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Grow (or shift) each edge by the given amounts, keeping the box ordered.
    pub fn padded(&self, dx0: i32, dy0: i32, dx1: i32, dy1: i32) -> Self {
        Self::new(self.x0 + dx0, self.y0 + dy0, self.x1 + dx1, self.y1 + dy1)
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Strict overlap of two non-empty boxes; touching edges do not count.
    pub fn overlaps(&self, other: &CollisionRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }
}

/// Size of the playable area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Arena { width, height }
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Unit direction from `a` to `b` and the distance between them.
/// Identical points give `(0, 0, 0)`.
pub fn distance_and_direction(a: Vector2, b: Vector2) -> (f64, f64, f64) {
    let mut dx = b.x - a.x;
    let mut dy = b.y - a.y;

    let length = (dx * dx + dy * dy).sqrt();
    if length > 0.0 {
        dx /= length;
        dy /= length;
    } else {
        dx = 0.0;
        dy = 0.0;
    }

    (dx, dy, length)
}

/// Angle of a direction vector in degrees, offset by `offset`.
pub fn heading_degrees(dx: f64, dy: f64, offset: f64) -> f64 {
    dy.atan2(dx).to_degrees() + offset
}

/// Box of size `width × height × scale` anchored at `position`. With
/// `center_x`/`center_y` the anchor is the box centre on that axis,
/// otherwise the top-left corner. A zero scale is treated as 1.
pub fn bounding_rect(
    position: Vector2,
    width: f64,
    height: f64,
    scale: f64,
    center_x: bool,
    center_y: bool,
) -> CollisionRect {
    let scale = if scale == 0.0 { 1.0 } else { scale };

    let mut x0 = position.x as i32;
    let mut y0 = position.y as i32;
    let w = (width * scale) as i32;
    let h = (height * scale) as i32;

    if center_x {
        x0 -= (width * scale / 2.0) as i32;
    }
    if center_y {
        y0 -= (height * scale / 2.0) as i32;
    }

    CollisionRect::new(x0, y0, x0 + w, y0 + h)
}

/// Clamp `(x, y)` so a centred box of `width × height × scale` stays within
/// `[margin, arena - margin]` on both axes.
pub fn clamp_to_bounds(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    scale: f64,
    margin: f64,
    arena: Arena,
) -> (f64, f64) {
    let half_w = width * scale / 2.0;
    let half_h = height * scale / 2.0;

    let x = if x < half_w + margin {
        half_w + margin
    } else if x > arena.width - half_w - margin {
        arena.width - half_w - margin
    } else {
        x
    };

    let y = if y < half_h + margin {
        half_h + margin
    } else if y > arena.height - half_h - margin {
        arena.height - half_h - margin
    } else {
        y
    };

    (x, y)
}
