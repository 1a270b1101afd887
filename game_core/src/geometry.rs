use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Box from a top-left corner and a size (canvas coordinates, y grows downward)
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self::new(top_left, top_left + size)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Overlap on both axes; touching edges count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Push `value` out to at least `min` in magnitude, keeping its sign.
/// Zero is treated as negative.
pub fn floor_magnitude(value: f32, min: f32) -> f32 {
    if value.abs() < min {
        if value > 0.0 {
            min
        } else {
            -min
        }
    } else {
        value
    }
}

/// Velocity of magnitude `speed` leaving at `angle_deg` from the horizontal.
///
/// `direction` is +1.0 for rightward travel and -1.0 for leftward. The
/// vertical component is floored to `min_dy` and the horizontal component is
/// recomputed afterwards so the vector length stays equal to `speed`.
pub fn launch_velocity(speed: f32, angle_deg: f32, direction: f32, min_dy: f32) -> Vec2 {
    let dy = floor_magnitude(speed * angle_deg.to_radians().sin(), min_dy);
    let dx = (speed * speed - dy * dy).max(0.0).sqrt();
    Vec2::new(direction.signum() * dx, dy)
}

/// Angle of travel relative to the horizontal, in degrees, ignoring
/// whether the motion is leftward or rightward.
pub fn approach_angle_deg(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x.abs()).to_degrees()
}

/// Mirror a vertical projection back into `[0, height]`.
///
/// `y` is where a point would be with no walls. Bouncing between the two
/// walls repeats every `2 * height`, so the projection is folded by that
/// period and the far half is mirrored back.
pub fn unfold_wall_bounces(y: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * height;
    let folded = y.rem_euclid(period);
    let y = if folded > height { period - folded } else { folded };
    y.clamp(0.0, height)
}
