use crate::math::Vector;

/// The side of a collider that an intersection happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::None => Side::None,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Picks the side whose outward direction best matches `direction`
    pub fn from_direction(direction: Vector) -> Self {
        const CANDIDATES: [(Vector, Side); 4] = [
            (Vector::LEFT, Side::Left),
            (Vector::RIGHT, Side::Right),
            (Vector::UP, Side::Top),
            (Vector::DOWN, Side::Bottom),
        ];

        let mut best = Side::None;
        let mut max = f32::MIN;
        for (axis, side) in CANDIDATES {
            let d = axis.dot(&direction);
            if d > max {
                max = d;
                best = side;
            }
        }
        best
    }
}
