use glam::Vec2;

/// Digital stick directions, used by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Full-deflection stick vector for this direction (y is world forward)
    pub fn stick(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Input for one simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Steer toward a 2D stick vector
    Steer(Vec2),
    /// Keep the current heading
    Continue,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Steer(direction.stick())
    }
}

impl From<Vec2> for Action {
    fn from(stick: Vec2) -> Self {
        Action::Steer(stick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_stick() {
        assert_eq!(Direction::Up.stick(), Vec2::new(0.0, 1.0));
        assert_eq!(Direction::Down.stick(), Vec2::new(0.0, -1.0));
        assert_eq!(Direction::Left.stick(), Vec2::new(-1.0, 0.0));
        assert_eq!(Direction::Right.stick(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_action_from_direction() {
        assert_eq!(Action::from(Direction::Left), Action::Steer(Vec2::new(-1.0, 0.0)));
        assert_eq!(Action::from(Vec2::new(0.5, 0.5)), Action::Steer(Vec2::new(0.5, 0.5)));
    }
}
