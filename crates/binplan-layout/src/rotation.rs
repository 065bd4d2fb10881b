#![forbid(unsafe_code)]

//! Quarter-turn rotation.
//!
//! Rotation is a closed four-state enum advanced through explicit next-state
//! tables. Footprint dimensions swap exactly when a step crosses between an
//! upright (0/180) and a sideways (90/270) orientation, which is every step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Orientation of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    /// Next state for a clockwise quarter turn.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Next state for a counter-clockwise quarter turn.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg270,
            Self::Deg90 => Self::Deg0,
            Self::Deg180 => Self::Deg90,
            Self::Deg270 => Self::Deg180,
        }
    }

    #[must_use]
    pub const fn step(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => self.clockwise(),
            RotationDirection::CounterClockwise => self.counter_clockwise(),
        }
    }

    /// 90 or 270.
    #[must_use]
    pub const fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Parse a degree value; only exact quarter turns are accepted.
    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Footprint `(width, height)` after stepping from `self` to `next`.
    #[must_use]
    pub const fn footprint_after(self, next: Self, width: i32, height: i32) -> (i32, i32) {
        if self.is_sideways() != next.is_sideways() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees).ok_or(InvalidRotation(degrees))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// A degree value that is not a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRotation(pub u16);

impl fmt::Display for InvalidRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rotation must be 0, 90, 180 or 270 degrees, got {}", self.0)
    }
}

impl std::error::Error for InvalidRotation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clockwise_cycle() {
        let mut r = Rotation::Deg0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            r = r.clockwise();
            seen.push(r.degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
    }

    #[test]
    fn counter_clockwise_cycle() {
        let mut r = Rotation::Deg0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            r = r.counter_clockwise();
            seen.push(r.degrees());
        }
        assert_eq!(seen, vec![270, 180, 90, 0]);
    }

    #[test]
    fn every_step_swaps_footprint() {
        for r in Rotation::ALL {
            for dir in [RotationDirection::Clockwise, RotationDirection::CounterClockwise] {
                assert_eq!(r.footprint_after(r.step(dir), 1, 3), (3, 1), "{r} {dir:?}");
            }
        }
        assert_eq!(Rotation::Deg0.footprint_after(Rotation::Deg180, 1, 3), (1, 3));
    }

    #[test]
    fn degree_parsing() {
        assert_eq!(Rotation::try_from(180), Ok(Rotation::Deg180));
        assert_eq!(Rotation::try_from(45), Err(InvalidRotation(45)));
        assert_eq!(Rotation::Deg270.to_string(), "270°");
    }

    #[test]
    fn serde_as_degrees() {
        let json = serde_json::to_string(&Rotation::Deg90).expect("serialize");
        assert_eq!(json, "90");
        let back: Rotation = serde_json::from_str("270").expect("deserialize");
        assert_eq!(back, Rotation::Deg270);
        assert!(serde_json::from_str::<Rotation>("30").is_err());
    }
}
