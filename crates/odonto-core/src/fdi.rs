//! FDI two-digit tooth numbering for the permanent dentition.
//!
//! The first digit names the quadrant (1 upper right, 2 upper left, 3 lower
//! left, 4 lower right), the second the tooth counted from the midline (1
//! central incisor through 8 third molar).
//!
//! The sequences below are the left-to-right display order of the chart as
//! the clinician faces the patient. Their direction is part of the rendering
//! contract and must not be re-sorted.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, note::ToothNumber};

pub const UPPER_RIGHT: [ToothNumber; 8] = [18, 17, 16, 15, 14, 13, 12, 11];
pub const UPPER_LEFT: [ToothNumber; 8] = [21, 22, 23, 24, 25, 26, 27, 28];
pub const LOWER_LEFT: [ToothNumber; 8] = [31, 32, 33, 34, 35, 36, 37, 38];
pub const LOWER_RIGHT: [ToothNumber; 8] = [48, 47, 46, 45, 44, 43, 42, 41];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
  UpperRight,
  UpperLeft,
  LowerLeft,
  LowerRight,
}

impl Quadrant {
  /// All quadrants in chart order.
  pub const ALL: [Quadrant; 4] = [
    Quadrant::UpperRight,
    Quadrant::UpperLeft,
    Quadrant::LowerLeft,
    Quadrant::LowerRight,
  ];

  /// The teeth of this quadrant in display order.
  pub fn teeth(self) -> &'static [ToothNumber; 8] {
    match self {
      Self::UpperRight => &UPPER_RIGHT,
      Self::UpperLeft => &UPPER_LEFT,
      Self::LowerLeft => &LOWER_LEFT,
      Self::LowerRight => &LOWER_RIGHT,
    }
  }

  /// The quadrant a permanent tooth belongs to, or `None` for numbers outside
  /// the FDI permanent set.
  pub fn of(tooth: ToothNumber) -> Option<Self> {
    if !is_permanent_tooth(tooth) {
      return None;
    }
    match tooth / 10 {
      1 => Some(Self::UpperRight),
      2 => Some(Self::UpperLeft),
      3 => Some(Self::LowerLeft),
      4 => Some(Self::LowerRight),
      _ => None,
    }
  }
}

/// Whether `tooth` is one of the 32 permanent teeth (11–18, 21–28, 31–38,
/// 41–48).
pub fn is_permanent_tooth(tooth: ToothNumber) -> bool {
  matches!(tooth / 10, 1..=4) && matches!(tooth % 10, 1..=8)
}

/// Reject tooth numbers outside the permanent FDI set.
pub fn validate(tooth: ToothNumber) -> Result<ToothNumber> {
  if is_permanent_tooth(tooth) {
    Ok(tooth)
  } else {
    Err(Error::InvalidToothNumber(tooth))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quadrant_sequences_keep_display_direction() {
    assert_eq!(Quadrant::UpperRight.teeth()[0], 18);
    assert_eq!(Quadrant::UpperRight.teeth()[7], 11);
    assert_eq!(Quadrant::UpperLeft.teeth()[0], 21);
    assert_eq!(Quadrant::LowerLeft.teeth()[7], 38);
    assert_eq!(Quadrant::LowerRight.teeth()[0], 48);
    assert_eq!(Quadrant::LowerRight.teeth()[7], 41);
  }

  #[test]
  fn quadrants_cover_32_distinct_teeth() {
    let mut all: Vec<ToothNumber> = Quadrant::ALL
      .iter()
      .flat_map(|q| q.teeth().iter().copied())
      .collect();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 32);
    assert!(all.iter().all(|&t| is_permanent_tooth(t)));
  }

  #[test]
  fn quadrant_of_tooth() {
    assert_eq!(Quadrant::of(18), Some(Quadrant::UpperRight));
    assert_eq!(Quadrant::of(21), Some(Quadrant::UpperLeft));
    assert_eq!(Quadrant::of(36), Some(Quadrant::LowerLeft));
    assert_eq!(Quadrant::of(41), Some(Quadrant::LowerRight));
    assert_eq!(Quadrant::of(19), None);
    assert_eq!(Quadrant::of(51), None);
  }

  #[test]
  fn validate_rejects_non_permanent_numbers() {
    for bad in [0, 10, 19, 20, 50, 55, -11, 118] {
      assert!(validate(bad).is_err(), "{bad} should be rejected");
    }
    assert_eq!(validate(47).unwrap(), 47);
  }
}
