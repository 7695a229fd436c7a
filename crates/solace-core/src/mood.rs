//! Mood algebra — the cross product of energy and valence.
//!
//! A mood is one of four literal values. The valence half drives the
//! entry-linking rule: only unpleasant entries may link out, and only
//! pleasant entries may be linked to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the four mood quadrants. The serialized form is the exact literal
/// shown to users, e.g. `"High Energy, Pleasant"`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
pub enum Mood {
  #[serde(rename = "High Energy, Pleasant")]
  #[strum(serialize = "High Energy, Pleasant")]
  HighEnergyPleasant,

  #[serde(rename = "High Energy, Unpleasant")]
  #[strum(serialize = "High Energy, Unpleasant")]
  HighEnergyUnpleasant,

  #[serde(rename = "Low Energy, Pleasant")]
  #[strum(serialize = "Low Energy, Pleasant")]
  LowEnergyPleasant,

  #[serde(rename = "Low Energy, Unpleasant")]
  #[strum(serialize = "Low Energy, Unpleasant")]
  LowEnergyUnpleasant,
}

/// The pleasant/unpleasant half of a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valence {
  Pleasant,
  Unpleasant,
}

/// The high/low-energy half of a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Energy {
  High,
  Low,
}

impl Mood {
  pub fn valence(self) -> Valence {
    match self {
      Self::HighEnergyPleasant | Self::LowEnergyPleasant => Valence::Pleasant,
      Self::HighEnergyUnpleasant | Self::LowEnergyUnpleasant => {
        Valence::Unpleasant
      }
    }
  }

  pub fn energy(self) -> Energy {
    match self {
      Self::HighEnergyPleasant | Self::HighEnergyUnpleasant => Energy::High,
      Self::LowEnergyPleasant | Self::LowEnergyUnpleasant => Energy::Low,
    }
  }

  pub fn is_pleasant(self) -> bool {
    self.valence() == Valence::Pleasant
  }
}
