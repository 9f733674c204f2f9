use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The axis along which siblings of one role are stacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Which side of the workspace the master band occupies.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MasterOrientation {
    #[default]
    Left,
    Top,
    Right,
    Bottom,
    Center,
}

impl MasterOrientation {
    /// Masters and slaves of a left/right/center layout are stacked top to bottom.
    pub fn stack_axis(self) -> Orientation {
        match self {
            MasterOrientation::Left | MasterOrientation::Right | MasterOrientation::Center => {
                Orientation::Vertical
            }
            MasterOrientation::Top | MasterOrientation::Bottom => Orientation::Horizontal,
        }
    }

    /// Parses a workspace rule value. Anything unrecognized means `Left`.
    pub fn from_rule(rule: &str) -> Self { rule.trim().parse().unwrap_or(MasterOrientation::Left) }

    /// The built-in cycle: left, top, right, bottom, center.
    pub fn default_cycle() -> Vec<MasterOrientation> { MasterOrientation::iter().collect() }

    /// Steps `offset` places through `cycle`, wrapping at both ends.
    ///
    /// When `self` is not part of the cycle the first entry is chosen.
    pub fn step_in(self, cycle: &[MasterOrientation], offset: isize) -> MasterOrientation {
        let Some(current) = cycle.iter().position(|o| *o == self) else {
            return cycle.first().copied().unwrap_or(self);
        };
        let len = cycle.len() as isize;
        cycle[(current as isize + offset).rem_euclid(len) as usize]
    }
}
