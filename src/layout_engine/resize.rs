use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Corner grabbed during an interactive resize. `None` means a keyboard resize.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResizeCorner {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeCorner {
    pub fn affects_left(&self) -> bool { matches!(self, Self::TopLeft | Self::BottomLeft) }

    pub fn affects_top(&self) -> bool { matches!(self, Self::TopLeft | Self::TopRight) }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResizeMode {
    /// Added to the current value.
    #[default]
    Relative,
    /// Replaces the current value.
    Exact,
}

impl ResizeMode {
    pub fn apply(self, current: f64, value: f64) -> f64 {
        match self {
            ResizeMode::Relative => current + value,
            ResizeMode::Exact => value,
        }
    }
}
