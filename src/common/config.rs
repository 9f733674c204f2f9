use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::layout_engine::MasterOrientation;

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap_or_default().join(".rift-master.toml") }

/// The configuration shipped with the crate, identical to [`Config::default`].
pub const DEFAULT_CONFIG: &str = include_str!("../../rift-master.default.toml");

pub const MIN_SPLIT_RATIO: f64 = 0.05;
pub const MAX_SPLIT_RATIO: f64 = 0.95;

static_assertions::const_assert!(MIN_SPLIT_RATIO < MAX_SPLIT_RATIO);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub master: MasterLayoutSettings,
}

/// Role given to a newly tiled window.
#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NewStatus {
    Master,
    #[default]
    Slave,
    /// Master if the window is opened from a master, slave otherwise.
    Inherit,
}

/// Where a new window lands relative to the focused one.
#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NewOnActive {
    #[default]
    None,
    Before,
    After,
}

/// Orientation used by `center` while there are too few slaves to flank the master.
#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default, Display, EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CenterFallback {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl CenterFallback {
    pub fn orientation(self) -> MasterOrientation {
        match self {
            CenterFallback::Left => MasterOrientation::Left,
            CenterFallback::Right => MasterOrientation::Right,
            CenterFallback::Top => MasterOrientation::Top,
            CenterFallback::Bottom => MasterOrientation::Bottom,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct MasterLayoutSettings {
    /// Orientation given to a workspace the first time it is laid out.
    #[serde(default)]
    pub orientation: MasterOrientation,
    /// Share of the workspace given to the master band.
    #[serde(default = "default_mfact")]
    pub mfact: f64,
    #[serde(default)]
    pub new_status: NewStatus,
    #[serde(default = "no")]
    pub new_on_top: bool,
    #[serde(default)]
    pub new_on_active: NewOnActive,
    /// Leaving a fullscreen window with a focus command makes the new window fullscreen.
    #[serde(default = "yes")]
    pub inherit_fullscreen: bool,
    /// Windows on a special workspace are shrunk around their center by this factor.
    #[serde(default = "default_special_scale_factor")]
    pub special_scale_factor: f64,
    /// Resize siblings proportionally instead of only the dragged window.
    #[serde(default = "yes")]
    pub smart_resizing: bool,
    /// A window dragged onto the layout is inserted where the pointer is.
    #[serde(default = "yes")]
    pub drop_at_cursor: bool,
    #[serde(default = "no")]
    pub allow_small_split: bool,
    /// A lone window keeps its master-sized column instead of filling the workspace.
    #[serde(default = "no")]
    pub always_keep_position: bool,
    #[serde(default = "default_slave_count_for_center_master")]
    pub slave_count_for_center_master: usize,
    #[serde(default)]
    pub center_master_fallback: CenterFallback,
    /// Centered masters are laid out against the full monitor width.
    #[serde(default = "no")]
    pub center_ignores_reserved: bool,
    #[serde(default)]
    pub gaps: GapSettings,
}

/// Gap configuration for window spacing
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GapSettings {
    /// Outer gaps (space between windows and screen edges)
    #[serde(default)]
    pub outer: OuterGaps,
    /// Inner gaps (space between windows)
    #[serde(default)]
    pub inner: InnerGaps,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OuterGaps {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct InnerGaps {
    /// Horizontal gap between windows
    #[serde(default)]
    pub horizontal: f64,
    /// Vertical gap between windows
    #[serde(default)]
    pub vertical: f64,
}

impl Default for MasterLayoutSettings {
    fn default() -> Self {
        Self {
            orientation: MasterOrientation::default(),
            mfact: default_mfact(),
            new_status: NewStatus::default(),
            new_on_top: false,
            new_on_active: NewOnActive::default(),
            inherit_fullscreen: true,
            special_scale_factor: default_special_scale_factor(),
            smart_resizing: true,
            drop_at_cursor: true,
            allow_small_split: false,
            always_keep_position: false,
            slave_count_for_center_master: default_slave_count_for_center_master(),
            center_master_fallback: CenterFallback::default(),
            center_ignores_reserved: false,
            gaps: GapSettings::default(),
        }
    }
}

impl MasterLayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.mfact > 0.0 && self.mfact < 1.0) {
            issues.push(format!("mfact must be between 0 and 1, got {}", self.mfact));
        }

        if !(self.special_scale_factor > 0.0 && self.special_scale_factor <= 1.0) {
            issues.push(format!(
                "special_scale_factor must be in (0, 1], got {}",
                self.special_scale_factor
            ));
        }

        issues.extend(self.gaps.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !(self.mfact > 0.0 && self.mfact < 1.0) {
            self.mfact = if self.mfact.is_nan() {
                default_mfact()
            } else {
                self.mfact.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
            };
            fixes += 1;
        }

        if !(self.special_scale_factor > 0.0 && self.special_scale_factor <= 1.0) {
            self.special_scale_factor = default_special_scale_factor();
            fixes += 1;
        }

        fixes + self.gaps.auto_fix_values()
    }
}

impl GapSettings {
    fn named(&mut self) -> [(&'static str, &mut f64); 6] {
        [
            ("outer.top", &mut self.outer.top),
            ("outer.left", &mut self.outer.left),
            ("outer.bottom", &mut self.outer.bottom),
            ("outer.right", &mut self.outer.right),
            ("inner.horizontal", &mut self.inner.horizontal),
            ("inner.vertical", &mut self.inner.vertical),
        ]
    }

    /// Every gap must be non-negative.
    pub fn validate(&self) -> Vec<String> {
        self.clone()
            .named()
            .into_iter()
            .filter(|(_, value)| **value < 0.0)
            .map(|(name, value)| format!("{name} gap must be non-negative, got {value}"))
            .collect()
    }

    /// Resets negative gaps to zero and returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        for (_, value) in self.named() {
            if *value < 0.0 {
                *value = 0.0;
                fixes += 1;
            }
        }
        fixes
    }
}

fn yes() -> bool { true }

fn no() -> bool { false }

fn default_mfact() -> f64 { 0.55 }

fn default_special_scale_factor() -> f64 { 1.0 }

fn default_slave_count_for_center_master() -> usize { 2 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Self::parse(&buf)?)
    }

    pub fn parse(buf: &str) -> Result<Config, ConfigError> { Ok(toml::from_str(buf)?) }

    pub fn to_toml(&self) -> Result<String, ConfigError> { Ok(toml::to_string_pretty(self)?) }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.master.validate() }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.master.auto_fix_values() }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn bundled_config_matches_defaults() {
        let parsed = Config::parse(DEFAULT_CONFIG).expect("bundled config parses");
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.master.mfact, 0.55);
        assert_eq!(config.master.new_status, NewStatus::Slave);
        assert_eq!(config.master.slave_count_for_center_master, 2);
        assert!(config.master.inherit_fullscreen);
        assert!(config.master.smart_resizing);
        assert!(!config.master.allow_small_split);
    }

    #[test]
    fn parses_enums_in_snake_case() {
        let config = Config::parse(
            r#"
            [master]
            orientation = "center"
            new_status = "inherit"
            new_on_active = "before"
            center_master_fallback = "right"
            "#,
        )
        .unwrap();
        assert_eq!(config.master.orientation, MasterOrientation::Center);
        assert_eq!(config.master.new_status, NewStatus::Inherit);
        assert_eq!(config.master.new_on_active, NewOnActive::Before);
        assert_eq!(config.master.center_master_fallback, CenterFallback::Right);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::parse("[master]\nmaster_factor = 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_and_fix_out_of_range_values() {
        let mut config = Config::parse(
            r#"
            [master]
            mfact = 1.5
            special_scale_factor = 0.0
            [master.gaps.outer]
            top = -4.0
            "#,
        )
        .unwrap();
        assert_eq!(config.validate().len(), 3);
        assert_eq!(config.auto_fix_values(), 3);
        assert!(config.validate().is_empty());
        assert_eq!(config.master.mfact, MAX_SPLIT_RATIO);
        assert_eq!(config.master.special_scale_factor, 1.0);
        assert_eq!(config.master.gaps.outer.top, 0.0);
    }

    #[test]
    fn negative_gaps_are_reported_and_zeroed() {
        let mut gaps = GapSettings::default();
        gaps.outer.right = -2.0;
        gaps.inner.vertical = -6.0;
        assert_eq!(
            gaps.validate(),
            vec![
                "outer.right gap must be non-negative, got -2".to_string(),
                "inner.vertical gap must be non-negative, got -6".to_string(),
            ]
        );
        assert_eq!(gaps.auto_fix_values(), 2);
        assert_eq!(gaps, GapSettings::default());
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[master]\nmfact = 0.6\nnew_on_top = true").unwrap();
        let config = Config::read(file.path()).unwrap();
        assert_eq!(config.master.mfact, 0.6);
        assert!(config.master.new_on_top);
    }

    #[test]
    fn serialized_config_reads_back() {
        let mut config = Config::default();
        config.master.orientation = MasterOrientation::Bottom;
        config.master.gaps.inner.horizontal = 8.0;
        let text = config.to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
