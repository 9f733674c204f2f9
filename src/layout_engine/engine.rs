use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{FocusTarget, MasterLayoutSystem, MasterOrientation, ResizeCorner, ResizeMode};
use crate::common::config::MasterLayoutSettings;
use crate::model::{FullscreenMode, LayoutHost, MonitorId, WindowId, WorkspaceId};
use crate::sys::geometry::Point;

/// Something that happened on the host that the layout has to react to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEvent {
    WindowTiled {
        window: WindowId,
    },
    /// Also sent when a tiled window is destroyed.
    WindowUntiled {
        window: WindowId,
    },
    ResizeRequested {
        delta: Point,
        #[serde(default)]
        corner: ResizeCorner,
        /// Defaults to the focused window.
        #[serde(default)]
        window: Option<WindowId>,
    },
    FullscreenRequested {
        window: WindowId,
        from: FullscreenMode,
        to: FullscreenMode,
    },
    WorkspaceRemoved(WorkspaceId),
    /// The workspace moved to another monitor.
    WorkspaceRelocated(WorkspaceId),
    /// The monitor's frame or reserved area changed.
    MonitorChanged(MonitorId),
    WindowReplaced {
        from: WindowId,
        to: WindowId,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    SwapWithMaster(FocusTarget),
    FocusMaster(FocusTarget),
    CycleNext { no_loop: bool },
    CyclePrev { no_loop: bool },
    SwapNext { no_loop: bool },
    SwapPrev { no_loop: bool },
    AddMaster,
    RemoveMaster,
    SetOrientation(MasterOrientation),
    OrientationNext,
    OrientationPrev,
    /// An empty list steps through every orientation.
    OrientationCycle(Vec<MasterOrientation>),
    Mfact { value: f64, mode: ResizeMode },
    RollNext,
    RollPrev,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

impl FromStr for LayoutCommand {
    type Err = CommandParseError;

    /// Parses the textual form, e.g. `cyclenext noloop` or `mfact 0.05 relative`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(command) = words.next() else {
            return Err(CommandParseError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let first = args.first().copied();
        let no_loop = first == Some("noloop");

        Ok(match command {
            "swapwithmaster" => LayoutCommand::SwapWithMaster(
                first.and_then(|a| a.parse().ok()).unwrap_or_default(),
            ),
            "focusmaster" => LayoutCommand::FocusMaster(if first == Some("master") {
                FocusTarget::Master
            } else {
                FocusTarget::Auto
            }),
            "cyclenext" => LayoutCommand::CycleNext { no_loop },
            "cycleprev" => LayoutCommand::CyclePrev { no_loop },
            "swapnext" => LayoutCommand::SwapNext { no_loop },
            "swapprev" => LayoutCommand::SwapPrev { no_loop },
            "addmaster" => LayoutCommand::AddMaster,
            "removemaster" => LayoutCommand::RemoveMaster,
            "orientationnext" => LayoutCommand::OrientationNext,
            "orientationprev" => LayoutCommand::OrientationPrev,
            "orientationcycle" => LayoutCommand::OrientationCycle(
                args.iter().filter_map(|a| a.parse().ok()).collect(),
            ),
            "mfact" => parse_mfact(&args)?,
            "rollnext" => LayoutCommand::RollNext,
            "rollprev" => LayoutCommand::RollPrev,
            other => match other.strip_prefix("orientation").map(str::parse::<MasterOrientation>) {
                Some(Ok(orientation)) => LayoutCommand::SetOrientation(orientation),
                _ => return Err(CommandParseError::Unknown(other.to_string())),
            },
        })
    }
}

/// Accepts `mfact <value> [exact|relative]` as well as `mfact exact <value>`.
fn parse_mfact(args: &[&str]) -> Result<LayoutCommand, CommandParseError> {
    let mut mode = ResizeMode::Relative;
    let mut value = None;
    for arg in args {
        if let Ok(m) = arg.parse::<ResizeMode>() {
            mode = m;
        } else if value.is_none() {
            let v = arg
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CommandParseError::InvalidNumber(arg.to_string()))?;
            value = Some(v);
        }
    }
    let value = value.ok_or(CommandParseError::MissingArgument("mfact"))?;
    Ok(LayoutCommand::Mfact { value, mode })
}

/// Entry point for hosts: routes events and commands to the master layout.
pub struct LayoutEngine {
    layout: MasterLayoutSystem,
}

impl LayoutEngine {
    pub fn new(settings: &MasterLayoutSettings) -> Self {
        Self {
            layout: MasterLayoutSystem::new(Arc::new(settings.clone())),
        }
    }

    pub fn layout(&self) -> &MasterLayoutSystem { &self.layout }

    pub fn layout_mut(&mut self) -> &mut MasterLayoutSystem { &mut self.layout }

    /// Swaps in reloaded settings. Existing nodes keep their ratios.
    pub fn set_settings(&mut self, settings: &MasterLayoutSettings) {
        self.layout.set_settings(Arc::new(settings.clone()));
    }

    pub fn handle_event(&mut self, host: &mut dyn LayoutHost, event: LayoutEvent) {
        debug!(?event, "layout event");
        match event {
            LayoutEvent::WindowTiled { window } => self.layout.on_window_tiled(host, window),
            LayoutEvent::WindowUntiled { window } => self.layout.on_window_untiled(host, window),
            LayoutEvent::ResizeRequested { delta, corner, window } => {
                self.layout.resize_active_window(host, delta, corner, window)
            }
            LayoutEvent::FullscreenRequested { window, from, to } => {
                self.layout.on_fullscreen_requested(host, window, from, to)
            }
            LayoutEvent::WorkspaceRemoved(workspace)
            | LayoutEvent::WorkspaceRelocated(workspace) => {
                self.layout.on_workspace_removed(workspace)
            }
            LayoutEvent::MonitorChanged(monitor) => self.layout.recalculate_monitor(host, monitor),
            LayoutEvent::WindowReplaced { from, to } => self.layout.replace_window(host, from, to),
        }
    }

    /// Runs `command` against `target`, or the focused window when `target` is
    /// `None`. Does nothing when neither exists.
    pub fn handle_command(
        &mut self,
        host: &mut dyn LayoutHost,
        target: Option<WindowId>,
        command: &LayoutCommand,
    ) {
        let Some(window) = target.or_else(|| host.focused_window()) else {
            debug!(?command, "no window to run command on");
            return;
        };
        info!(?command, ?window, "layout command");
        let layout = &mut self.layout;
        match command {
            LayoutCommand::SwapWithMaster(focus) => layout.swap_with_master(host, window, *focus),
            LayoutCommand::FocusMaster(focus) => layout.focus_master(host, window, *focus),
            LayoutCommand::CycleNext { no_loop } => layout.cycle(host, window, true, !no_loop),
            LayoutCommand::CyclePrev { no_loop } => layout.cycle(host, window, false, !no_loop),
            LayoutCommand::SwapNext { no_loop } => layout.swap(host, window, true, !no_loop),
            LayoutCommand::SwapPrev { no_loop } => layout.swap(host, window, false, !no_loop),
            LayoutCommand::AddMaster => layout.add_master(host, window),
            LayoutCommand::RemoveMaster => layout.remove_master(host, window),
            LayoutCommand::SetOrientation(orientation) => {
                layout.set_orientation(host, window, *orientation)
            }
            LayoutCommand::OrientationNext => layout.cycle_orientation(host, window, &[], 1),
            LayoutCommand::OrientationPrev => layout.cycle_orientation(host, window, &[], -1),
            LayoutCommand::OrientationCycle(cycle) => {
                layout.cycle_orientation(host, window, cycle, 1)
            }
            LayoutCommand::Mfact { value, mode } => {
                layout.alter_split_ratio(host, window, *value, *mode)
            }
            LayoutCommand::RollNext => layout.roll(host, window, true),
            LayoutCommand::RollPrev => layout.roll(host, window, false),
        }
    }

    /// Parses and runs a textual command such as `swapwithmaster child`.
    pub fn handle_message(
        &mut self,
        host: &mut dyn LayoutHost,
        target: Option<WindowId>,
        message: &str,
    ) -> Result<(), CommandParseError> {
        let command = message.parse::<LayoutCommand>()?;
        self.handle_command(host, target, &command);
        Ok(())
    }
}
