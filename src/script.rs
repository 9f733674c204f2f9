//! Line-oriented scripts that drive a [`SimHost`] and a [`LayoutEngine`].
//!
//! One step per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! monitor 0 0 0 1920 1080
//! workspace 1 0
//! window 1 1
//! tile 1
//! window 2 1 max 600 1080
//! tile 2
//! cmd orientationcenter
//! event {"monitor_changed":0}
//! dump
//! ```

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::layout_engine::{CommandParseError, LayoutCommand, LayoutEngine, LayoutEvent, ResizeCorner};
use crate::model::sim::SimError;
use crate::model::{FullscreenMode, LayoutHost, MonitorId, SimHost, WindowId, WorkspaceId};
use crate::sys::geometry::{Point, Rect, Size};

#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Error)]
pub enum ScriptErrorKind {
    #[error("unknown step `{0}`")]
    UnknownStep(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("invalid {what} `{value}`")]
    InvalidValue { what: &'static str, value: String },
    #[error(transparent)]
    Command(#[from] CommandParseError),
    #[error("invalid event: {0}")]
    Event(#[from] serde_json::Error),
    #[error(transparent)]
    Sim(#[from] SimError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Monitor { id: MonitorId, frame: Rect },
    /// Reserves space on each edge of a monitor, then relays it out.
    Reserve { monitor: MonitorId, top: f64, left: f64, bottom: f64, right: f64 },
    Workspace { id: WorkspaceId, monitor: MonitorId, special: bool },
    RemoveWorkspace(WorkspaceId),
    Rule { workspace: WorkspaceId, orientation: Option<String> },
    Window {
        id: WindowId,
        workspace: WorkspaceId,
        floating: bool,
        max_size: Option<Size>,
        remapped: bool,
    },
    Tile(WindowId),
    Untile(WindowId),
    /// Untiles and destroys a window.
    Close(WindowId),
    Focus(Option<WindowId>),
    Pointer(Point),
    Drag(bool),
    Resize { delta: Point, corner: ResizeCorner, window: Option<WindowId> },
    Fullscreen { window: WindowId, mode: FullscreenMode },
    Command(LayoutCommand),
    Event(LayoutEvent),
    Dump,
}

/// State of every window known to the host at one point of a script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub line: usize,
    pub windows: Vec<WindowState>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowState {
    pub window: WindowId,
    pub workspace: WorkspaceId,
    pub frame: Rect,
    pub tiled: bool,
    pub master: bool,
    pub floating: bool,
    pub fullscreen: FullscreenMode,
}

impl Snapshot {
    pub fn capture(line: usize, engine: &LayoutEngine, host: &SimHost) -> Self {
        let windows = host
            .windows()
            .map(|info| {
                let node = engine.layout().node_for(info.id);
                WindowState {
                    window: info.id,
                    workspace: info.workspace,
                    frame: info.frame,
                    tiled: node.is_some(),
                    master: node.is_some_and(|n| n.is_master),
                    floating: info.floating,
                    fullscreen: info.fullscreen,
                }
            })
            .collect();
        Snapshot { line, windows }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<(usize, Step)>,
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut steps = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let step = parse_step(line).map_err(|kind| ScriptError { line: idx + 1, kind })?;
            steps.push((idx + 1, step));
        }
        Ok(Script { steps })
    }
}

impl Script {
    pub fn steps(&self) -> impl Iterator<Item = &Step> { self.steps.iter().map(|(_, s)| s) }

    /// Runs every step in order. Each `dump` step yields a snapshot; a script
    /// without one yields the final state.
    pub fn run(
        &self,
        engine: &mut LayoutEngine,
        host: &mut SimHost,
    ) -> Result<Vec<Snapshot>, ScriptError> {
        let mut snapshots = Vec::new();
        let mut last_line = 0;
        for (line, step) in &self.steps {
            last_line = *line;
            debug!(line, ?step, "script step");
            if *step == Step::Dump {
                snapshots.push(Snapshot::capture(*line, engine, host));
                continue;
            }
            run_step(step, engine, host).map_err(|kind| ScriptError { line: *line, kind })?;
        }
        if snapshots.is_empty() {
            snapshots.push(Snapshot::capture(last_line, engine, host));
        }
        Ok(snapshots)
    }
}

fn run_step(
    step: &Step,
    engine: &mut LayoutEngine,
    host: &mut SimHost,
) -> Result<(), ScriptErrorKind> {
    match step {
        Step::Monitor { id, frame } => {
            host.add_monitor(*id, *frame);
        }
        Step::Reserve { monitor, top, left, bottom, right } => {
            let info = host.monitor_mut(*monitor).ok_or(SimError::UnknownMonitor(*monitor))?;
            info.reserved_top_left = Point::new(*left, *top);
            info.reserved_bottom_right = Point::new(*right, *bottom);
            engine.handle_event(host, LayoutEvent::MonitorChanged(*monitor));
        }
        Step::Workspace { id, monitor, special } => {
            if *special {
                host.add_special_workspace(*id, *monitor)?;
            } else {
                host.add_workspace(*id, *monitor)?;
            }
        }
        Step::RemoveWorkspace(id) => {
            host.remove_workspace(*id);
            engine.handle_event(host, LayoutEvent::WorkspaceRemoved(*id));
        }
        Step::Rule { workspace, orientation } => {
            let info = host.workspace_mut(*workspace).ok_or(SimError::UnknownWorkspace(*workspace))?;
            info.orientation_rule = orientation.clone();
        }
        Step::Window { id, workspace, floating, max_size, remapped } => {
            let info = host.add_window(*id, *workspace)?;
            info.floating = *floating;
            info.max_size = *max_size;
            info.first_map = !*remapped;
        }
        Step::Tile(window) => engine.handle_event(host, LayoutEvent::WindowTiled { window: *window }),
        Step::Untile(window) => {
            engine.handle_event(host, LayoutEvent::WindowUntiled { window: *window })
        }
        Step::Close(window) => {
            engine.handle_event(host, LayoutEvent::WindowUntiled { window: *window });
            host.remove_window(*window).ok_or(SimError::UnknownWindow(*window))?;
        }
        Step::Focus(window) => host.set_focus(*window),
        Step::Pointer(point) => host.set_pointer(*point),
        Step::Drag(moving) => host.set_interactive_move(*moving),
        Step::Resize { delta, corner, window } => engine.handle_event(
            host,
            LayoutEvent::ResizeRequested { delta: *delta, corner: *corner, window: *window },
        ),
        Step::Fullscreen { window, mode } => {
            let from = host.window(*window).ok_or(SimError::UnknownWindow(*window))?.fullscreen;
            host.set_fullscreen_mode(*window, *mode);
            engine.handle_event(host, LayoutEvent::FullscreenRequested {
                window: *window,
                from,
                to: *mode,
            });
        }
        Step::Command(command) => engine.handle_command(host, None, command),
        Step::Event(event) => engine.handle_event(host, event.clone()),
        Step::Dump => {}
    }
    Ok(())
}

fn parse_step(line: &str) -> Result<Step, ScriptErrorKind> {
    let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    Ok(match keyword {
        "monitor" => Step::Monitor {
            id: MonitorId::new(value(&args, 0, "monitor id")?),
            frame: Rect::from_parts(
                value(&args, 1, "x")?,
                value(&args, 2, "y")?,
                value(&args, 3, "width")?,
                value(&args, 4, "height")?,
            ),
        },
        "reserve" => Step::Reserve {
            monitor: MonitorId::new(value(&args, 0, "monitor id")?),
            top: value(&args, 1, "top")?,
            left: value(&args, 2, "left")?,
            bottom: value(&args, 3, "bottom")?,
            right: value(&args, 4, "right")?,
        },
        "workspace" | "special" => Step::Workspace {
            id: WorkspaceId::new(value(&args, 0, "workspace id")?),
            monitor: MonitorId::new(value(&args, 1, "monitor id")?),
            special: keyword == "special",
        },
        "remove-workspace" => {
            Step::RemoveWorkspace(WorkspaceId::new(value(&args, 0, "workspace id")?))
        }
        "rule" => Step::Rule {
            workspace: WorkspaceId::new(value(&args, 0, "workspace id")?),
            orientation: args.get(1).map(|s| s.to_string()),
        },
        "window" => parse_window(&args)?,
        "tile" => Step::Tile(window(&args, 0)?),
        "untile" => Step::Untile(window(&args, 0)?),
        "close" => Step::Close(window(&args, 0)?),
        "focus" => match args.first() {
            Some(&"none") => Step::Focus(None),
            _ => Step::Focus(Some(window(&args, 0)?)),
        },
        "pointer" => Step::Pointer(Point::new(value(&args, 0, "x")?, value(&args, 1, "y")?)),
        "drag" => match args.first() {
            Some(&"on") => Step::Drag(true),
            Some(&"off") => Step::Drag(false),
            Some(other) => return Err(invalid("drag state", other)),
            None => return Err(ScriptErrorKind::MissingArgument("drag state")),
        },
        "resize" => {
            let delta = Point::new(value(&args, 0, "dx")?, value(&args, 1, "dy")?);
            let mut corner = ResizeCorner::None;
            let mut target = None;
            for arg in &args[2..] {
                if let Ok(c) = arg.parse::<ResizeCorner>() {
                    corner = c;
                } else {
                    target = Some(WindowId::new(
                        arg.parse().map_err(|_| invalid("resize argument", arg))?,
                    ));
                }
            }
            Step::Resize { delta, corner, window: target }
        }
        "fullscreen" => Step::Fullscreen {
            window: window(&args, 0)?,
            mode: value(&args, 1, "fullscreen mode")?,
        },
        "cmd" => Step::Command(rest.parse()?),
        "event" => Step::Event(serde_json::from_str(rest)?),
        "dump" => Step::Dump,
        other => return Err(ScriptErrorKind::UnknownStep(other.to_string())),
    })
}

/// `window <id> <workspace> [floating] [remapped] [max <width> <height>]`
fn parse_window(args: &[&str]) -> Result<Step, ScriptErrorKind> {
    let id = window(args, 0)?;
    let workspace = WorkspaceId::new(value(args, 1, "workspace id")?);
    let (mut floating, mut remapped, mut max_size) = (false, false, None);
    let mut i = 2;
    while let Some(&flag) = args.get(i) {
        match flag {
            "floating" => floating = true,
            "remapped" => remapped = true,
            "max" => {
                max_size = Some(Size::new(
                    value(args, i + 1, "max width")?,
                    value(args, i + 2, "max height")?,
                ));
                i += 2;
            }
            other => return Err(invalid("window flag", other)),
        }
        i += 1;
    }
    Ok(Step::Window { id, workspace, floating, max_size, remapped })
}

fn value<T: FromStr>(args: &[&str], idx: usize, what: &'static str) -> Result<T, ScriptErrorKind> {
    let raw = args.get(idx).ok_or(ScriptErrorKind::MissingArgument(what))?;
    raw.parse().map_err(|_| invalid(what, raw))
}

fn window(args: &[&str], idx: usize) -> Result<WindowId, ScriptErrorKind> {
    value(args, idx, "window id").map(WindowId::new)
}

fn invalid(what: &'static str, value: &str) -> ScriptErrorKind {
    ScriptErrorKind::InvalidValue { what, value: value.to_string() }
}
