//! Headless driver implementation.
//!
//! Wraps a [`PlacementController`] behind the JSON-lines protocol so
//! scripts and CI can drive placement sessions without an engine.

use std::io::{self, BufRead, Write};

use gridbuild_core::controller::{PlacementController, PlacementEvent};
use gridbuild_core::grid::{CellArea, GridLayer, GridStore, TileState};
use gridbuild_core::math::{Fixed, Vec2Fixed};
use gridbuild_core::placement::{Building, Footprint};

use crate::ascii::render_grid;
use crate::protocol::{Command, GhostState, Response};

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

/// A building driven entirely by script commands.
///
/// The headless driver has no visual object to finalize; `place` only flips
/// the placed flag.
#[derive(Debug, Clone)]
pub struct ScriptedBuilding {
    footprint: Footprint,
    placed: bool,
}

impl ScriptedBuilding {
    /// Create an unplaced building with the given footprint.
    #[must_use]
    pub const fn new(footprint: Footprint) -> Self {
        Self {
            footprint,
            placed: false,
        }
    }
}

impl Building for ScriptedBuilding {
    fn footprint(&self) -> Footprint {
        self.footprint
    }

    fn is_placed(&self) -> bool {
        self.placed
    }

    fn place(&mut self) {
        self.placed = true;
    }
}

/// Headless placement driver.
pub struct HeadlessRunner {
    controller: PlacementController,
    should_quit: bool,
}

impl HeadlessRunner {
    /// Create a runner over a prepared grid store.
    #[must_use]
    pub fn new(store: GridStore) -> Self {
        Self {
            controller: PlacementController::new(store),
            should_quit: false,
        }
    }

    /// Whether a quit command has been processed.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The underlying controller.
    #[must_use]
    pub const fn controller(&self) -> &PlacementController {
        &self.controller
    }

    /// Apply one command and produce its response.
    pub fn process(&mut self, command: Command) -> Response {
        match command {
            Command::Begin { width, height } => self.cmd_begin(width, height),
            Command::Move { x, y, over_ui } => {
                self.controller.handle_event(PlacementEvent::PointerMoved {
                    world: Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)),
                    over_ui,
                });
                Response::ack("move")
            }
            Command::Confirm => self.cmd_confirm(),
            Command::Cancel => {
                if self.controller.handle_event(PlacementEvent::CancelRequested).is_some() {
                    Response::ack("cancel")
                } else {
                    Response::error("no ghost in flight")
                }
            }
            Command::Zone {
                x,
                y,
                width,
                height,
            } => {
                let area = CellArea::new(x, y, width, height);
                match self
                    .controller
                    .store_mut()
                    .fill_block(area, TileState::Buildable, GridLayer::Main)
                {
                    Ok(()) => Response::ack("zone"),
                    Err(err) => Response::error(err),
                }
            }
            Command::Query => self.state_snapshot(),
            Command::Quit => {
                self.should_quit = true;
                Response::ack("quit")
            }
        }
    }

    fn cmd_begin(&mut self, width: u32, height: u32) -> Response {
        if width == 0 || height == 0 {
            return Response::error("footprint must be at least 1x1");
        }

        let building = Box::new(ScriptedBuilding::new(Footprint::new(width, height)));
        match self
            .controller
            .handle_event(PlacementEvent::BeginRequested { building })
        {
            None => Response::ack("begin"),
            // The controller hands a rejected building back
            Some(_) => Response::error("begin rejected; a ghost may already be active"),
        }
    }

    fn cmd_confirm(&mut self) -> Response {
        let before = self.controller.placed_count();
        self.controller.handle_event(PlacementEvent::ConfirmRequested);
        if self.controller.placed_count() > before {
            Response::ack("confirm")
        } else {
            Response::error("confirm did not commit; footprint invalid or no ghost")
        }
    }

    fn state_snapshot(&self) -> Response {
        let store = self.controller.store();
        let active = self.controller.tracker().active_area().map(|area| GhostState {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height,
            valid: store.is_area_buildable(area),
        });

        Response::State {
            placed: self.controller.placed_count(),
            active,
            grid: render_grid(store),
        }
    }

    /// Read JSON-line commands from `input` until EOF or a quit command,
    /// writing one JSON response per line to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        let ready = Response::Ready {
            version: PROTOCOL_VERSION.to_string(),
        };
        writeln!(output, "{}", serde_json::to_string(&ready)?)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Command>(&line) {
                Ok(command) => {
                    tracing::debug!(?command, "processing");
                    self.process(command)
                }
                Err(err) => Response::error(format!("bad command: {err}")),
            };
            writeln!(output, "{}", serde_json::to_string(&response)?)?;

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }
}
