//! JSON protocol for the headless placement driver.
//!
//! The driver communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the script or test harness
//! **Output (stdout):** Responses and state snapshots
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0"}
//! -> {"cmd":"begin","width":2,"height":2}
//! <- {"type":"ack","cmd":"begin"}
//! -> {"cmd":"move","x":4.5,"y":3.0}
//! <- {"type":"ack","cmd":"move"}
//! -> {"cmd":"confirm"}
//! <- {"type":"ack","cmd":"confirm"}
//! -> {"cmd":"query"}
//! <- {"type":"state","placed":1,"active":null,"grid":["...",...]}
//! ```

use serde::{Deserialize, Serialize};

/// Commands accepted by the headless driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Start dragging a ghost with the given footprint.
    Begin {
        /// Footprint width in cells.
        width: u32,
        /// Footprint height in cells.
        height: u32,
    },

    /// Move the pointer to a world position.
    Move {
        /// Pointer world X.
        x: f64,
        /// Pointer world Y.
        y: f64,
        /// Pointer is over UI; the move is suppressed.
        #[serde(default)]
        over_ui: bool,
    },

    /// Commit the ghost at its current footprint.
    Confirm,

    /// Abandon the ghost.
    Cancel,

    /// Mark a rectangle of main-grid cells buildable (level setup).
    Zone {
        /// Origin cell X.
        x: u32,
        /// Origin cell Y.
        y: u32,
        /// Width in cells.
        width: u32,
        /// Height in cells.
        height: u32,
    },

    /// Output current state without changing anything.
    Query,

    /// Stop the driver.
    Quit,
}

/// The active ghost, as reported in a state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostState {
    /// Footprint origin cell X.
    pub x: u32,
    /// Footprint origin cell Y.
    pub y: u32,
    /// Footprint width in cells.
    pub width: u32,
    /// Footprint height in cells.
    pub height: u32,
    /// Whether the whole footprint is buildable right now.
    pub valid: bool,
}

/// Responses emitted by the headless driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Driver started and is listening.
    Ready {
        /// Protocol version.
        version: String,
    },

    /// Command applied.
    Ack {
        /// Echo of the command name.
        cmd: String,
    },

    /// Command could not be applied.
    Error {
        /// Human-readable reason.
        message: String,
    },

    /// State snapshot.
    State {
        /// Number of buildings committed so far.
        placed: usize,
        /// The active ghost, if one is in flight.
        active: Option<GhostState>,
        /// ASCII rendering of the composed grid, one row per string.
        grid: Vec<String>,
    },
}

impl Response {
    /// Ack for a command name.
    #[must_use]
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Error from any displayable reason.
    #[must_use]
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}
