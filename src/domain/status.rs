//! Tool status and the three-state lifecycle

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a tool
///
/// Serialized with the human-readable labels used on the wire and in the
/// local snapshot (`"In Stock"`, `"Issued"`, `"In Repair"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolStatus {
    /// On the shelf, available to issue
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    /// Handed out to a holder
    #[serde(rename = "Issued")]
    Issued,
    /// Out of service for repair
    #[serde(rename = "In Repair")]
    InRepair,
}

/// Direction of a move between adjacent states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl ToolStatus {
    /// All statuses in board order
    pub const ALL: [ToolStatus; 3] = [ToolStatus::InStock, ToolStatus::Issued, ToolStatus::InRepair];

    /// Wire label for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::InStock => "In Stock",
            ToolStatus::Issued => "Issued",
            ToolStatus::InRepair => "In Repair",
        }
    }

    /// The status reached by moving one step in `direction`
    ///
    /// Forward from `InRepair` and backward from `InStock` stay put.
    pub fn step(self, direction: Direction) -> ToolStatus {
        match (self, direction) {
            (ToolStatus::InStock, Direction::Forward) => ToolStatus::Issued,
            (ToolStatus::Issued, Direction::Forward) => ToolStatus::InRepair,
            (ToolStatus::InRepair, Direction::Forward) => ToolStatus::InRepair,
            (ToolStatus::InRepair, Direction::Backward) => ToolStatus::Issued,
            (ToolStatus::Issued, Direction::Backward) => ToolStatus::InStock,
            (ToolStatus::InStock, Direction::Backward) => ToolStatus::InStock,
        }
    }

    /// Returns true if a move in `direction` would change the status
    pub fn can_move(&self, direction: Direction) -> bool {
        self.step(direction) != *self
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "in stock" | "instock" | "stock" => Ok(ToolStatus::InStock),
            "issued" => Ok(ToolStatus::Issued),
            "in repair" | "inrepair" | "repair" => Ok(ToolStatus::InRepair),
            _ => Err(format!("unknown tool status '{}'", s)),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" | "f" => Ok(Direction::Forward),
            "backward" | "b" => Ok(Direction::Backward),
            _ => Err(format!("unknown direction '{}' (expected forward or backward)", s)),
        }
    }
}
