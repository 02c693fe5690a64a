// Location value object

use serde::{Deserialize, Serialize};

/// World name stored when an event carries no location.
pub const UNKNOWN_WORLD: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: i32,
    pub y: i16,
    pub z: i32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: i32, y: i16, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Rebuilds a location from stored columns; rows written without a
    /// location carry the `unknown` world marker.
    pub fn from_columns(world: &str, x: i32, y: i16, z: i32) -> Option<Self> {
        if world.trim().is_empty() || world == UNKNOWN_WORLD {
            return None;
        }
        Some(Self::new(world, x, y, z))
    }

    /// `world (x, y, z)`
    pub fn describe(&self) -> String {
        format!("{} ({}, {}, {})", self.world, self.x, self.y, self.z)
    }

    pub fn teleport_command(&self) -> String {
        format!("/tp {} {} {}", self.x, self.y, self.z)
    }
}

pub fn describe_location(location: Option<&Location>) -> String {
    location
        .map(Location::describe)
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn teleport_location(location: Option<&Location>) -> String {
    location
        .map(Location::teleport_command)
        .unwrap_or_else(|| "Unknown".to_string())
}
