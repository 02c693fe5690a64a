// Query filters, paging and read views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{describe_location, teleport_location, ActionKind, Location, TransferDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` in any case sorts ascending, everything else descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub player: Option<String>,
    pub action: Option<ActionKind>,
    pub detail_contains: Option<String>,
    /// Inclusive epoch-second bounds.
    pub from: Option<u32>,
    pub to: Option<u32>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(mut self, player: impl Into<String>) -> Self {
        self.player = non_blank(Some(player.into()));
        self
    }

    pub fn action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    pub fn detail_contains(mut self, needle: impl Into<String>) -> Self {
        self.detail_contains = non_blank(Some(needle.into()));
        self
    }

    pub fn between(mut self, from: Option<u32>, to: Option<u32>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Drops blank text criteria so they match everything.
    pub fn normalized(self) -> Self {
        Self {
            player: non_blank(self.player),
            detail_contains: non_blank(self.detail_contains),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.player.is_none()
            && self.action.is_none()
            && self.detail_contains.is_none()
            && self.from.is_none()
            && self.to.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFilter {
    pub player: Option<String>,
    pub material_contains: Option<String>,
    pub direction: Option<TransferDirection>,
}

impl ContainerFilter {
    pub fn normalized(self) -> Self {
        Self {
            player: non_blank(self.player),
            material_contains: non_blank(self.material_contains),
            ..self
        }
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortOrder,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: SortOrder) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            sort,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub id: i64,
    pub player_name: String,
    pub action: ActionKind,
    pub detail: String,
    pub location: Option<Location>,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn to_entry(&self) -> LogEntry {
        LogEntry {
            player_name: self.player_name.clone(),
            action: self.action.label().to_string(),
            detail: self.detail.clone(),
            location: describe_location(self.location.as_ref()),
            teleport: teleport_location(self.location.as_ref()),
            timestamp: self.timestamp,
        }
    }
}

/// Display row handed to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub player_name: String,
    pub action: String,
    pub detail: String,
    /// `world (x, y, z)` or `Unknown`
    pub location: String,
    /// `/tp x y z` or `Unknown`
    pub teleport: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRecord {
    pub id: i64,
    pub player_name: String,
    pub direction: TransferDirection,
    pub container_type: String,
    pub material: String,
    pub amount: i16,
    pub location: Location,
    pub time: DateTime<Utc>,
}

/// Result of a paged read. `error` is set when the read failed and the
/// page was replaced by an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub error: Option<String>,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest, error: Option<String>) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: request.page,
            size: request.size,
            error,
        }
    }
}

pub type LogPage = Page<LogEntry>;
pub type ContainerPage = Page<ContainerRecord>;
