use serde::{Deserialize, Serialize};

use backend_domain::{
    format_timestamp, parse_date, ContainerRecord, LogEntry, Page,
};

/// Raw query strings; numbers are parsed leniently so bad input falls back
/// to defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub player: Option<String>,
    pub action: Option<String>,
    #[serde(rename = "itemContainer")]
    pub item_container: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Minutes back from now; only read by the action summary.
    pub last: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContainersQuery {
    pub player: Option<String>,
    pub material: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryDto {
    pub player_name: String,
    pub action: String,
    pub detail: String,
    pub location: String,
    pub timestamp: String,
}

impl From<LogEntry> for LogEntryDto {
    fn from(entry: LogEntry) -> Self {
        Self {
            player_name: entry.player_name,
            action: entry.action,
            detail: entry.detail,
            location: entry.teleport,
            timestamp: format_timestamp(entry.timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntryDto>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Page<LogEntry>> for LogsResponse {
    fn from(page: Page<LogEntry>) -> Self {
        Self {
            logs: page.items.into_iter().map(LogEntryDto::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
            error: page.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDto {
    pub player_name: String,
    pub action: String,
    pub container_type: String,
    pub material: String,
    pub amount: i16,
    pub location: String,
    pub timestamp: String,
}

impl From<ContainerRecord> for ContainerDto {
    fn from(record: ContainerRecord) -> Self {
        Self {
            player_name: record.player_name,
            action: record.direction.label().to_string(),
            container_type: record.container_type,
            material: record.material,
            amount: record.amount,
            location: record.location.teleport_command(),
            timestamp: format_timestamp(record.time),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContainersResponse {
    pub transactions: Vec<ContainerDto>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Page<ContainerRecord>> for ContainersResponse {
    fn from(page: Page<ContainerRecord>) -> Self {
        Self {
            transactions: page.items.into_iter().map(ContainerDto::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
            error: page.error,
        }
    }
}

pub fn parse_number(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Epoch seconds, or `YYYY-MM-DD` (UTC). `end_of_day` selects 23:59:59.
pub fn parse_time_bound(value: Option<&str>, end_of_day: bool) -> Result<Option<u32>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(seconds) = raw.parse::<u32>() {
        return Ok(Some(seconds));
    }
    let date = parse_date(raw).map_err(|_| format!("invalid time bound '{raw}'"))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    let seconds = time
        .map(|t| t.and_utc().timestamp())
        .and_then(|ts| u32::try_from(ts).ok())
        .ok_or_else(|| format!("time bound out of range '{raw}'"))?;
    Ok(Some(seconds))
}
