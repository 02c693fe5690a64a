// Log event entity
// One recorded player/world action, immutable once built

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::DomainError;
use crate::utils::{epoch_seconds, truncate_chars};
use crate::value_objects::{ActionKind, Location, UNKNOWN_WORLD};

/// Width of the `playerName` columns.
pub const PLAYER_NAME_MAX_CHARS: usize = 16;
/// Width of the `logs.detail` column.
pub const DETAIL_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    player_name: String,
    action: ActionKind,
    detail: String,
    location: Option<Location>,
    timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Records the event at the current second.
    pub fn new(
        player_name: impl Into<String>,
        action: ActionKind,
        detail: impl Into<String>,
        location: Option<Location>,
    ) -> Result<Self, DomainError> {
        Self::at(player_name, action, detail, location, Utc::now())
    }

    pub fn at(
        player_name: impl Into<String>,
        action: ActionKind,
        detail: impl Into<String>,
        location: Option<Location>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let player_name = validate_player_name(player_name.into())?;
        Ok(Self {
            player_name,
            action,
            detail: detail.into(),
            location,
            timestamp: timestamp.trunc_subsecs(0),
        })
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Detail as persisted: at most `max_chars` characters.
    pub fn stored_detail(&self, max_chars: usize) -> &str {
        truncate_chars(&self.detail, max_chars)
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn world(&self) -> &str {
        self.location
            .as_ref()
            .map(|loc| loc.world.as_str())
            .unwrap_or(UNKNOWN_WORLD)
    }

    /// Block coordinates, zeroed when no location was recorded.
    pub fn coordinates(&self) -> (i32, i16, i32) {
        self.location
            .as_ref()
            .map(|loc| (loc.x, loc.y, loc.z))
            .unwrap_or((0, 0, 0))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn epoch_seconds(&self) -> u32 {
        epoch_seconds(self.timestamp)
    }
}

pub(crate) fn validate_player_name(name: String) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyPlayerName);
    }
    if trimmed.chars().count() > PLAYER_NAME_MAX_CHARS {
        return Err(DomainError::PlayerNameTooLong {
            name: trimmed.to_string(),
            max: PLAYER_NAME_MAX_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_oversized_player_names() {
        assert_eq!(
            LogEvent::new("  ", ActionKind::Chat, "hi", None),
            Err(DomainError::EmptyPlayerName)
        );
        assert!(matches!(
            LogEvent::new("a_name_that_is_too_long", ActionKind::Chat, "", None),
            Err(DomainError::PlayerNameTooLong { .. })
        ));
    }

    #[test]
    fn missing_location_persists_as_unknown_origin() {
        let event = LogEvent::new("Alice", ActionKind::Login, "", None).unwrap();
        assert_eq!(event.world(), "unknown");
        assert_eq!(event.coordinates(), (0, 0, 0));
    }

    #[test]
    fn stored_detail_is_truncated() {
        let long = "x".repeat(300);
        let event = LogEvent::new("Bob", ActionKind::Chat, long, None).unwrap();
        assert_eq!(event.stored_detail(DETAIL_MAX_CHARS).len(), 255);
        assert_eq!(event.detail().len(), 300);
    }
}
