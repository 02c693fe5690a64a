// Ingest envelopes
// Wire shape accepted from event sources before validation

use serde::{Deserialize, Serialize};

use crate::entities::{ContainerTransaction, LogEvent};
use crate::error::DomainError;
use crate::utils::{epoch_seconds, now_epoch_seconds, parse_epoch_seconds};
use crate::value_objects::{ActionKind, Location, TransferDirection};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestBatch {
    pub events: Vec<EventEnvelope>,
    pub containers: Vec<ContainerEnvelope>,
}

impl IngestBatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.containers.is_empty()
    }
}

/// Tagged event record: `{kind, player, detail, location, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub kind: ActionKind,
    pub player: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    /// Epoch seconds; the receive time is used when absent.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl EventEnvelope {
    pub fn new(kind: ActionKind, player: impl Into<String>) -> Self {
        Self {
            kind,
            player: player.into(),
            detail: None,
            location: None,
            timestamp: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_timestamp(mut self, epoch_seconds: i64) -> Self {
        self.timestamp = Some(epoch_seconds);
        self
    }
}

impl TryFrom<EventEnvelope> for LogEvent {
    type Error = DomainError;

    fn try_from(envelope: EventEnvelope) -> Result<Self, Self::Error> {
        let detail = envelope.detail.unwrap_or_default();
        match envelope.timestamp {
            Some(ts) => LogEvent::at(
                envelope.player,
                envelope.kind,
                detail,
                envelope.location,
                parse_epoch_seconds(ts)?,
            ),
            None => LogEvent::new(envelope.player, envelope.kind, detail, envelope.location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEnvelope {
    pub player: String,
    /// 0 = taken out, 1 = placed in.
    pub action: i64,
    pub container_type: String,
    pub material: String,
    #[serde(default = "default_amount")]
    pub amount: i64,
    pub world: String,
    pub x: i32,
    pub y: i16,
    pub z: i32,
    #[serde(default)]
    pub time: Option<i64>,
}

fn default_amount() -> i64 {
    1
}

impl TryFrom<ContainerEnvelope> for ContainerTransaction {
    type Error = DomainError;

    fn try_from(envelope: ContainerEnvelope) -> Result<Self, Self::Error> {
        let direction = match envelope.action {
            0 => TransferDirection::TakenOut,
            1 => TransferDirection::PlacedIn,
            other => return Err(DomainError::InvalidDirection(other)),
        };
        let time = match envelope.time {
            Some(ts) => epoch_seconds(parse_epoch_seconds(ts)?),
            None => now_epoch_seconds(),
        };
        ContainerTransaction::at(
            envelope.player,
            direction,
            envelope.container_type,
            envelope.material,
            envelope.amount,
            Location::new(envelope.world, envelope.x, envelope.y, envelope.z),
            time,
        )
    }
}
