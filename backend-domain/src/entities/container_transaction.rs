// Container transaction entity
// One item movement into or out of a container inventory

use crate::entities::log_event::validate_player_name;
use crate::error::DomainError;
use crate::utils::now_epoch_seconds;
use crate::value_objects::{Location, TransferDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerTransaction {
    player_name: String,
    direction: TransferDirection,
    container_type: String,
    material: String,
    amount: i16,
    location: Location,
    time: u32,
}

impl ContainerTransaction {
    pub fn new(
        player_name: impl Into<String>,
        direction: TransferDirection,
        container_type: impl Into<String>,
        material: impl Into<String>,
        amount: i64,
        location: Location,
    ) -> Result<Self, DomainError> {
        Self::at(
            player_name,
            direction,
            container_type,
            material,
            amount,
            location,
            now_epoch_seconds(),
        )
    }

    pub fn at(
        player_name: impl Into<String>,
        direction: TransferDirection,
        container_type: impl Into<String>,
        material: impl Into<String>,
        amount: i64,
        location: Location,
        time: u32,
    ) -> Result<Self, DomainError> {
        let player_name = validate_player_name(player_name.into())?;
        let material = material.into();
        if material.trim().is_empty() {
            return Err(DomainError::EmptyMaterial);
        }
        Ok(Self {
            player_name,
            direction,
            container_type: container_type.into(),
            material,
            amount: clamp_amount(amount),
            location,
            time,
        })
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn direction(&self) -> TransferDirection {
        self.direction
    }

    pub fn container_type(&self) -> &str {
        &self.container_type
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn amount(&self) -> i16 {
        self.amount
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn time(&self) -> u32 {
        self.time
    }
}

/// Amounts below one are recorded as one; the column is a SMALLINT.
fn clamp_amount(amount: i64) -> i16 {
    i16::try_from(amount.max(1)).unwrap_or(i16::MAX)
}
