// Container transfer direction value object

use serde::{Deserialize, Serialize};

/// Stored in `container_transactions.action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    TakenOut,
    PlacedIn,
}

impl TransferDirection {
    pub fn code(&self) -> i8 {
        match self {
            TransferDirection::TakenOut => 0,
            TransferDirection::PlacedIn => 1,
        }
    }

    /// Anything other than 1 reads back as taken out.
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            TransferDirection::PlacedIn
        } else {
            TransferDirection::TakenOut
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "0" | "taken" | "taken_out" | "take" | "out" => Some(TransferDirection::TakenOut),
            "1" | "placed" | "placed_in" | "place" | "in" => Some(TransferDirection::PlacedIn),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransferDirection::TakenOut => "Taken",
            TransferDirection::PlacedIn => "Placed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_spellings() {
        assert_eq!(TransferDirection::parse("Placed"), Some(TransferDirection::PlacedIn));
        assert_eq!(TransferDirection::parse("0"), Some(TransferDirection::TakenOut));
        assert_eq!(TransferDirection::parse("sideways"), None);
        assert_eq!(TransferDirection::from_code(7), TransferDirection::TakenOut);
    }
}
