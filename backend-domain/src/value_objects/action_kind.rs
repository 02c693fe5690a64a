// Action kind value object
// Fixed byte code <-> label mapping persisted in `logs.action`

use serde::{Deserialize, Serialize};

/// Code written for labels outside the fixed table.
pub const UNKNOWN_ACTION_CODE: i8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    BlockPlaced,
    BlockBroken,
    ContainerOpen,
    ContainerClose,
    Chat,
    Command,
    Login,
    Logout,
    ItemDrop,
    ItemPickup,
    Unknown,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::BlockPlaced,
        ActionKind::BlockBroken,
        ActionKind::ContainerOpen,
        ActionKind::ContainerClose,
        ActionKind::Chat,
        ActionKind::Command,
        ActionKind::Login,
        ActionKind::Logout,
        ActionKind::ItemDrop,
        ActionKind::ItemPickup,
    ];

    pub fn code(&self) -> i8 {
        match self {
            ActionKind::BlockPlaced => 0,
            ActionKind::BlockBroken => 1,
            ActionKind::ContainerOpen => 2,
            ActionKind::ContainerClose => 3,
            ActionKind::Chat => 4,
            ActionKind::Command => 5,
            ActionKind::Login => 6,
            ActionKind::Logout => 7,
            ActionKind::ItemDrop => 8,
            ActionKind::ItemPickup => 9,
            ActionKind::Unknown => UNKNOWN_ACTION_CODE,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ActionKind::BlockPlaced,
            1 => ActionKind::BlockBroken,
            2 => ActionKind::ContainerOpen,
            3 => ActionKind::ContainerClose,
            4 => ActionKind::Chat,
            5 => ActionKind::Command,
            6 => ActionKind::Login,
            7 => ActionKind::Logout,
            8 => ActionKind::ItemDrop,
            9 => ActionKind::ItemPickup,
            _ => ActionKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::BlockPlaced => "Block Placed",
            ActionKind::BlockBroken => "Block Broken",
            ActionKind::ContainerOpen => "Container Open",
            ActionKind::ContainerClose => "Container Close",
            ActionKind::Chat => "Chat",
            ActionKind::Command => "Command",
            ActionKind::Login => "Login",
            ActionKind::Logout => "Logout",
            ActionKind::ItemDrop => "Item Drop",
            ActionKind::ItemPickup => "Item Pickup",
            ActionKind::Unknown => "Unknown",
        }
    }

    /// Accepts the display label ("Item Drop") as well as snake/kebab forms
    /// ("item_drop", "item-drop"), ignoring case.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        ActionKind::ALL
            .into_iter()
            .find(|kind| {
                kind.label()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .eq(normalized.chars())
            })
            .unwrap_or(ActionKind::Unknown)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for ActionKind {
    fn from(s: &str) -> Self {
        ActionKind::from_label(s)
    }
}

impl From<String> for ActionKind {
    fn from(s: String) -> Self {
        ActionKind::from_label(&s)
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.label().to_string()
    }
}
