// Domain value objects
pub mod action_kind;
pub mod location;
pub mod transfer_direction;

pub use action_kind::*;
pub use location::*;
pub use transfer_direction::*;
