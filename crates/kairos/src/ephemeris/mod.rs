pub mod provider;
pub mod table;
pub mod types;

pub use provider::{PositionError, PositionProvider};
pub use table::TablePositionProvider;
pub use types::BodyPositions;
