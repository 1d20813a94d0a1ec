//! The map session: state, events and the controller that ties them together.

pub mod controller;
pub mod events;
pub mod state;

pub use controller::MapSession;
pub use events::{LocationOutcome, Notice, SearchOutcome, SessionEvent};
pub use state::SessionSnapshot;
