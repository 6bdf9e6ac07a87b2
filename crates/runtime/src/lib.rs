pub mod event_bus;
pub mod frame;
pub mod notifier;

pub use event_bus::*;
pub use frame::*;
pub use notifier::*;
