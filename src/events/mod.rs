//! Event logging for analytics
//!
//! Provides a compact text format for logging wall hits and control changes.
//! Interactive sessions write `.evlog` files through the EventBus; headless
//! runs collect into an in-memory EventBuffer.

mod buffer;
mod bus;
mod format;
mod logger;
mod types;

pub use buffer::EventBuffer;
pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use format::{parse_event, serialize_event};
pub use logger::{EventLogConfig, EventLogger, write_bus_events};
pub use types::{BounceConfig, BounceEvent};
