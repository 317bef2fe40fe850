//! Domain events - the combat log record types

mod log_event;

pub use log_event::{LogEvent, LogEventKind};
