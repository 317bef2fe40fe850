//! Application ports - boundaries between the core and the outside world

pub mod outbound;
