//! Application layer - services and ports around the domain core

pub mod dto;
pub mod ports;
pub mod services;
