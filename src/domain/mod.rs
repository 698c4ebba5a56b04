//! Domain types for a checkout run and the ports the application drives.

pub mod capture;
pub mod money;
pub mod order;
pub mod ports;
