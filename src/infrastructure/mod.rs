//! Adapters for the domain ports: the live provider, an in-memory provider
//! and the operator approval signal.

pub mod approval;
pub mod in_memory;
pub mod paypal;
