//! Application layer orchestrating a single checkout run.
//!
//! This module defines the `CheckoutOrchestrator`, which creates an order,
//! optionally waits for buyer approval and captures it. Provider access and
//! the approval signal are injected through the domain ports, so the same
//! orchestrator runs against the live provider or an in-memory one.

pub mod checkout;
