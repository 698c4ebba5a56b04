use super::capture::CaptureResult;
use super::order::{CreateOrder, OrderResult};
use crate::error::Result;
use async_trait::async_trait;

/// The two provider operations a checkout run needs.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_order(&self, request: &CreateOrder) -> Result<OrderResult>;
    async fn capture_order(&self, order_id: &str) -> Result<CaptureResult>;
}

/// Resolves once the buyer has approved the order out of band.
#[async_trait]
pub trait ApprovalSignal: Send + Sync {
    async fn wait_for_approval(&self) -> Result<()>;
}

pub type PaymentProviderBox = Box<dyn PaymentProvider>;
pub type ApprovalSignalBox = Box<dyn ApprovalSignal>;
