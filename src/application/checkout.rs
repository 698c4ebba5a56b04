use crate::domain::capture::CaptureResult;
use crate::domain::order::{CreateOrder, OrderResult};
use crate::domain::ports::{ApprovalSignalBox, PaymentProviderBox};
use crate::error::{CheckoutError, ProviderError, Result};
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing::{error, info, warn};

/// How far a run goes after the order is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowMode {
    /// Create the order and stop.
    #[default]
    CreateOnly,
    /// Create, wait for buyer approval, then capture.
    FullFlow,
}

impl FromStr for FlowMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create-only" | "create" => Ok(Self::CreateOnly),
            "full-flow" | "full" => Ok(Self::FullFlow),
            other => Err(format!(
                "unknown mode '{other}', expected create-only or full-flow"
            )),
        }
    }
}

/// Why a run stopped without capturing, although the provider did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    NoApprovalLink,
    MissingOrderId,
    ApprovalAborted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoApprovalLink => f.write_str("No approval link found in the order response."),
            Self::MissingOrderId => f.write_str("Order ID is missing. Cannot capture the order."),
            Self::ApprovalAborted => {
                f.write_str("Approval input closed before the order was approved.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunFailure {
    /// The provider rejected a request with a structured payload.
    Provider(ProviderError),
    /// Transport or decoding failure.
    Unexpected(String),
}

/// Terminal state of one checkout run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    OrderCreated(OrderResult),
    Captured(CaptureResult),
    Halted(HaltReason),
    Failed(RunFailure),
}

/// Receives the events of a run as they happen.
///
/// Rendering has to be incremental: the approval link must be visible before
/// the run blocks on the approval signal.
pub trait RunReporter {
    fn order_created(&mut self, order: &OrderResult) -> io::Result<()>;
    fn approval_required(&mut self, approval_link: &str) -> io::Result<()>;
    fn awaiting_approval(&mut self) -> io::Result<()>;
    fn order_captured(&mut self, capture: &CaptureResult) -> io::Result<()>;
    fn halted(&mut self, reason: HaltReason) -> io::Result<()>;
    fn failed(&mut self, failure: &RunFailure) -> io::Result<()>;
}

/// Drives one order from creation to capture.
///
/// Every step is awaited before the next one starts. Provider failures end
/// the run and are reported, never retried.
pub struct CheckoutOrchestrator {
    provider: PaymentProviderBox,
    approval: ApprovalSignalBox,
    mode: FlowMode,
}

impl CheckoutOrchestrator {
    /// Creates a new `CheckoutOrchestrator`.
    ///
    /// # Arguments
    ///
    /// * `provider` - The payment provider orders are created and captured with.
    /// * `approval` - The signal that resolves once the buyer approved.
    /// * `mode` - Whether to stop after creation or run the full flow.
    pub fn new(provider: PaymentProviderBox, approval: ApprovalSignalBox, mode: FlowMode) -> Self {
        Self {
            provider,
            approval,
            mode,
        }
    }

    pub async fn create_order(&self, request: &CreateOrder) -> Result<OrderResult> {
        info!(
            intent = ?request.body.intent,
            prefer = request.prefer.header_value(),
            "creating order"
        );
        let order = self.provider.create_order(request).await?;
        info!(order_id = ?order.id, status = ?order.status, "order created");
        Ok(order)
    }

    pub async fn wait_for_approval(&self) -> Result<()> {
        self.approval.wait_for_approval().await
    }

    pub async fn capture_order(&self, order_id: &str) -> Result<CaptureResult> {
        info!(order_id, "capturing order");
        let capture = self.provider.capture_order(order_id).await?;
        info!(order_id, status = ?capture.status, "order captured");
        Ok(capture)
    }

    /// Runs the configured flow and reports each step.
    ///
    /// Provider, transport and approval input failures are reported and
    /// folded into the returned outcome. Only a failure to write the report
    /// itself is returned as an error.
    pub async fn run<R: RunReporter>(
        &self,
        request: &CreateOrder,
        reporter: &mut R,
    ) -> Result<RunOutcome> {
        match self.execute(request, reporter).await {
            Ok(outcome) => Ok(outcome),
            Err(CheckoutError::Io(err)) => Err(CheckoutError::Io(err)),
            Err(CheckoutError::ApprovalAborted) => halt(HaltReason::ApprovalAborted, reporter),
            Err(CheckoutError::Provider(err)) => {
                error!(status = err.status, payload = %err.payload, "provider rejected request");
                let failure = RunFailure::Provider(err);
                reporter.failed(&failure)?;
                Ok(RunOutcome::Failed(failure))
            }
            Err(err) => {
                error!(error = %err, "checkout run failed");
                let failure = RunFailure::Unexpected(err.to_string());
                reporter.failed(&failure)?;
                Ok(RunOutcome::Failed(failure))
            }
        }
    }

    async fn execute<R: RunReporter>(
        &self,
        request: &CreateOrder,
        reporter: &mut R,
    ) -> Result<RunOutcome> {
        let order = self.create_order(request).await?;
        reporter.order_created(&order)?;

        if self.mode == FlowMode::CreateOnly {
            return Ok(RunOutcome::OrderCreated(order));
        }

        let Some(approval_link) = order.approval_link() else {
            return halt(HaltReason::NoApprovalLink, reporter);
        };
        reporter.approval_required(approval_link)?;

        reporter.awaiting_approval()?;
        self.wait_for_approval().await?;

        let Some(order_id) = order.order_id() else {
            return halt(HaltReason::MissingOrderId, reporter);
        };

        let capture = self.capture_order(order_id).await?;
        reporter.order_captured(&capture)?;
        Ok(RunOutcome::Captured(capture))
    }
}

fn halt<R: RunReporter>(reason: HaltReason, reporter: &mut R) -> Result<RunOutcome> {
    warn!(%reason, "checkout run halted");
    reporter.halted(reason)?;
    Ok(RunOutcome::Halted(reason))
}
