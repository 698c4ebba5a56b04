use crate::domain::capture::{Capture, CaptureResult, CapturedPurchaseUnit, Payments};
use crate::domain::order::{CreateOrder, LinkDescription, OrderResult, Prefer, PurchaseUnit};
use crate::domain::ports::PaymentProvider;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const API_BASE: &str = "https://api-m.sandbox.paypal.com/v2/checkout/orders";
const CHECKOUT_BASE: &str = "https://www.sandbox.paypal.com/checkoutnow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderState {
    Created,
    Approved,
    Completed,
}

impl OrderState {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Approved => "APPROVED",
            Self::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone)]
struct StoredOrder {
    purchase_units: Vec<PurchaseUnit>,
    state: OrderState,
}

#[derive(Debug, Default)]
struct Ledger {
    orders: HashMap<String, StoredOrder>,
    order_seq: u64,
    capture_seq: u64,
}

/// An offline payment provider that keeps orders in memory.
///
/// Orders get sequential ids (`O-1`, `O-2`, ...) and captures likewise
/// (`C-1`, ...). Capturing follows the provider's rules closely enough for
/// local runs and tests: unknown orders are not found, unapproved or already
/// captured orders are rejected with a 422 payload.
///
/// `Clone` shares the underlying ledger.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaymentProvider {
    ledger: Arc<RwLock<Ledger>>,
    auto_approve: bool,
    create_rejection: Option<ProviderError>,
}

impl InMemoryPaymentProvider {
    /// Creates a provider whose orders wait for an explicit `approve`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a buyer who approves every order as soon as it exists.
    pub fn with_auto_approve(mut self) -> Self {
        self.auto_approve = true;
        self
    }

    /// Rejects every order creation with the given error.
    pub fn reject_create_with(mut self, error: ProviderError) -> Self {
        self.create_rejection = Some(error);
        self
    }

    /// Marks an order as approved by the buyer.
    pub async fn approve(&self, order_id: &str) -> Result<()> {
        let mut ledger = self.ledger.write().await;
        let order = ledger
            .orders
            .get_mut(order_id)
            .ok_or_else(|| not_found(order_id))?;
        if order.state == OrderState::Created {
            order.state = OrderState::Approved;
        }
        Ok(())
    }

    pub async fn order_status(&self, order_id: &str) -> Option<String> {
        let ledger = self.ledger.read().await;
        ledger
            .orders
            .get(order_id)
            .map(|order| order.state.as_str().to_string())
    }
}

#[async_trait]
impl PaymentProvider for InMemoryPaymentProvider {
    async fn create_order(&self, request: &CreateOrder) -> Result<OrderResult> {
        if let Some(rejection) = &self.create_rejection {
            return Err(rejection.clone().into());
        }

        let mut ledger = self.ledger.write().await;
        ledger.order_seq += 1;
        let id = format!("O-{}", ledger.order_seq);
        let state = if self.auto_approve {
            OrderState::Approved
        } else {
            OrderState::Created
        };
        ledger.orders.insert(
            id.clone(),
            StoredOrder {
                purchase_units: request.body.purchase_units.clone(),
                state,
            },
        );

        let purchase_units = match request.prefer {
            Prefer::Minimal => None,
            Prefer::Representation => Some(request.body.purchase_units.clone()),
        };

        Ok(OrderResult {
            links: Some(vec![
                LinkDescription::new("self", format!("{API_BASE}/{id}"), "GET"),
                LinkDescription::new("approve", format!("{CHECKOUT_BASE}?token={id}"), "GET"),
                LinkDescription::new("update", format!("{API_BASE}/{id}"), "PATCH"),
                LinkDescription::new("capture", format!("{API_BASE}/{id}/capture"), "POST"),
            ]),
            id: Some(id),
            status: Some(OrderState::Created.as_str().to_string()),
            purchase_units,
        })
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureResult> {
        let mut ledger = self.ledger.write().await;
        let Ledger {
            orders,
            capture_seq,
            ..
        } = &mut *ledger;

        let order = orders.get_mut(order_id).ok_or_else(|| not_found(order_id))?;
        match order.state {
            OrderState::Created => {
                return Err(unprocessable(
                    "ORDER_NOT_APPROVED",
                    "Payer has not yet approved the Order for payment.",
                )
                .into());
            }
            OrderState::Completed => {
                return Err(unprocessable(
                    "ORDER_ALREADY_CAPTURED",
                    "Order already captured.",
                )
                .into());
            }
            OrderState::Approved => order.state = OrderState::Completed,
        }

        let purchase_units = order
            .purchase_units
            .iter()
            .map(|unit| {
                *capture_seq += 1;
                CapturedPurchaseUnit {
                    payments: Some(Payments {
                        captures: Some(vec![Capture {
                            id: Some(format!("C-{capture_seq}")),
                            status: Some(OrderState::Completed.as_str().to_string()),
                            amount: Some(unit.amount.clone().into()),
                        }]),
                    }),
                }
            })
            .collect();

        Ok(CaptureResult {
            id: Some(order_id.to_string()),
            status: Some(OrderState::Completed.as_str().to_string()),
            purchase_units: Some(purchase_units),
        })
    }
}

fn not_found(order_id: &str) -> ProviderError {
    ProviderError::new(
        404,
        json!({
            "name": "RESOURCE_NOT_FOUND",
            "message": "The specified resource does not exist.",
            "details": [{
                "issue": "INVALID_RESOURCE_ID",
                "description": format!("Specified resource ID {order_id} does not exist."),
            }],
        }),
    )
}

fn unprocessable(issue: &str, description: &str) -> ProviderError {
    ProviderError::new(
        422,
        json!({
            "name": "UNPROCESSABLE_ENTITY",
            "message": "The requested action could not be performed, semantically incorrect, or failed business validation.",
            "details": [{ "issue": issue, "description": description }],
        }),
    )
}
