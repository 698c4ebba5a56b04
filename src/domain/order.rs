use super::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Relation name of the link the buyer must visit to approve an order.
pub const APPROVE_REL: &str = "approve";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    /// Capture funds as soon as the buyer approves.
    #[default]
    Capture,
    /// Authorize now, capture later.
    Authorize,
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "capture" => Ok(Self::Capture),
            "authorize" => Ok(Self::Authorize),
            other => Err(format!("unknown intent '{other}', expected capture or authorize")),
        }
    }
}

/// How much of the created resource the provider should echo back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prefer {
    #[default]
    Minimal,
    Representation,
}

impl Prefer {
    /// Value of the `Prefer` HTTP header.
    pub fn header_value(&self) -> &'static str {
        match self {
            Self::Minimal => "return=minimal",
            Self::Representation => "return=representation",
        }
    }
}

impl FromStr for Prefer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches("return=") {
            "minimal" => Ok(Self::Minimal),
            "representation" => Ok(Self::Representation),
            other => Err(format!(
                "unknown preference '{other}', expected minimal or representation"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub intent: Intent,
    pub purchase_units: Vec<PurchaseUnit>,
}

impl OrderRequest {
    /// An order for a single line item.
    pub fn single(intent: Intent, amount: Money, description: impl Into<String>) -> Self {
        Self {
            intent,
            purchase_units: vec![PurchaseUnit {
                amount,
                description: Some(description.into()),
            }],
        }
    }
}

/// Everything the provider needs to create one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub body: OrderRequest,
    pub prefer: Prefer,
}

impl CreateOrder {
    pub fn new(body: OrderRequest, prefer: Prefer) -> Self {
        Self { body, prefer }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescription {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl LinkDescription {
    pub fn new(rel: &str, href: impl Into<String>, method: &str) -> Self {
        Self {
            href: href.into(),
            rel: rel.to_string(),
            method: Some(method.to_string()),
        }
    }
}

/// The provider's view of an order right after creation.
///
/// Every field is optional: a minimal response carries only the id, the
/// status and the links, and a malformed one may lack even those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub links: Option<Vec<LinkDescription>>,
    #[serde(default)]
    pub purchase_units: Option<Vec<PurchaseUnit>>,
}

impl OrderResult {
    /// The order identifier, treating an empty string as absent.
    pub fn order_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The `href` of the link whose relation is exactly `approve`.
    pub fn approval_link(&self) -> Option<&str> {
        self.links
            .iter()
            .flatten()
            .find(|link| link.rel == APPROVE_REL)
            .map(|link| link.href.as_str())
    }
}
