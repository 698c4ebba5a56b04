use super::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A captured amount as reported back by the provider.
///
/// Unlike `Money`, both parts are optional: the capture has already happened
/// by the time this is read, so a partial amount must not reject the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedAmount {
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl CapturedAmount {
    pub fn is_empty(&self) -> bool {
        self.currency_code.is_none() && self.value.is_none()
    }
}

impl From<Money> for CapturedAmount {
    fn from(money: Money) -> Self {
        Self {
            currency_code: Some(money.currency_code),
            value: Some(money.value),
        }
    }
}

impl fmt::Display for CapturedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.currency_code, &self.value) {
            (Some(currency), Some(value)) => write!(f, "{currency} {value}"),
            (Some(part), None) | (None, Some(part)) => f.write_str(part),
            (None, None) => Ok(()),
        }
    }
}

/// A single capture recorded against a purchase unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<CapturedAmount>,
}

impl Capture {
    /// True when the entry carries nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.status.is_none()
            && self.amount.as_ref().is_none_or(CapturedAmount::is_empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payments {
    #[serde(default)]
    pub captures: Option<Vec<Capture>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPurchaseUnit {
    #[serde(default)]
    pub payments: Option<Payments>,
}

/// The provider's response to capturing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchase_units: Option<Vec<CapturedPurchaseUnit>>,
}

impl CaptureResult {
    /// The first capture of the first purchase unit, if the response nests one.
    pub fn first_capture(&self) -> Option<&Capture> {
        self.purchase_units
            .as_ref()?
            .first()?
            .payments
            .as_ref()?
            .captures
            .as_ref()?
            .first()
    }
}
