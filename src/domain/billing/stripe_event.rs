//! Stripe event envelope and the provider objects this service reads.
//!
//! Only fields relevant to subscription sync are captured; everything else in
//! the provider's schema is ignored during deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Signed event envelope as delivered to the webhook endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (shape depends on event type).
    pub object: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }
}

/// A reference the provider sends either as a bare id or as an expanded object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ExpandableId {
    Id(String),
    Object { id: String },
}

impl ExpandableId {
    pub fn id(&self) -> &str {
        match self {
            ExpandableId::Id(id) => id,
            ExpandableId::Object { id } => id,
        }
    }
}

/// `checkout.session` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSessionObject {
    pub id: String,

    /// `payment`, `setup` or `subscription`.
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub customer: Option<ExpandableId>,

    #[serde(default)]
    pub subscription: Option<ExpandableId>,

    /// Free-form key/value pairs attached when the session was created.
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl CheckoutSessionObject {
    /// Looks up a metadata value, treating blank strings as absent.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// `subscription` object, both inside events and from the retrieve API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionObject {
    pub id: String,

    pub customer: ExpandableId,

    /// Raw provider status (`active`, `past_due`, `canceled`, `trialing`, ...).
    pub status: String,

    /// Present on API versions before 2025-03; later versions move it to items.
    #[serde(default)]
    pub current_period_end: Option<i64>,

    #[serde(default)]
    pub items: Option<SubscriptionItemList>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubscriptionItemList {
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionItem {
    #[serde(default)]
    pub current_period_end: Option<i64>,

    #[serde(default)]
    pub price: Option<PriceObject>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceObject {
    #[serde(default)]
    pub lookup_key: Option<String>,
}

impl SubscriptionObject {
    fn first_item(&self) -> Option<&SubscriptionItem> {
        self.items.as_ref().and_then(|items| items.data.first())
    }

    /// End of the current billing period, from the subscription or its first item.
    pub fn period_end(&self) -> Option<i64> {
        self.current_period_end
            .or_else(|| self.first_item().and_then(|item| item.current_period_end))
    }

    /// Lookup key of the first item's price.
    pub fn lookup_key(&self) -> Option<&str> {
        self.first_item()
            .and_then(|item| item.price.as_ref())
            .and_then(|price| price.lookup_key.as_deref())
            .filter(|key| !key.is_empty())
    }
}

/// `invoice` object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoiceObject {
    pub id: String,

    #[serde(default)]
    pub customer: Option<ExpandableId>,

    #[serde(default)]
    pub subscription: Option<ExpandableId>,
}

/// Builder for test events.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    object: serde_json::Value,
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: event_type.into(),
            object: serde_json::json!({}),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: 1_704_067_200,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: false,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}
