//! Inbound webhook payloads

use serde::{Deserialize, Serialize};

use crate::domain::entity::{campaign::Campaign, conversion::Conversion};

/// Envelope shared by all webhook events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    pub timestamp: String,
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionEvent {
    #[serde(rename = "conversion.created")]
    Created,
    #[serde(rename = "conversion.updated")]
    Updated,
}

impl ConversionEvent {
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "conversion.created" => Some(Self::Created),
            "conversion.updated" => Some(Self::Updated),
            _ => None,
        }
    }
}

/// Subset of the affiliate's user record sent with conversion events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliateSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionWebhookData {
    pub conversion: Conversion,
    pub campaign: Campaign,
    #[serde(default)]
    pub affiliate: AffiliateSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionWebhook {
    pub event: ConversionEvent,
    pub timestamp: String,
    pub data: ConversionWebhookData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ConversionWebhook {
    /// Interpret a generic payload as a conversion event
    ///
    /// Returns `Ok(None)` for events of other kinds.
    pub fn from_payload(payload: WebhookPayload) -> Result<Option<Self>, serde_json::Error> {
        let Some(event) = ConversionEvent::from_event_name(&payload.event) else {
            return Ok(None);
        };

        let data: ConversionWebhookData =
            serde_json::from_value(serde_json::Value::Object(payload.data))?;

        Ok(Some(Self {
            event,
            timestamp: payload.timestamp,
            data,
            signature: payload.signature,
        }))
    }
}
