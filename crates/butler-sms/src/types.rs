// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio REST API payloads.

use butler_core::{DeliveryStatus, InboundSms, MessageSid, PhoneNumber};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of `GET /Accounts/{sid}/Messages.json`.
#[derive(Debug, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    /// Path (with query) of the next page, relative to the API host.
    #[serde(default)]
    pub next_page_uri: Option<String>,
}

/// A message resource as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub sid: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub status: String,
    /// RFC 2822 timestamp, e.g. `Mon, 16 Aug 2010 03:45:01 +0000`.
    #[serde(default)]
    pub date_sent: Option<String>,
}

impl ApiMessage {
    pub fn into_inbound(self) -> InboundSms {
        let sent_at = self.date_sent.as_deref().and_then(parse_date_sent);
        InboundSms {
            sid: MessageSid(self.sid),
            from: PhoneNumber::new(self.from.as_deref().unwrap_or_default()),
            to: PhoneNumber::new(self.to.as_deref().unwrap_or_default()),
            body: self.body.unwrap_or_default(),
            status: DeliveryStatus::from(self.status.as_str()),
            sent_at,
        }
    }
}

fn parse_date_sent(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Response to `POST /Accounts/{sid}/Messages.json`.
#[derive(Debug, Deserialize)]
pub struct SendResponse {
    pub sid: String,
}

/// Error body returned by the API on 4xx/5xx.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn page_deserializes_with_null_fields() {
        let json = serde_json::json!({
            "messages": [{
                "sid": "SM1",
                "from": "+1 469 555 1212",
                "to": "+12145551212",
                "body": "Open",
                "status": "received",
                "date_sent": null
            }],
            "next_page_uri": null
        });
        let page: MessagePage = serde_json::from_value(json).unwrap();
        assert!(page.next_page_uri.is_none());

        let sms = page.messages[0].clone().into_inbound();
        assert_eq!(sms.sid.as_str(), "SM1");
        assert_eq!(sms.from.as_str(), "+14695551212");
        assert!(sms.status.is_received());
        assert!(sms.sent_at.is_none());
    }

    #[test]
    fn date_sent_parses_rfc2822() {
        let dt = parse_date_sent("Mon, 16 Aug 2010 03:45:01 +0000").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2010, 8, 16));
        assert_eq!(dt.hour(), 3);
        assert!(parse_date_sent("yesterday").is_none());
    }

    #[test]
    fn unknown_status_is_preserved() {
        let msg = ApiMessage {
            sid: "SM2".into(),
            from: None,
            to: None,
            body: None,
            status: "partially_delivered".into(),
            date_sent: None,
        };
        let sms = msg.into_inbound();
        assert_eq!(sms.status, DeliveryStatus::Other("partially_delivered".into()));
        assert!(sms.body.is_empty());
    }
}
