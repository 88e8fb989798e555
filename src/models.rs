//! Data models for Vanish API responses.

use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use serde::{Deserialize, Serialize};

/// Metadata for an email attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    /// Attachment identifier, used with [`Client::get_attachment`](crate::Client::get_attachment).
    pub id: String,
    /// Original file name.
    pub name: String,
    /// MIME type as reported by the server.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// One row of a mailbox listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSummary {
    /// Email identifier.
    pub id: String,
    /// Sender address.
    #[serde(rename = "from")]
    pub sender: String,
    /// Subject line.
    pub subject: String,
    /// Short plain-text preview of the body.
    pub text_preview: String,
    /// When the server received the message.
    pub received_at: DateTime<Utc>,
    /// Whether the message carries attachments.
    pub has_attachments: bool,
}

/// Full content of a single email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDetail {
    pub id: String,
    #[serde(rename = "from")]
    pub sender: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub text: String,
    pub received_at: DateTime<Utc>,
    pub has_attachments: bool,
    /// Attachment metadata; empty when the server omits the field.
    #[serde(default)]
    pub attachments: Vec<AttachmentMeta>,
}

/// A page of a mailbox listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedEmailList {
    /// Summaries in server order, typically newest first.
    pub data: Vec<EmailSummary>,
    /// Opaque cursor for the next page; `None` on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Total number of emails in the mailbox at query time.
    pub total: u64,
}

impl PaginatedEmailList {
    /// Whether another page can be requested with [`next_cursor`](Self::next_cursor).
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Raw attachment payload together with the response headers.
#[derive(Debug, Clone)]
pub struct AttachmentContent {
    /// Attachment bytes, exactly as served.
    pub data: Vec<u8>,
    /// Response headers (content type, disposition, length, ...).
    pub headers: HeaderMap,
}

impl AttachmentContent {
    /// The `Content-Type` header, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Length` header parsed as a byte count.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

/// `GET /domains` body.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainsResponse {
    pub domains: Vec<String>,
}

/// `POST /mailbox` body.
#[derive(Debug, Default, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'a str>,
}

impl GenerateRequest<'_> {
    pub fn is_empty(&self) -> bool {
        self.domain.is_none() && self.prefix.is_none()
    }
}

/// `POST /mailbox` response.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub email: String,
}

/// `DELETE /email/{id}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteEmailResponse {
    #[serde(default)]
    pub success: bool,
}

/// `DELETE /mailbox/{address}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteMailboxResponse {
    #[serde(default)]
    pub deleted: u64,
}

/// Body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
