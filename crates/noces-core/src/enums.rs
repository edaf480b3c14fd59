//! Status enums for Noces entities and external signature/payment states.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ClientStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a planner's client.
///
/// ```text
/// lead → active → archived
///      → archived → active (reopened)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Lead,
    Active,
    Archived,
}

impl ClientStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Lead => &[Self::Active, Self::Archived],
            Self::Active => &[Self::Archived],
            Self::Archived => &[Self::Active],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Status of a wedding event.
///
/// ```text
/// planned → confirmed → completed
///         → cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Planned,
    Confirmed,
    Completed,
    Cancelled,
}

impl EventStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Planned => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskStatus / TaskPriority
// ---------------------------------------------------------------------------

/// Status of a planning task.
///
/// ```text
/// todo → in_progress → done
///      → done        → blocked → in_progress (unblocked)
///                    → todo (put back)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Todo => &[Self::InProgress, Self::Done],
            Self::InProgress => &[Self::Done, Self::Blocked, Self::Todo],
            Self::Blocked => &[Self::InProgress],
            Self::Done => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InvoiceStatus
// ---------------------------------------------------------------------------

/// Status of an invoice through billing and payment.
///
/// ```text
/// draft → sent → partially_paid → paid
///              → paid
///   ↘ cancelled ← (any unpaid state)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    PartiallyPaid,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Sent, Self::Cancelled],
            Self::Sent => &[Self::PartiallyPaid, Self::Paid, Self::Cancelled],
            Self::PartiallyPaid => &[Self::Paid, Self::Cancelled],
            Self::Paid | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether payments can still be received.
    #[must_use]
    pub const fn awaits_payment(self) -> bool {
        matches!(self, Self::Sent | Self::PartiallyPaid)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DevisStatus
// ---------------------------------------------------------------------------

/// Status of a devis (quote).
///
/// ```text
/// draft → sent → accepted
///              → rejected → draft (revised)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DevisStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl DevisStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Sent],
            Self::Sent => &[Self::Accepted, Self::Rejected],
            Self::Rejected => &[Self::Draft],
            Self::Accepted => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DevisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContractStatus
// ---------------------------------------------------------------------------

/// Status of a contract through e-signature.
///
/// ```text
/// draft → sent → partially_signed → signed
///              → signed
///              → declined → draft (resent)
///              → voided   → draft (resent)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    #[default]
    Draft,
    Sent,
    PartiallySigned,
    Signed,
    Declined,
    Voided,
}

impl ContractStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Sent],
            Self::Sent => &[
                Self::PartiallySigned,
                Self::Signed,
                Self::Declined,
                Self::Voided,
            ],
            Self::PartiallySigned => &[Self::Signed, Self::Declined, Self::Voided],
            Self::Declined | Self::Voided => &[Self::Draft],
            Self::Signed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether an envelope is out for signature.
    #[must_use]
    pub const fn awaits_signature(self) -> bool {
        matches!(self, Self::Sent | Self::PartiallySigned)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::PartiallySigned => "partially_signed",
            Self::Signed => "signed",
            Self::Declined => "declined",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PostItColor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostItColor {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
}

impl PostItColor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }
}

impl fmt::Display for PostItColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// External states: DocuSign envelopes/recipients, Qonto payment links
// ---------------------------------------------------------------------------

/// DocuSign envelope status, as reported by the eSignature API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    Created,
    Sent,
    Delivered,
    Signed,
    Completed,
    Declined,
    Voided,
    #[serde(other)]
    Unknown,
}

impl EnvelopeStatus {
    /// Whether the envelope can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Declined | Self::Voided)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Signed => "signed",
            Self::Completed => "completed",
            Self::Declined => "declined",
            Self::Voided => "voided",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DocuSign per-recipient status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecipientStatus {
    Created,
    Sent,
    Delivered,
    Signed,
    Completed,
    Declined,
    Autoresponded,
    #[serde(other)]
    Unknown,
}

impl RecipientStatus {
    /// Whether this recipient has finished signing.
    #[must_use]
    pub const fn has_signed(self) -> bool {
        matches!(self, Self::Signed | Self::Completed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Signed => "signed",
            Self::Completed => "completed",
            Self::Declined => "declined",
            Self::Autoresponded => "autoresponded",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RecipientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qonto payment link status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentLinkStatus {
    Open,
    Paid,
    Expired,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl PaymentLinkStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Paid => "paid",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentLinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_paid_is_terminal() {
        assert!(InvoiceStatus::Paid.allowed_next_states().is_empty());
        assert!(InvoiceStatus::Cancelled.allowed_next_states().is_empty());
    }

    #[test]
    fn invoice_cannot_skip_sending() {
        assert!(!InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Sent.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::PartiallyPaid.can_transition_to(InvoiceStatus::Paid));
    }

    #[test]
    fn awaits_payment_only_for_open_invoices() {
        assert!(InvoiceStatus::Sent.awaits_payment());
        assert!(InvoiceStatus::PartiallyPaid.awaits_payment());
        assert!(!InvoiceStatus::Draft.awaits_payment());
        assert!(!InvoiceStatus::Paid.awaits_payment());
    }

    #[test]
    fn devis_rejected_can_be_revised() {
        assert!(DevisStatus::Rejected.can_transition_to(DevisStatus::Draft));
        assert!(!DevisStatus::Accepted.can_transition_to(DevisStatus::Draft));
    }

    #[test]
    fn contract_signed_is_terminal() {
        assert!(ContractStatus::Signed.allowed_next_states().is_empty());
        assert!(ContractStatus::Voided.can_transition_to(ContractStatus::Draft));
        assert!(ContractStatus::PartiallySigned.awaits_signature());
    }

    #[test]
    fn task_done_is_terminal() {
        assert!(TaskStatus::Done.allowed_next_states().is_empty());
        assert!(TaskStatus::Todo.can_transition_to(TaskStatus::Done));
        assert!(!TaskStatus::Blocked.can_transition_to(TaskStatus::Done));
    }

    #[test]
    fn snake_case_serialization() {
        assert_eq!(
            serde_json::to_value(InvoiceStatus::PartiallyPaid).unwrap(),
            "partially_paid"
        );
        assert_eq!(
            serde_json::to_value(ContractStatus::PartiallySigned).unwrap(),
            "partially_signed"
        );
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), "in_progress");
    }

    #[test]
    fn unknown_external_states_deserialize() {
        let status: EnvelopeStatus = serde_json::from_str("\"correct\"").unwrap();
        assert_eq!(status, EnvelopeStatus::Unknown);
        let status: RecipientStatus = serde_json::from_str("\"faxpending\"").unwrap();
        assert_eq!(status, RecipientStatus::Unknown);
        let status: PaymentLinkStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, PaymentLinkStatus::Unknown);
    }

    #[test]
    fn as_str_matches_serde() {
        for status in [
            EnvelopeStatus::Created,
            EnvelopeStatus::Completed,
            EnvelopeStatus::Voided,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
        for status in [ClientStatus::Lead, ClientStatus::Active, ClientStatus::Archived] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }
}
