//! Payment request ledger.
//!
//! The only stateful core component. A payment request records
//! payer-declared intent to pay one settlement plan item and the receiver's
//! acknowledgement; it holds no authority over balances. Confirmed requests
//! are materialized as settlement expense records
//! (see [`PaymentLedger::confirmed_settlements`]) so the balance calculator
//! can incorporate real-world payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ExpenseRecord, Money, ResultEngine};

/// Pending requests match a plan item by `(receiver, amount)` within this
/// tolerance: one minor unit, since a plan amount and an independently
/// re-derived balance amount may differ by rounding.
pub const PENDING_MATCH_EPSILON: Money = Money::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
        }
    }

    /// Both `Confirmed` and `Canceled` are terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "canceled" => Ok(Self::Canceled),
            other => Err(EngineError::Validation(format!(
                "invalid request status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub payer_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Money,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory collection of payment requests, scoped by event.
///
/// The engine never reads the clock; callers pass `now` so timestamps stay
/// deterministic and the surrounding transport decides the time source.
#[derive(Debug, Default)]
pub struct PaymentLedger {
    requests: Vec<PaymentRequest>,
}

impl PaymentLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record payer-declared intent to pay `receiver_id` the given amount.
    ///
    /// Always creates a fresh `pending` request; the ledger enforces no
    /// dedup. Callers are expected to consult
    /// [`has_pending_request`](Self::has_pending_request) before prompting
    /// for a new one.
    pub fn create(
        &mut self,
        event_id: Uuid,
        payer_id: Uuid,
        receiver_id: Uuid,
        amount: Money,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        if payer_id == receiver_id {
            return Err(EngineError::Validation(
                "payer and receiver must differ".to_string(),
            ));
        }
        let request = PaymentRequest {
            id: Uuid::new_v4(),
            event_id,
            payer_id,
            receiver_id,
            amount,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let id = request.id;
        self.requests.push(request);
        Ok(id)
    }

    /// The receiver acknowledges the money arrived.
    pub fn confirm(
        &mut self,
        request_id: Uuid,
        expected_updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<&PaymentRequest> {
        self.transition(request_id, expected_updated_at, RequestStatus::Confirmed, now)
    }

    /// Either party withdraws the request.
    pub fn cancel(
        &mut self,
        request_id: Uuid,
        expected_updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<&PaymentRequest> {
        self.transition(request_id, expected_updated_at, RequestStatus::Canceled, now)
    }

    /// Apply a state transition with an optimistic staleness check.
    ///
    /// `expected_updated_at` is the `updated_at` the caller last observed.
    /// A mismatch means another writer got there first and is surfaced as a
    /// retryable [`EngineError::Conflict`]; a non-pending status with a
    /// fresh read is a terminal-state violation
    /// ([`EngineError::InvalidState`]).
    fn transition(
        &mut self,
        request_id: Uuid,
        expected_updated_at: DateTime<Utc>,
        target: RequestStatus,
        now: DateTime<Utc>,
    ) -> ResultEngine<&PaymentRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| EngineError::NotFound(format!("payment request {request_id}")))?;

        if request.updated_at != expected_updated_at {
            return Err(EngineError::Conflict(format!(
                "payment request {request_id} changed since last read"
            )));
        }
        if request.status.is_terminal() {
            return Err(EngineError::InvalidState(format!(
                "payment request {request_id} is already {}",
                request.status.as_str()
            )));
        }

        request.status = target;
        request.updated_at = now;
        tracing::debug!(
            request = %request_id,
            status = target.as_str(),
            "payment request transitioned"
        );
        Ok(request)
    }

    pub fn get(&self, request_id: Uuid) -> ResultEngine<&PaymentRequest> {
        self.requests
            .iter()
            .find(|r| r.id == request_id)
            .ok_or_else(|| EngineError::NotFound(format!("payment request {request_id}")))
    }

    /// True when a pending request already targets `receiver_id` for this
    /// amount (within [`PENDING_MATCH_EPSILON`]). The UI checks this before
    /// offering a plan item for payment, so the same obligation is not paid
    /// twice.
    #[must_use]
    pub fn has_pending_request(&self, event_id: Uuid, receiver_id: Uuid, amount: Money) -> bool {
        self.requests.iter().any(|r| {
            r.event_id == event_id
                && r.receiver_id == receiver_id
                && r.status == RequestStatus::Pending
                && (r.amount - amount).abs() <= PENDING_MATCH_EPSILON
        })
    }

    /// All requests for an event, newest first.
    #[must_use]
    pub fn requests_for_event(&self, event_id: Uuid) -> Vec<&PaymentRequest> {
        let mut requests: Vec<&PaymentRequest> = self
            .requests
            .iter()
            .filter(|r| r.event_id == event_id)
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests
    }

    /// Requests in which the participant is payer or receiver, newest first.
    #[must_use]
    pub fn requests_for_participant(
        &self,
        event_id: Uuid,
        participant_id: Uuid,
    ) -> Vec<&PaymentRequest> {
        let mut requests: Vec<&PaymentRequest> = self
            .requests
            .iter()
            .filter(|r| {
                r.event_id == event_id
                    && (r.payer_id == participant_id || r.receiver_id == participant_id)
            })
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests
    }

    /// Confirmed requests of an event rendered as settlement expense records,
    /// ready to be appended to the expense set before recomputing balances.
    pub fn confirmed_settlements(&self, event_id: Uuid) -> ResultEngine<Vec<ExpenseRecord>> {
        self.requests
            .iter()
            .filter(|r| r.event_id == event_id && r.status == RequestStatus::Confirmed)
            .map(|r| ExpenseRecord::settlement(r.event_id, r.payer_id, r.receiver_id, r.amount))
            .collect()
    }
}
