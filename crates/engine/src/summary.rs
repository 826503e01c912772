//! Event summary.
//!
//! One-call aggregate behind the event overview screen: totals, per-head
//! average, every participant's balance and the settlement plan.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, ExpenseKind, ExpenseRecord, Money, Participant, ParticipantBalance, PlanItem,
    ResultEngine, compute_balances, compute_plan,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: Uuid,
    pub currency: Currency,
    /// Sum of shared expenses only; settlement records move money between
    /// participants without adding to what the event cost.
    pub total_expenses: Money,
    pub average_per_person: Money,
    pub total_participants: usize,
    pub balances: Vec<ParticipantBalance>,
    pub plan: Vec<PlanItem>,
}

/// Compute the full event summary from current participants and expenses.
pub fn event_summary(
    event_id: Uuid,
    currency: Currency,
    participants: &[Participant],
    expenses: &[ExpenseRecord],
) -> ResultEngine<EventSummary> {
    let total_expenses: Money = expenses
        .iter()
        .filter(|e| e.kind == ExpenseKind::Shared)
        .map(|e| e.amount)
        .sum();
    let average_per_person = if participants.is_empty() {
        Money::ZERO
    } else {
        total_expenses.share(1, participants.len() as i64)
    };

    let balances = compute_balances(participants, expenses)?;
    let plan = compute_plan(&balances)?;

    Ok(EventSummary {
        event_id,
        currency,
        total_expenses,
        average_per_person,
        total_participants: participants.len(),
        balances,
        plan,
    })
}
