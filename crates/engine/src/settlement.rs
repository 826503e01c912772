//! Settlement planner.
//!
//! Turns a set of net balances into a short list of suggested transfers that
//! zero every balance. The matching is greedy largest-magnitude: not always
//! globally transaction-count-optimal, but deterministic, fast and easy to
//! audit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ParticipantBalance, ResultEngine};

/// One suggested transfer of a settlement plan.
///
/// Plan items are ephemeral suggestions regenerated on every call; their
/// identity for matching purposes is the `(from, to, amount)` tuple, never a
/// stored id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: Money,
}

/// Derive a settlement plan from net balances.
///
/// Debtors and creditors are each sorted descending by magnitude with a
/// participant-id tie-break, so equal inputs always produce the same plan.
/// The largest debtor repeatedly pays the largest creditor until both sides
/// are exhausted. At most `debtors + creditors - 1` transfers are emitted.
///
/// Balances are expected to sum to (approximately) zero. A residue larger
/// than one minor unit per participant indicates corrupted upstream data and
/// is returned as [`EngineError::Integrity`] rather than hidden in a wrong
/// plan. A residue within that tolerance is dropped from the longer side
/// with a warning.
pub fn compute_plan(balances: &[ParticipantBalance]) -> ResultEngine<Vec<PlanItem>> {
    let residue: Money = balances.iter().map(|b| b.balance).sum();
    let tolerance = balances.len() as i64;
    if residue.abs().minor() > tolerance {
        return Err(EngineError::Integrity(format!(
            "balances sum to {residue}, beyond rounding tolerance"
        )));
    }

    let mut debtors: Vec<(Uuid, Money)> = balances
        .iter()
        .filter(|b| b.balance.is_negative())
        .map(|b| (b.participant_id, b.balance.abs()))
        .collect();
    let mut creditors: Vec<(Uuid, Money)> = balances
        .iter()
        .filter(|b| b.balance.is_positive())
        .map(|b| (b.participant_id, b.balance))
        .collect();

    debtors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    creditors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut plan = Vec::new();
    let mut d = 0;
    let mut c = 0;
    while d < debtors.len() && c < creditors.len() {
        let transfer = debtors[d].1.min(creditors[c].1);
        if transfer.is_positive() {
            plan.push(PlanItem {
                from: debtors[d].0,
                to: creditors[c].0,
                amount: transfer,
            });
        }
        debtors[d].1 -= transfer;
        creditors[c].1 -= transfer;
        if debtors[d].1.is_zero() {
            d += 1;
        }
        if creditors[c].1.is_zero() {
            c += 1;
        }
    }

    // Within tolerance one side may retain a few minor units of rounding
    // residue; drop it rather than emit dust transfers, but never silently.
    let leftover: Money = debtors[d..]
        .iter()
        .chain(creditors[c..].iter())
        .map(|(_, amount)| *amount)
        .sum();
    if !leftover.is_zero() {
        tracing::warn!(
            leftover = leftover.minor(),
            "settlement plan dropped rounding residue"
        );
    }

    Ok(plan)
}
