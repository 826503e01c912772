//! Balance calculator.
//!
//! Balances are never stored or incrementally maintained: every call replays
//! the full expense set, so there is no state to drift. The source of truth
//! is always "replay all expenses".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ExpenseRecord, Money, Participant, ResultEngine};

/// Net position of one participant across all expenses of an event.
///
/// Derived, not stored. `balance` is positive when the participant is owed
/// money and negative when they owe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub participant_id: Uuid,
    pub total_paid: Money,
    pub total_benefit: Money,
    pub balance: Money,
}

/// Compute every participant's net balance from the event's expense records.
///
/// Each payer is credited what they fronted; each beneficiary is debited its
/// weighted share. The output follows the order of `participants`, and a
/// participant with no expenses appears with zero balances.
///
/// Errors:
/// - [`EngineError::NotFound`] when an expense references a participant id
///   absent from `participants`
/// - [`EngineError::Integrity`] when a record violates its payer-sum or
///   weight invariants, or when the resulting balances fail to sum to zero
pub fn compute_balances(
    participants: &[Participant],
    expenses: &[ExpenseRecord],
) -> ResultEngine<Vec<ParticipantBalance>> {
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(participants.len());
    for (position, participant) in participants.iter().enumerate() {
        index.insert(participant.id, position);
    }

    let mut paid = vec![Money::ZERO; participants.len()];
    let mut benefit = vec![Money::ZERO; participants.len()];

    for expense in expenses {
        for (participant_id, credit) in expense.payer_credits()? {
            let position = index
                .get(&participant_id)
                .ok_or_else(|| EngineError::NotFound(format!("payer {participant_id}")))?;
            paid[*position] += credit;
        }
        for (participant_id, share) in expense.beneficiary_shares()? {
            let position = index
                .get(&participant_id)
                .ok_or_else(|| EngineError::NotFound(format!("beneficiary {participant_id}")))?;
            benefit[*position] += share;
        }
    }

    let balances: Vec<ParticipantBalance> = participants
        .iter()
        .enumerate()
        .map(|(position, participant)| ParticipantBalance {
            participant_id: participant.id,
            total_paid: paid[position],
            total_benefit: benefit[position],
            balance: paid[position] - benefit[position],
        })
        .collect();

    // Integer shares carry their remainder onto the last participant of each
    // record, so the sum is exactly zero for uncorrupted data.
    let residue: Money = balances.iter().map(|b| b.balance).sum();
    if !residue.is_zero() {
        return Err(EngineError::Integrity(format!(
            "balances sum to {residue}, expected 0"
        )));
    }

    Ok(balances)
}
