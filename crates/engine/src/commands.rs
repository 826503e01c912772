//! Command structs for building expense records from user submissions.
//!
//! These types group the parameters of an expense form (amount, payers,
//! split mode), keeping call sites readable and concentrating the
//! split-to-weights conversion in one place instead of at every caller.

use uuid::Uuid;

use crate::{Beneficiary, EngineError, ExpenseRecord, Money, Payer, ResultEngine};

/// How an expense is divided among its beneficiaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitMode {
    /// Every listed beneficiary owes the same share (uniform weight 1).
    Equal { beneficiaries: Vec<Uuid> },
    /// Each beneficiary owes the literal amount entered for them; the
    /// amounts become the weights and must sum to the expense amount.
    Exact { amounts: Vec<(Uuid, Money)> },
}

/// A user-submitted expense, not yet validated.
#[derive(Clone, Debug)]
pub struct ExpenseDraft {
    pub event_id: Uuid,
    pub description: String,
    pub amount: Money,
    pub payers: Vec<Payer>,
    pub split: SplitMode,
}

impl ExpenseDraft {
    #[must_use]
    pub fn new(
        event_id: Uuid,
        description: impl Into<String>,
        amount: Money,
        paid_by: Uuid,
        split: SplitMode,
    ) -> Self {
        Self {
            event_id,
            description: description.into(),
            amount,
            payers: vec![Payer::even(paid_by)],
            split,
        }
    }

    /// Replace the single-payer default with an explicit payer list.
    #[must_use]
    pub fn payers(mut self, payers: Vec<Payer>) -> Self {
        self.payers = payers;
        self
    }

    /// Validate the draft and convert the split mode into beneficiary
    /// weights, producing a record the calculator can ingest.
    pub fn build(self) -> ResultEngine<ExpenseRecord> {
        let beneficiaries = match self.split {
            SplitMode::Equal { beneficiaries } => beneficiaries
                .into_iter()
                .map(|id| Beneficiary::new(id, 1))
                .collect(),
            SplitMode::Exact { amounts } => {
                let mut total = Money::ZERO;
                let mut beneficiaries = Vec::with_capacity(amounts.len());
                for (id, portion) in amounts {
                    if !portion.is_positive() {
                        return Err(EngineError::Validation(
                            "exact split amounts must be > 0".to_string(),
                        ));
                    }
                    total += portion;
                    beneficiaries.push(Beneficiary::new(id, portion.minor()));
                }
                if total != self.amount {
                    return Err(EngineError::Validation(format!(
                        "exact split amounts sum to {total}, expected {}",
                        self.amount
                    )));
                }
                beneficiaries
            }
        };

        ExpenseRecord::new(
            self.event_id,
            self.description,
            self.amount,
            self.payers,
            beneficiaries,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_split_uses_uniform_weights() {
        let payer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let record = ExpenseDraft::new(
            Uuid::new_v4(),
            "coffee",
            Money::new(90_000),
            payer,
            SplitMode::Equal {
                beneficiaries: vec![payer, other],
            },
        )
        .build()
        .unwrap();
        assert!(record.beneficiaries.iter().all(|b| b.weight == 1));
    }

    #[test]
    fn exact_split_turns_amounts_into_weights() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let record = ExpenseDraft::new(
            Uuid::new_v4(),
            "karaoke",
            Money::new(300_000),
            a,
            SplitMode::Exact {
                amounts: vec![(a, Money::new(100_000)), (b, Money::new(200_000))],
            },
        )
        .build()
        .unwrap();
        assert_eq!(record.beneficiaries[0].weight, 100_000);
        assert_eq!(record.beneficiaries[1].weight, 200_000);
    }

    #[test]
    fn payer_list_can_replace_the_single_payer_default() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let record = ExpenseDraft::new(
            Uuid::new_v4(),
            "fuel",
            Money::new(200_000),
            a,
            SplitMode::Equal {
                beneficiaries: vec![a, b],
            },
        )
        .payers(vec![Payer::even(a), Payer::even(b)])
        .build()
        .unwrap();
        assert_eq!(record.payers.len(), 2);
    }

    #[test]
    fn exact_split_must_cover_the_full_amount() {
        let a = Uuid::new_v4();
        let result = ExpenseDraft::new(
            Uuid::new_v4(),
            "karaoke",
            Money::new(300_000),
            a,
            SplitMode::Exact {
                amounts: vec![(a, Money::new(100_000))],
            },
        )
        .build();
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }
}
