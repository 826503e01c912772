//! Expense primitives.
//!
//! An `ExpenseRecord` is the canonical representation of one expense: an
//! amount, the payer(s) who fronted it and the weighted beneficiaries who owe
//! a share of it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    /// A shared expense logged by a user.
    Shared,
    /// A synthetic record materializing a confirmed payment request: the
    /// payer pays, the receiver is the sole beneficiary. Ingested by the
    /// balance calculator like any other record so confirmed payments reduce
    /// outstanding balances.
    Settlement,
}

impl ExpenseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Settlement => "settlement",
        }
    }
}

impl TryFrom<&str> for ExpenseKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "shared" => Ok(Self::Shared),
            "settlement" => Ok(Self::Settlement),
            other => Err(EngineError::Validation(format!(
                "invalid expense kind: {other}"
            ))),
        }
    }
}

/// One payer of an expense.
///
/// `amount` is the explicit portion this payer fronted. When `None` on every
/// payer, the expense amount is split evenly across payers. Explicit amounts
/// are all-or-nothing per expense and must sum to the expense amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub participant_id: Uuid,
    pub amount: Option<Money>,
}

impl Payer {
    #[must_use]
    pub fn even(participant_id: Uuid) -> Self {
        Self {
            participant_id,
            amount: None,
        }
    }

    #[must_use]
    pub fn exact(participant_id: Uuid, amount: Money) -> Self {
        Self {
            participant_id,
            amount: Some(amount),
        }
    }
}

/// One beneficiary of an expense with its relative weight.
///
/// Equal-split uses uniform weights; exact-split uses the literal entered
/// amounts (in minor units) as weights. The owed share is
/// `amount * weight / sum(weights)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub participant_id: Uuid,
    pub weight: i64,
}

impl Beneficiary {
    #[must_use]
    pub fn new(participant_id: Uuid, weight: i64) -> Self {
        Self {
            participant_id,
            weight,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub kind: ExpenseKind,
    pub description: String,
    pub amount: Money,
    pub payers: Vec<Payer>,
    pub beneficiaries: Vec<Beneficiary>,
}

impl ExpenseRecord {
    /// Create a validated expense record.
    ///
    /// Validation rules:
    /// - `amount` must be > 0
    /// - payers and beneficiaries must be non-empty, without duplicates
    /// - every beneficiary weight must be > 0
    /// - explicit payer amounts are all-or-nothing, each > 0, and must sum to
    ///   `amount` (never silently renormalized)
    pub fn new(
        event_id: Uuid,
        description: impl Into<String>,
        amount: Money,
        payers: Vec<Payer>,
        beneficiaries: Vec<Beneficiary>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation("amount must be > 0".to_string()));
        }
        if payers.is_empty() {
            return Err(EngineError::Validation(
                "expense needs at least one payer".to_string(),
            ));
        }
        if beneficiaries.is_empty() {
            return Err(EngineError::Validation(
                "expense needs at least one beneficiary".to_string(),
            ));
        }
        ensure_unique(payers.iter().map(|p| p.participant_id), "payer")?;
        ensure_unique(beneficiaries.iter().map(|b| b.participant_id), "beneficiary")?;

        for beneficiary in &beneficiaries {
            if beneficiary.weight <= 0 {
                return Err(EngineError::Validation(
                    "beneficiary weight must be > 0".to_string(),
                ));
            }
        }

        let explicit = payers.iter().filter(|p| p.amount.is_some()).count();
        if explicit != 0 {
            if explicit != payers.len() {
                return Err(EngineError::Validation(
                    "either every payer has an explicit amount or none does".to_string(),
                ));
            }
            let mut total = Money::ZERO;
            for payer in &payers {
                // `explicit == payers.len()` guarantees the amount is set.
                let portion = payer.amount.unwrap_or(Money::ZERO);
                if !portion.is_positive() {
                    return Err(EngineError::Validation(
                        "payer amount must be > 0".to_string(),
                    ));
                }
                total += portion;
            }
            if total != amount {
                return Err(EngineError::Validation(format!(
                    "payer amounts sum to {total}, expected {amount}"
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            kind: ExpenseKind::Shared,
            description: description.into(),
            amount,
            payers,
            beneficiaries,
        })
    }

    /// Create the synthetic record for a confirmed peer payment: `payer`
    /// hands `amount` to `receiver`, so the receiver carries the whole
    /// benefit.
    pub fn settlement(
        event_id: Uuid,
        payer: Uuid,
        receiver: Uuid,
        amount: Money,
    ) -> ResultEngine<Self> {
        if payer == receiver {
            return Err(EngineError::Validation(
                "payer and receiver must differ".to_string(),
            ));
        }
        let mut record = Self::new(
            event_id,
            "settlement payment",
            amount,
            vec![Payer::even(payer)],
            vec![Beneficiary::new(receiver, 1)],
        )?;
        record.kind = ExpenseKind::Settlement;
        Ok(record)
    }

    /// Credit per payer, in payer order.
    ///
    /// Explicit amounts are used as given; implicit mode splits the amount
    /// evenly, with the integer remainder assigned to the last payer so the
    /// credits sum exactly to the expense amount.
    ///
    /// Re-checks the explicit-sum invariant defensively; a mismatch at this
    /// point means the record was mutated after construction and is reported
    /// as an integrity violation.
    pub fn payer_credits(&self) -> ResultEngine<Vec<(Uuid, Money)>> {
        let explicit = self.payers.iter().filter(|p| p.amount.is_some()).count();
        if explicit != 0 && explicit != self.payers.len() {
            return Err(EngineError::Integrity(
                "mixed explicit and implicit payer amounts".to_string(),
            ));
        }
        if explicit != 0 && explicit == self.payers.len() {
            let mut credits = Vec::with_capacity(self.payers.len());
            let mut total = Money::ZERO;
            for payer in &self.payers {
                let portion = payer.amount.unwrap_or(Money::ZERO);
                total += portion;
                credits.push((payer.participant_id, portion));
            }
            if total != self.amount {
                return Err(EngineError::Integrity(format!(
                    "payer amounts sum to {total}, expected {}",
                    self.amount
                )));
            }
            return Ok(credits);
        }

        let n = self.payers.len() as i64;
        if n == 0 {
            return Err(EngineError::Integrity("expense has no payers".to_string()));
        }
        let base = Money::new(self.amount.minor() / n);
        let mut credits: Vec<(Uuid, Money)> = self
            .payers
            .iter()
            .map(|p| (p.participant_id, base))
            .collect();
        let assigned = Money::new(base.minor() * n);
        if let Some(last) = credits.last_mut() {
            last.1 += self.amount - assigned;
        }
        Ok(credits)
    }

    /// Owed share per beneficiary, in beneficiary order.
    ///
    /// Each share is `amount * weight / total_weight` rounded half-up; the
    /// accumulated rounding remainder lands on the last beneficiary so the
    /// shares sum exactly to the expense amount.
    pub fn beneficiary_shares(&self) -> ResultEngine<Vec<(Uuid, Money)>> {
        let total_weight: i64 = self.beneficiaries.iter().map(|b| b.weight).sum();
        if total_weight <= 0 {
            return Err(EngineError::Integrity(
                "beneficiary weights sum to zero".to_string(),
            ));
        }

        let mut shares = Vec::with_capacity(self.beneficiaries.len());
        let mut assigned = Money::ZERO;
        for (index, beneficiary) in self.beneficiaries.iter().enumerate() {
            let share = if index + 1 == self.beneficiaries.len() {
                self.amount - assigned
            } else {
                self.amount.share(beneficiary.weight, total_weight)
            };
            assigned += share;
            shares.push((beneficiary.participant_id, share));
        }
        Ok(shares)
    }

    /// Net contribution of one participant for this record alone
    /// (paid minus owed), the `yourBalance` figure shown per expense row.
    pub fn net_for(&self, participant_id: Uuid) -> ResultEngine<Money> {
        let paid: Money = self
            .payer_credits()?
            .into_iter()
            .filter(|(id, _)| *id == participant_id)
            .map(|(_, credit)| credit)
            .sum();
        let owed: Money = self
            .beneficiary_shares()?
            .into_iter()
            .filter(|(id, _)| *id == participant_id)
            .map(|(_, share)| share)
            .sum();
        Ok(paid - owed)
    }
}

fn ensure_unique(ids: impl Iterator<Item = Uuid>, label: &str) -> ResultEngine<()> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EngineError::Validation(format!(
                "duplicate {label}: {id}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn kind_round_trips_through_str() {
        assert_eq!(ExpenseKind::Shared.as_str(), "shared");
        assert_eq!(
            ExpenseKind::try_from("settlement").unwrap(),
            ExpenseKind::Settlement
        );
        assert!(ExpenseKind::try_from("refund").is_err());
    }

    #[test]
    fn rejects_non_positive_amount() {
        let p = ids(2);
        let result = ExpenseRecord::new(
            Uuid::new_v4(),
            "lunch",
            Money::ZERO,
            vec![Payer::even(p[0])],
            vec![Beneficiary::new(p[1], 1)],
        );
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn rejects_mismatched_explicit_payer_amounts() {
        let p = ids(2);
        let result = ExpenseRecord::new(
            Uuid::new_v4(),
            "taxi",
            Money::new(100),
            vec![
                Payer::exact(p[0], Money::new(60)),
                Payer::exact(p[1], Money::new(50)),
            ],
            vec![Beneficiary::new(p[0], 1), Beneficiary::new(p[1], 1)],
        );
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn rejects_mixed_explicit_and_implicit_payers() {
        let p = ids(2);
        let result = ExpenseRecord::new(
            Uuid::new_v4(),
            "taxi",
            Money::new(100),
            vec![Payer::exact(p[0], Money::new(100)), Payer::even(p[1])],
            vec![Beneficiary::new(p[0], 1)],
        );
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn even_payer_split_assigns_remainder_to_last() {
        let p = ids(3);
        let expense = ExpenseRecord::new(
            Uuid::new_v4(),
            "dinner",
            Money::new(100),
            vec![Payer::even(p[0]), Payer::even(p[1]), Payer::even(p[2])],
            vec![Beneficiary::new(p[0], 1)],
        )
        .unwrap();
        let credits = expense.payer_credits().unwrap();
        assert_eq!(credits[0].1, Money::new(33));
        assert_eq!(credits[1].1, Money::new(33));
        assert_eq!(credits[2].1, Money::new(34));
    }

    #[test]
    fn beneficiary_shares_sum_exactly_to_amount() {
        let p = ids(3);
        let expense = ExpenseRecord::new(
            Uuid::new_v4(),
            "groceries",
            Money::new(100),
            vec![Payer::even(p[0])],
            vec![
                Beneficiary::new(p[0], 1),
                Beneficiary::new(p[1], 1),
                Beneficiary::new(p[2], 1),
            ],
        )
        .unwrap();
        let shares = expense.beneficiary_shares().unwrap();
        let total: Money = shares.iter().map(|(_, s)| *s).sum();
        assert_eq!(total, Money::new(100));
    }

    #[test]
    fn net_for_combines_credit_and_share() {
        let p = ids(3);
        let expense = ExpenseRecord::new(
            Uuid::new_v4(),
            "hotel",
            Money::new(300_000),
            vec![Payer::even(p[0])],
            vec![
                Beneficiary::new(p[0], 1),
                Beneficiary::new(p[1], 1),
                Beneficiary::new(p[2], 1),
            ],
        )
        .unwrap();
        assert_eq!(expense.net_for(p[0]).unwrap(), Money::new(200_000));
        assert_eq!(expense.net_for(p[1]).unwrap(), Money::new(-100_000));
        assert_eq!(expense.net_for(Uuid::new_v4()).unwrap(), Money::ZERO);
    }

    #[test]
    fn settlement_record_transfers_whole_amount() {
        let p = ids(2);
        let record =
            ExpenseRecord::settlement(Uuid::new_v4(), p[0], p[1], Money::new(50_000)).unwrap();
        assert_eq!(record.kind, ExpenseKind::Settlement);
        assert_eq!(record.net_for(p[0]).unwrap(), Money::new(50_000));
        assert_eq!(record.net_for(p[1]).unwrap(), Money::new(-50_000));
        assert!(ExpenseRecord::settlement(Uuid::new_v4(), p[0], p[0], Money::new(1)).is_err());
    }
}
