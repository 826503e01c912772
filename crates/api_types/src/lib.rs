//! Wire types for the transport layer sitting in front of the engine.
//!
//! Field names follow the existing JSON contract of the share-bill API
//! (camelCase), so clients keep working unchanged. Request types convert
//! into engine inputs; view types are built from engine outputs plus the
//! participant list for name resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use engine::Participant;

fn participant_name(participants: &[Participant], id: Uuid) -> String {
    participants
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

pub mod expense {
    use super::*;

    /// How the submitted expense is divided, flattened into the payload as
    /// `"splitMode": "equal" | "exact"`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "splitMode", rename_all = "camelCase")]
    pub enum Split {
        #[serde(rename_all = "camelCase")]
        Equal { participant_ids: Vec<Uuid> },
        #[serde(rename_all = "camelCase")]
        Exact { amounts: Vec<ExactShare> },
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExactShare {
        pub participant_id: Uuid,
        pub amount: i64,
    }

    /// Expense creation payload. Amounts are integer minor units.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub event_id: Uuid,
        pub description: String,
        pub amount: i64,
        pub payer_ids: Vec<Uuid>,
        #[serde(flatten)]
        pub split: Split,
    }

    /// One expense row as rendered in the event's expense list.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub description: String,
        pub amount: i64,
        /// `"shared"` or `"settlement"`.
        pub kind: String,
        /// Net contribution of the viewing participant for this record
        /// alone (paid minus owed).
        pub your_balance: i64,
    }

    impl ExpenseView {
        pub fn from_record(
            record: &engine::ExpenseRecord,
            viewer_id: Uuid,
        ) -> engine::ResultEngine<Self> {
            Ok(Self {
                id: record.id,
                description: record.description.clone(),
                amount: record.amount.minor(),
                kind: record.kind.as_str().to_string(),
                your_balance: record.net_for(viewer_id)?.minor(),
            })
        }
    }

    impl ExpenseNew {
        /// Convert into an engine draft; validation happens in
        /// `ExpenseDraft::build`, before anything reaches the calculator.
        #[must_use]
        pub fn into_draft(self) -> engine::ExpenseDraft {
            let split = match self.split {
                Split::Equal { participant_ids } => engine::SplitMode::Equal {
                    beneficiaries: participant_ids,
                },
                Split::Exact { amounts } => engine::SplitMode::Exact {
                    amounts: amounts
                        .into_iter()
                        .map(|share| (share.participant_id, engine::Money::new(share.amount)))
                        .collect(),
                },
            };
            engine::ExpenseDraft {
                event_id: self.event_id,
                description: self.description,
                amount: engine::Money::new(self.amount),
                payers: self
                    .payer_ids
                    .into_iter()
                    .map(engine::Payer::even)
                    .collect(),
                split,
            }
        }
    }
}

pub mod settlement {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SettlementParty {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettlementPlanView {
        pub from: SettlementParty,
        pub to: SettlementParty,
        pub amount: i64,
    }

    impl SettlementPlanView {
        #[must_use]
        pub fn from_item(item: &engine::PlanItem, participants: &[Participant]) -> Self {
            Self {
                from: SettlementParty {
                    id: item.from,
                    name: participant_name(participants, item.from),
                },
                to: SettlementParty {
                    id: item.to,
                    name: participant_name(participants, item.to),
                },
                amount: item.amount.minor(),
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantBalanceView {
        pub id: Uuid,
        pub name: String,
        pub total_paid: i64,
        pub total_benefit: i64,
        pub balance: i64,
        /// `"credit"` when the participant is owed money, `"debit"` when
        /// they owe.
        pub balance_type: String,
    }

    impl ParticipantBalanceView {
        #[must_use]
        pub fn from_balance(
            balance: &engine::ParticipantBalance,
            participants: &[Participant],
        ) -> Self {
            Self {
                id: balance.participant_id,
                name: participant_name(participants, balance.participant_id),
                total_paid: balance.total_paid.minor(),
                total_benefit: balance.total_benefit.minor(),
                balance: balance.balance.minor(),
                balance_type: if balance.balance.is_negative() {
                    "debit".to_string()
                } else {
                    "credit".to_string()
                },
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettlementEventView {
        pub id: Uuid,
        pub total_expenses: i64,
        pub average_per_person: i64,
        pub total_participants: usize,
        pub currency: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryMeta {
        pub generated_at: DateTime<Utc>,
    }

    /// Body of `GET /events/:eventId/summary`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventSummaryResponse {
        pub event: SettlementEventView,
        pub participants: Vec<ParticipantBalanceView>,
        pub settlement_plan: Vec<SettlementPlanView>,
        pub meta: SummaryMeta,
    }

    impl EventSummaryResponse {
        #[must_use]
        pub fn from_summary(
            summary: &engine::EventSummary,
            participants: &[Participant],
            generated_at: DateTime<Utc>,
        ) -> Self {
            Self {
                event: SettlementEventView {
                    id: summary.event_id,
                    total_expenses: summary.total_expenses.minor(),
                    average_per_person: summary.average_per_person.minor(),
                    total_participants: summary.total_participants,
                    currency: summary.currency.code().to_string(),
                },
                participants: summary
                    .balances
                    .iter()
                    .map(|balance| ParticipantBalanceView::from_balance(balance, participants))
                    .collect(),
                settlement_plan: summary
                    .plan
                    .iter()
                    .map(|item| SettlementPlanView::from_item(item, participants))
                    .collect(),
                meta: SummaryMeta { generated_at },
            }
        }
    }
}

pub mod payment {
    use super::*;
    use crate::settlement::SettlementParty;

    /// Body of `POST /events/:eventId/payment-requests`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentRequestNew {
        pub payer_id: Uuid,
        pub receiver_id: Uuid,
        pub amount: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentRequestView {
        pub id: Uuid,
        pub event_id: Uuid,
        pub payer: SettlementParty,
        pub receiver: SettlementParty,
        pub amount: i64,
        pub status: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl PaymentRequestView {
        #[must_use]
        pub fn from_request(
            request: &engine::PaymentRequest,
            participants: &[Participant],
        ) -> Self {
            Self {
                id: request.id,
                event_id: request.event_id,
                payer: SettlementParty {
                    id: request.payer_id,
                    name: participant_name(participants, request.payer_id),
                },
                receiver: SettlementParty {
                    id: request.receiver_id,
                    name: participant_name(participants, request.receiver_id),
                },
                amount: request.amount.minor(),
                status: request.status.as_str().to_string(),
                created_at: request.created_at,
                updated_at: request.updated_at,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Currency, ExpenseDraft, Money, compute_balances, compute_plan, event_summary};
    use serde_json::json;

    fn people() -> Vec<Participant> {
        vec![
            Participant::new("An").unwrap(),
            Participant::new("Binh").unwrap(),
        ]
    }

    #[test]
    fn expense_payload_round_trips_into_a_valid_draft() {
        let participants = people();
        let payload = json!({
            "eventId": Uuid::new_v4(),
            "description": "dinner",
            "amount": 300000,
            "payerIds": [participants[0].id],
            "splitMode": "equal",
            "participantIds": [participants[0].id, participants[1].id],
        });
        let parsed: expense::ExpenseNew = serde_json::from_value(payload).unwrap();
        let record = parsed.into_draft().build().unwrap();
        assert_eq!(record.amount, Money::new(300_000));
        assert_eq!(record.beneficiaries.len(), 2);
    }

    #[test]
    fn expense_view_carries_kind_and_viewer_balance() {
        let participants = people();
        let event = Uuid::new_v4();
        let record = ExpenseDraft::new(
            event,
            "dinner",
            Money::new(300_000),
            participants[0].id,
            engine::SplitMode::Equal {
                beneficiaries: participants.iter().map(|p| p.id).collect(),
            },
        )
        .build()
        .unwrap();

        let view = expense::ExpenseView::from_record(&record, participants[0].id).unwrap();
        assert_eq!(view.kind, "shared");
        assert_eq!(view.your_balance, 150_000);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["yourBalance"], 150_000);

        let settlement = engine::ExpenseRecord::settlement(
            event,
            participants[1].id,
            participants[0].id,
            Money::new(150_000),
        )
        .unwrap();
        let view = expense::ExpenseView::from_record(&settlement, participants[1].id).unwrap();
        assert_eq!(view.kind, "settlement");
        assert_eq!(view.your_balance, 150_000);
    }

    #[test]
    fn summary_response_keeps_the_contract_field_names() {
        let participants = people();
        let event = Uuid::new_v4();
        let expense = ExpenseDraft::new(
            event,
            "dinner",
            Money::new(300_000),
            participants[0].id,
            engine::SplitMode::Equal {
                beneficiaries: participants.iter().map(|p| p.id).collect(),
            },
        )
        .build()
        .unwrap();
        let summary = event_summary(event, Currency::Vnd, &participants, &[expense]).unwrap();
        let response =
            settlement::EventSummaryResponse::from_summary(&summary, &participants, Utc::now());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["event"]["totalExpenses"], 300_000);
        assert_eq!(value["event"]["currency"], "VND");
        assert_eq!(value["participants"][0]["totalPaid"], 300_000);
        assert_eq!(value["participants"][0]["totalBenefit"], 150_000);
        assert_eq!(value["participants"][0]["balanceType"], "credit");
        assert_eq!(value["participants"][1]["balanceType"], "debit");
        assert_eq!(value["settlementPlan"][0]["amount"], 150_000);
        assert_eq!(value["settlementPlan"][0]["from"]["name"], "Binh");
        assert!(value["meta"]["generatedAt"].is_string());
    }

    #[test]
    fn payment_request_payload_uses_camel_case_ids() {
        let payload = json!({
            "payerId": Uuid::new_v4(),
            "receiverId": Uuid::new_v4(),
            "amount": 250000,
        });
        let parsed: payment::PaymentRequestNew = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.amount, 250_000);
    }

    #[test]
    fn plan_view_resolves_names_from_the_roster() {
        let participants = people();
        let balances = compute_balances(&participants, &[]).unwrap();
        assert!(compute_plan(&balances).unwrap().is_empty());

        let item = engine::PlanItem {
            from: participants[1].id,
            to: participants[0].id,
            amount: Money::new(1000),
        };
        let view = settlement::SettlementPlanView::from_item(&item, &participants);
        assert_eq!(view.from.name, "Binh");
        assert_eq!(view.to.name, "An");
    }
}
