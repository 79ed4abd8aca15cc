use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{self, CurrencyCode};

use super::{
    balance::{PartnerTotal, TotalsAccumulator},
    line::{AccountLine, PartnerPayment, PartnerWeight},
    netting, Partner, SplitError, SplitResult, Transfer,
};

/// A netting transfer waiting to be confirmed by the partners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentProposal {
    pub id: Uuid,
    pub from_partner_id: Uuid,
    pub to_partner_id: Uuid,
    pub amount: f64,
}

/// A shared ledger grouping expenses and payments among partners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitAccount {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub partners: Vec<Partner>,
    /// Default shares applied to new lines that carry no explicit weights.
    #[serde(default)]
    pub default_weights: Vec<PartnerWeight>,
    #[serde(default)]
    pub lines: Vec<AccountLine>,
    #[serde(default)]
    pub proposals: Vec<PaymentProposal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SplitAccount {
    pub fn new(name: impl Into<String>, currency: CurrencyCode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency,
            partners: Vec::new(),
            default_weights: Vec::new(),
            lines: Vec::new(),
            proposals: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Registers a partner with the given default weight.
    pub fn add_partner(&mut self, partner: Partner, weight: i32) -> Uuid {
        let id = partner.id;
        self.partners.push(partner);
        self.default_weights
            .push(PartnerWeight::with_weight(id, weight));
        self.touch();
        id
    }

    pub fn partner(&self, id: Uuid) -> Option<&Partner> {
        self.partners.iter().find(|partner| partner.id == id)
    }

    pub fn partner_by_name(&self, name: &str) -> Option<&Partner> {
        self.partners.iter().find(|partner| partner.name == name)
    }

    pub fn partner_name(&self, id: Uuid) -> String {
        self.partner(id)
            .map(|partner| partner.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Appends a line; lines without explicit weights inherit the account
    /// defaults.
    pub fn add_line(&mut self, mut line: AccountLine) -> Uuid {
        if line.weights.is_empty() && !line.is_payment {
            line.weights = self.default_weights.clone();
        }
        let id = line.id;
        self.lines.push(line);
        self.touch();
        id
    }

    pub fn line(&self, id: Uuid) -> Option<&AccountLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn line_mut(&mut self, id: Uuid) -> Option<&mut AccountLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    pub fn rounding(&self) -> f64 {
        self.currency.rounding()
    }

    /// Account total excluding internal payments.
    pub fn total_amount(&self) -> f64 {
        self.lines
            .iter()
            .filter(|line| !line.is_payment)
            .map(|line| line.amount())
            .sum()
    }

    /// Derives the per-partner balances over every line of the account.
    pub fn partner_totals(&self) -> Vec<PartnerTotal> {
        let mut acc = TotalsAccumulator::new();
        for line in &self.lines {
            for total in line.partner_totals() {
                acc.merge(&total);
            }
        }
        acc.into_totals()
    }

    pub fn partner_total(&self, partner_id: Uuid) -> Option<PartnerTotal> {
        self.partner_totals()
            .into_iter()
            .find(|total| total.partner_id == partner_id)
    }

    /// Replaces the current proposals with a fresh netting of the balances.
    pub fn generate_payment_proposals(&mut self) -> &[PaymentProposal] {
        let totals = self.partner_totals();
        let transfers = netting::propose_payments(&totals, self.rounding());
        self.proposals = transfers
            .into_iter()
            .map(|Transfer { from, to, amount }| PaymentProposal {
                id: Uuid::new_v4(),
                from_partner_id: from,
                to_partner_id: to,
                amount,
            })
            .collect();
        self.touch();
        &self.proposals
    }

    /// Confirms a proposal: records it as an internal-payment line and
    /// removes it from the proposal list.
    ///
    /// The payment credits the payer and debits the receiver, so re-deriving
    /// the balances afterwards shows the debt as settled.
    pub fn settle_proposal(&mut self, proposal_id: Uuid) -> SplitResult<Uuid> {
        let index = self
            .proposals
            .iter()
            .position(|proposal| proposal.id == proposal_id)
            .ok_or(SplitError::UnknownProposal(proposal_id))?;
        let proposal = self.proposals.remove(index);

        let amount = currency::round_to(proposal.amount, self.rounding());
        let mut line = AccountLine::new(format!(
            "{} gives {} to {}",
            self.partner_name(proposal.from_partner_id),
            currency::format_amount(amount, &self.currency),
            self.partner_name(proposal.to_partner_id),
        ));
        line.is_payment = true;
        line.payers = vec![PartnerPayment {
            partner_id: proposal.from_partner_id,
            amount: proposal.amount,
        }];
        line.weights = vec![PartnerWeight::new(proposal.to_partner_id)];
        Ok(self.add_line(line))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
