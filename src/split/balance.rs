use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived per-partner balance: what they paid in minus what they owe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerTotal {
    pub partner_id: Uuid,
    pub credit: f64,
    pub debit: f64,
}

impl PartnerTotal {
    pub fn new(partner_id: Uuid) -> Self {
        Self {
            partner_id,
            credit: 0.0,
            debit: 0.0,
        }
    }

    /// Signed balance: positive means the partner is owed money.
    pub fn amount(&self) -> f64 {
        self.credit - self.debit
    }
}

/// Accumulates per-partner credits and debits preserving first-seen order.
#[derive(Debug, Default)]
pub struct TotalsAccumulator {
    totals: Vec<PartnerTotal>,
}

impl TotalsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_credit(&mut self, partner_id: Uuid, amount: f64) {
        self.entry(partner_id).credit += amount;
    }

    pub fn add_debit(&mut self, partner_id: Uuid, amount: f64) {
        self.entry(partner_id).debit += amount;
    }

    pub fn merge(&mut self, other: &PartnerTotal) {
        let entry = self.entry(other.partner_id);
        entry.credit += other.credit;
        entry.debit += other.debit;
    }

    pub fn into_totals(self) -> Vec<PartnerTotal> {
        self.totals
    }

    fn entry(&mut self, partner_id: Uuid) -> &mut PartnerTotal {
        let index = match self
            .totals
            .iter()
            .position(|total| total.partner_id == partner_id)
        {
            Some(index) => index,
            None => {
                self.totals.push(PartnerTotal::new(partner_id));
                self.totals.len() - 1
            }
        };
        &mut self.totals[index]
    }
}
