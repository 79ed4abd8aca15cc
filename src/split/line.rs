use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::balance::{PartnerTotal, TotalsAccumulator};

/// Relative share of a line owed by one partner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerWeight {
    pub partner_id: Uuid,
    pub weight: i32,
}

impl PartnerWeight {
    pub fn new(partner_id: Uuid) -> Self {
        Self {
            partner_id,
            weight: 1,
        }
    }

    pub fn with_weight(partner_id: Uuid, weight: i32) -> Self {
        Self { partner_id, weight }
    }
}

/// Amount a partner actually paid towards a line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerPayment {
    pub partner_id: Uuid,
    pub amount: f64,
}

/// A single expense or internal payment in a split account.
///
/// `weights` describe who owes a share of the line, `payers` who put money
/// in. All per-partner totals are derived on demand, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLine {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    pub invoice_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounting_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to_pay_amount: f64,
    /// Payment among partners in the same account, not counted for totals.
    #[serde(default)]
    pub is_payment: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub weights: Vec<PartnerWeight>,
    #[serde(default)]
    pub payers: Vec<PartnerPayment>,
}

impl AccountLine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            invoice_date: Utc::now(),
            accounting_date: None,
            to_pay_amount: 0.0,
            is_payment: false,
            tags: Vec::new(),
            weights: Vec::new(),
            payers: Vec::new(),
        }
    }

    /// A shared expense of `amount`, to be split by weights.
    pub fn expense(name: impl Into<String>, amount: f64) -> Self {
        let mut line = Self::new(name);
        line.to_pay_amount = amount;
        line
    }

    pub fn add_payer(&mut self, partner_id: Uuid, amount: f64) {
        self.payers.push(PartnerPayment { partner_id, amount });
    }

    /// Total amount paid in by all payers.
    pub fn paid_amount(&self) -> f64 {
        self.payers.iter().map(|payer| payer.amount).sum()
    }

    /// Net line amount: paid in minus to be paid out.
    pub fn amount(&self) -> f64 {
        self.paid_amount() - self.to_pay_amount
    }

    /// Amount distributed among the weighted partners.
    ///
    /// An explicit to-pay amount wins; otherwise whatever was paid in is
    /// shared (a fronted expense with no price tag of its own).
    pub fn amount_to_share(&self) -> f64 {
        if self.to_pay_amount != 0.0 {
            self.to_pay_amount
        } else {
            self.paid_amount()
        }
    }

    /// Derives this line's per-partner credit (paid) and debit (owed share).
    pub fn partner_totals(&self) -> Vec<PartnerTotal> {
        let mut acc = TotalsAccumulator::new();
        for (partner_id, share) in split_parts(&self.weights, self.amount_to_share()) {
            acc.add_debit(partner_id, share);
        }
        for payer in &self.payers {
            acc.add_credit(payer.partner_id, payer.amount);
        }
        acc.into_totals()
    }
}

/// Splits `amount` proportionally to the given weights.
///
/// The divisor is the sum of absolute weights so that negative weights keep
/// their sign in the result. An empty weight list shares nothing.
pub fn split_parts(weights: &[PartnerWeight], amount: f64) -> Vec<(Uuid, f64)> {
    if weights.is_empty() {
        return Vec::new();
    }
    let total_weight: i32 = weights.iter().map(|weight| weight.weight.abs()).sum();
    if total_weight == 0 {
        return Vec::new();
    }
    let part = amount / total_weight as f64;
    let mut shares: Vec<(Uuid, f64)> = Vec::with_capacity(weights.len());
    for weight in weights {
        let share = weight.weight as f64 * part;
        if let Some(existing) = shares.iter_mut().find(|(id, _)| *id == weight.partner_id) {
            existing.1 += share;
        } else {
            shares.push((weight.partner_id, share));
        }
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_by_weight() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let weights = vec![PartnerWeight::new(a), PartnerWeight::with_weight(b, 3)];
        let shares = split_parts(&weights, 100.0);
        assert_eq!(shares, vec![(a, 25.0), (b, 75.0)]);
    }

    #[test]
    fn empty_weights_share_nothing() {
        assert!(split_parts(&[], 100.0).is_empty());
    }

    #[test]
    fn negative_weights_keep_sign() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let weights = vec![
            PartnerWeight::with_weight(a, -1),
            PartnerWeight::with_weight(b, 1),
        ];
        let shares = split_parts(&weights, 100.0);
        assert_eq!(shares, vec![(a, -50.0), (b, 50.0)]);
    }

    #[test]
    fn expense_totals_combine_shares_and_payments() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut line = AccountLine::expense("drinks", 50.0);
        line.weights = vec![PartnerWeight::new(a), PartnerWeight::new(b)];
        line.add_payer(a, 50.0);

        let totals = line.partner_totals();
        let total_a = totals.iter().find(|t| t.partner_id == a).unwrap();
        assert_eq!(total_a.credit, 50.0);
        assert_eq!(total_a.debit, 25.0);
        assert_eq!(total_a.amount(), 25.0);
        let total_b = totals.iter().find(|t| t.partner_id == b).unwrap();
        assert_eq!(total_b.amount(), -25.0);
    }

    #[test]
    fn paid_amount_is_shared_when_no_price_set() {
        let a = Uuid::new_v4();
        let mut line = AccountLine::new("fronted");
        line.weights = vec![PartnerWeight::new(a)];
        line.add_payer(a, 30.0);
        assert_eq!(line.amount_to_share(), 30.0);
        assert_eq!(line.amount(), 30.0);
    }
}
