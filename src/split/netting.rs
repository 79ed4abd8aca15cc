//! Greedy debt netting: turns a set of signed balances into a short list of
//! transfers that zeroes every balance.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency;

use super::balance::PartnerTotal;

/// A proposed payment from a debtor to a creditor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: f64,
}

/// Nets the given balances into transfers.
///
/// Debtors are matched largest-debt-first against creditors smallest-credit
/// first; each pairing moves `min(credit, debt)`. The transfer count is
/// minimized by this heuristic, not provably optimal. Balances that round to
/// zero are skipped; a leftover residual (the balances not summing to zero)
/// is dropped after logging a warning.
pub fn propose_payments(totals: &[PartnerTotal], rounding: f64) -> Vec<Transfer> {
    let mut debtors: Vec<(Uuid, f64)> = totals
        .iter()
        .filter(|total| currency::compare(total.amount(), 0.0, rounding) == Ordering::Less)
        .map(|total| (total.partner_id, -total.amount()))
        .collect();
    debtors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut creditors: Vec<(Uuid, f64)> = totals
        .iter()
        .filter(|total| currency::compare(total.amount(), 0.0, rounding) != Ordering::Less)
        .map(|total| (total.partner_id, total.amount()))
        .collect();
    creditors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut transfers = Vec::new();
    for creditor_index in 0..creditors.len() {
        for debtor_index in 0..debtors.len() {
            let credit = creditors[creditor_index].1;
            let debt = debtors[debtor_index].1;
            let paid = credit.min(debt);
            if currency::compare(paid, 0.0, rounding) == Ordering::Greater {
                transfers.push(Transfer {
                    from: debtors[debtor_index].0,
                    to: creditors[creditor_index].0,
                    amount: paid,
                });
                creditors[creditor_index].1 -= paid;
                debtors[debtor_index].1 -= paid;
            }
        }
    }

    for (partner_id, residual) in debtors.iter().chain(creditors.iter()) {
        if !currency::is_zero(*residual, rounding) {
            tracing::warn!(
                partner = %partner_id,
                residual,
                "balances do not net to zero; dropping residual"
            );
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::DEFAULT_ROUNDING;

    fn total(partner_id: Uuid, amount: f64) -> PartnerTotal {
        let mut total = PartnerTotal::new(partner_id);
        if amount >= 0.0 {
            total.credit = amount;
        } else {
            total.debit = -amount;
        }
        total
    }

    #[test]
    fn nets_single_debtor_against_two_creditors() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let totals = vec![total(a, 37.5), total(b, -72.5), total(c, 35.0)];

        let transfers = propose_payments(&totals, DEFAULT_ROUNDING);
        assert_eq!(transfers.len(), 2);
        // Smallest creditor is served first.
        assert_eq!(transfers[0], Transfer { from: b, to: c, amount: 35.0 });
        assert_eq!(transfers[1], Transfer { from: b, to: a, amount: 37.5 });
    }

    #[test]
    fn transfers_negate_original_balances() {
        let partners: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let amounts = [120.0, -80.0, -55.5, 15.5];
        let totals: Vec<PartnerTotal> = partners
            .iter()
            .zip(amounts)
            .map(|(id, amount)| total(*id, amount))
            .collect();

        let transfers = propose_payments(&totals, DEFAULT_ROUNDING);
        for (partner, balance) in partners.iter().zip(amounts) {
            let received: f64 = transfers
                .iter()
                .filter(|t| t.to == *partner)
                .map(|t| t.amount)
                .sum();
            let sent: f64 = transfers
                .iter()
                .filter(|t| t.from == *partner)
                .map(|t| t.amount)
                .sum();
            assert!(
                (balance - (received - sent)).abs() < 1e-9,
                "partner balance {balance} not matched by net flow"
            );
        }
    }

    #[test]
    fn transfers_are_strictly_positive() {
        let totals = vec![
            total(Uuid::new_v4(), 0.004),
            total(Uuid::new_v4(), -0.004),
            total(Uuid::new_v4(), 0.0),
        ];
        assert!(propose_payments(&totals, DEFAULT_ROUNDING).is_empty());
    }

    #[test]
    fn lone_unmatched_balance_yields_no_transfers() {
        let totals = vec![total(Uuid::new_v4(), -10.0)];
        assert!(propose_payments(&totals, DEFAULT_ROUNDING).is_empty());
    }
}
