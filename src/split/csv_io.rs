//! CSV bindings for the split ledger: a per-partner export of every line and
//! an importer for bank-statement style extracts.

use chrono::{DateTime, NaiveDate, Utc};

use super::{
    line::{AccountLine, PartnerPayment},
    Partner, SplitAccount, SplitError, SplitResult,
};

const EXPORT_HEADERS: [&str; 6] = [
    "Accounting Date",
    "Invoice Date",
    "Description",
    "Category",
    "Amount",
    "Partner",
];

const IMPORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Number formats vary per bank; both separators are configurable.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub thousands_sep: char,
    pub decimal_sep: char,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            thousands_sep: '.',
            decimal_sep: ',',
        }
    }
}

/// Renders the account as CSV, one row per partner total of each line.
pub fn export_account(account: &SplitAccount) -> SplitResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|err| SplitError::Csv(err.to_string()))?;
    for line in &account.lines {
        let accounting = format_date(line.accounting_date);
        let invoice = format_date(Some(line.invoice_date));
        let category = line.tags.join(", ");
        for total in line.partner_totals() {
            let amount = format!("{:.2}", total.amount());
            let partner = account.partner_name(total.partner_id);
            writer
                .write_record([
                    accounting.as_str(),
                    invoice.as_str(),
                    line.name.as_str(),
                    category.as_str(),
                    amount.as_str(),
                    partner.as_str(),
                ])
                .map_err(|err| SplitError::Csv(err.to_string()))?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| SplitError::Csv(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| SplitError::Csv(err.to_string()))
}

/// Imports a bank-statement extract into the account.
///
/// Rows carrying a partner become contributions by that partner; rows
/// without become shared expenses split by the account's default weights.
/// Missing partners and tags are created on first sight. Returns the ids of
/// the created lines.
pub fn import_bank_statement(
    account: &mut SplitAccount,
    data: &str,
    options: &ImportOptions,
) -> SplitResult<Vec<uuid::Uuid>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let headers = reader
        .headers()
        .map_err(|err| SplitError::Csv(err.to_string()))?
        .clone();
    let column = |name: &str| headers.iter().position(|header| header.trim() == name);

    let operation_date = column("Operation Date");
    let value_date = column("Value Date");
    let description = column("Description");
    let category = column("Category");
    let amount_column = column("Amount")
        .ok_or_else(|| SplitError::Csv("missing `Amount` column".into()))?;
    let partner_column = column("Partner");

    let mut created = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| SplitError::Csv(err.to_string()))?;
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let amount_raw = field(Some(amount_column)).ok_or_else(|| {
            SplitError::Csv(format!("row {}: empty amount", row_index + 2))
        })?;
        let amount = parse_amount(amount_raw, options).ok_or_else(|| {
            SplitError::Csv(format!("row {}: bad amount `{}`", row_index + 2, amount_raw))
        })?;

        let mut line = AccountLine::new(field(description).unwrap_or_default());
        line.accounting_date = parse_date(field(operation_date))?;
        if let Some(date) = parse_date(field(value_date))? {
            line.invoice_date = date;
        }
        if let Some(tags) = field(category) {
            line.tags = tags
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect();
        }

        match field(partner_column) {
            Some(partner_name) => {
                // A named row is money put in by that partner, owed by nobody.
                let partner_id = match account.partner_by_name(partner_name) {
                    Some(partner) => partner.id,
                    None => {
                        let partner = Partner::new(partner_name);
                        let id = partner.id;
                        account.partners.push(partner);
                        id
                    }
                };
                line.payers = vec![PartnerPayment { partner_id, amount }];
                let id = line.id;
                account.lines.push(line);
                created.push(id);
            }
            None => {
                line.to_pay_amount = -amount;
                created.push(account.add_line(line));
            }
        }
    }
    account.touch();
    Ok(created)
}

fn parse_amount(raw: &str, options: &ImportOptions) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != options.thousands_sep)
        .map(|c| if c == options.decimal_sep { '.' } else { c })
        .collect();
    cleaned.trim().parse().ok()
}

fn parse_date(raw: Option<&str>) -> SplitResult<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let date = NaiveDate::parse_from_str(value, IMPORT_DATE_FORMAT)
                .map_err(|_| SplitError::Csv(format!("bad date `{}`", value)))?;
            let naive = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| SplitError::Csv(format!("bad date `{}`", value)))?;
            Ok(Some(DateTime::from_naive_utc_and_offset(naive, Utc)))
        }
    }
}

fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyCode;

    fn sample_account() -> SplitAccount {
        let mut account = SplitAccount::new("Trip", CurrencyCode::default());
        account.add_partner(Partner::new("Alice"), 1);
        account.add_partner(Partner::new("Bob"), 1);
        account
    }

    #[test]
    fn import_creates_shared_and_paying_lines() {
        let mut account = sample_account();
        let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
01/03/2024,02/03/2024,Supermarket,Food,\"-42,50\",
03/03/2024,03/03/2024,Top up,,\"100,00\",Alice
";
        let created =
            import_bank_statement(&mut account, data, &ImportOptions::default()).unwrap();
        assert_eq!(created.len(), 2);

        let shared = account.line(created[0]).unwrap();
        assert_eq!(shared.to_pay_amount, 42.5);
        assert_eq!(shared.tags, vec!["Food".to_string()]);
        assert_eq!(shared.weights.len(), 2);

        let paying = account.line(created[1]).unwrap();
        assert!(shared.accounting_date.is_some());
        assert_eq!(paying.paid_amount(), 100.0);
        assert!(paying.weights.is_empty());
    }

    #[test]
    fn import_creates_missing_partners_once() {
        let mut account = sample_account();
        let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
,,First,,\"10,00\",Carol
,,Second,,\"5,00\",Carol
";
        import_bank_statement(&mut account, data, &ImportOptions::default()).unwrap();
        let carols = account
            .partners
            .iter()
            .filter(|partner| partner.name == "Carol")
            .count();
        assert_eq!(carols, 1);
    }

    #[test]
    fn export_emits_one_row_per_partner_total() {
        let mut account = sample_account();
        let alice = account.partners[0].id;
        let mut line = AccountLine::expense("Dinner", 60.0);
        line.add_payer(alice, 60.0);
        line.tags = vec!["Food".into()];
        account.add_line(line);

        let rendered = export_account(&account).unwrap();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Accounting Date,Invoice Date,Description,Category,Amount,Partner"
        );
        let body: Vec<&str> = lines.collect();
        assert_eq!(body.len(), 2);
        assert!(body.iter().any(|row| row.contains("Alice") && row.contains("30.00")));
        assert!(body.iter().any(|row| row.contains("Bob") && row.contains("-30.00")));
    }

    #[test]
    fn bad_amount_is_rejected_with_row_number() {
        let mut account = sample_account();
        let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
,,Broken,,not-a-number,
";
        let err =
            import_bank_statement(&mut account, data, &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, SplitError::Csv(message) if message.contains("row 2")));
    }
}
