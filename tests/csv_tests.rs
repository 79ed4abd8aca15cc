//! CSV import/export over full accounts.

use splitmatch::currency::CurrencyCode;
use splitmatch::split::{
    csv_io::{export_account, import_bank_statement, ImportOptions},
    AccountLine, Partner, SplitAccount,
};

fn trip_account() -> SplitAccount {
    let mut account = SplitAccount::new("Trip", CurrencyCode::new("EUR"));
    account.add_partner(Partner::new("Alice"), 1);
    account.add_partner(Partner::new("Bob"), 1);
    account
}

#[test]
fn export_writes_the_expected_header() {
    let account = trip_account();
    let data = export_account(&account).unwrap();
    assert!(data.starts_with(
        "Accounting Date,Invoice Date,Description,Category,Amount,Partner"
    ));
}

#[test]
fn export_emits_one_row_per_partner_and_line() {
    let mut account = trip_account();
    let alice = account.partner_by_name("Alice").unwrap().id;
    let mut fuel = AccountLine::expense("Fuel", 60.0);
    fuel.add_payer(alice, 60.0);
    fuel.tags = vec!["Transport".into()];
    account.add_line(fuel);

    let data = export_account(&account).unwrap();
    let rows: Vec<&str> = data.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|row| row.contains("Alice") && row.contains("30.00")));
    assert!(rows.iter().any(|row| row.contains("Bob") && row.contains("-30.00")));
    assert!(rows.iter().all(|row| row.contains("Transport")));
}

#[test]
fn bank_import_handles_european_number_format() {
    let mut account = trip_account();
    let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
05/02/2024,06/02/2024,Hotel,\"Lodging, Holiday\",\"-1.234,56\",
07/02/2024,07/02/2024,Deposit,,\"1.000,00\",Bob
";
    let created = import_bank_statement(&mut account, data, &ImportOptions::default()).unwrap();
    assert_eq!(created.len(), 2);

    let hotel = account.line(created[0]).unwrap();
    assert_eq!(hotel.to_pay_amount, 1234.56);
    assert_eq!(
        hotel.tags,
        vec!["Lodging".to_string(), "Holiday".to_string()]
    );
    // Shared rows inherit the account's default weights.
    assert_eq!(hotel.weights.len(), 2);

    let deposit = account.line(created[1]).unwrap();
    assert_eq!(deposit.paid_amount(), 1000.0);
    assert!(deposit.weights.is_empty());
}

#[test]
fn bank_import_with_us_separators() {
    let mut account = trip_account();
    let options = ImportOptions {
        thousands_sep: ',',
        decimal_sep: '.',
    };
    let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
,,Dinner,,\"-1,250.75\",
";
    let created = import_bank_statement(&mut account, data, &options).unwrap();
    assert_eq!(account.line(created[0]).unwrap().to_pay_amount, 1250.75);
}

#[test]
fn bank_import_rejects_rows_without_amounts() {
    let mut account = trip_account();
    let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
,,Mystery,,,
";
    let err = import_bank_statement(&mut account, data, &ImportOptions::default()).unwrap_err();
    assert!(err.to_string().contains("row 2"));
}

#[test]
fn imported_expenses_flow_into_balances() {
    let mut account = trip_account();
    let data = "\
Operation Date,Value Date,Description,Category,Amount,Partner
,,Groceries,,\"-30,00\",
,,Top up,,\"30,00\",Alice
";
    import_bank_statement(&mut account, data, &ImportOptions::default()).unwrap();

    let alice = account.partner_by_name("Alice").unwrap().id;
    let bob = account.partner_by_name("Bob").unwrap().id;
    assert_eq!(account.partner_total(alice).unwrap().amount(), 15.0);
    assert_eq!(account.partner_total(bob).unwrap().amount(), -15.0);
}
