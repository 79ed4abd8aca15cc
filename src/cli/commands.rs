use std::fs;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{
    config::ConfigManager,
    core::{Workspace, WorkspaceManager},
    currency::{self, CurrencyCode},
    split::{
        csv_io::{self, ImportOptions},
        AccountLine, Partner, SplitAccount, SplitError,
    },
    storage::JsonStorage,
    tournament::{signup, Court, Tournament},
};

use super::{output, CliError};

/// Entry point of the command-line binary. Returns the process exit code.
pub fn run() -> i32 {
    crate::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match dispatch(&args) {
        Ok(()) => 0,
        Err(err) => {
            output::error(&err);
            1
        }
    }
}

fn dispatch(args: &[String]) -> Result<(), CliError> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];
    match command.as_str() {
        "init" => cmd_init(rest),
        "accounts" => cmd_accounts(rest),
        "balances" => cmd_balances(rest),
        "propose" => cmd_propose(rest),
        "settle" => cmd_settle(rest),
        "export-csv" => cmd_export_csv(rest),
        "import-bank" => cmd_import_bank(rest),
        "tournaments" => cmd_tournaments(rest),
        "schedule" => cmd_schedule(rest),
        "standings" => cmd_standings(rest),
        "import-teams" => cmd_import_teams(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(CliError::Usage(format!(
            "unknown command `{other}`; run `help` for usage"
        ))),
    }
}

fn print_usage() {
    output::section("splitmatch");
    println!("  init <workspace>                          create and open a workspace");
    println!("  accounts [list]                           list split accounts");
    println!("  accounts add <name>                       create a split account");
    println!("  accounts partner <account> <name> [w]     register a partner (default weight 1)");
    println!("  accounts expense <account> <desc> <amount> <payer>");
    println!("  balances <account>                        per-partner balances");
    println!("  propose <account>                         net balances into payment proposals");
    println!("  settle <account> <n>                      confirm proposal number n");
    println!("  export-csv <account> <file>               export lines to CSV");
    println!("  import-bank <account> <file>              import a bank statement CSV");
    println!("  tournaments [list]                        list tournaments");
    println!("  tournaments add <name> [start]            create a tournament (start: YYYY-MM-DD HH:MM)");
    println!("  tournaments court <tournament> <name>     add a court");
    println!("  schedule <tournament>                     generate the match schedule");
    println!("  standings <tournament>                    print the ranking");
    println!("  import-teams <file>                       import signup CSV into tournaments");
}

fn open_manager() -> Result<WorkspaceManager, CliError> {
    let config = ConfigManager::new()?.load()?;
    let storage = JsonStorage::new(None, Some(config.backup_retention))?;
    Ok(WorkspaceManager::new(Box::new(storage)))
}

fn current_mut(manager: &mut WorkspaceManager) -> Result<&mut Workspace, CliError> {
    manager
        .current
        .as_mut()
        .ok_or_else(|| CliError::Usage("no workspace loaded".into()))
}

fn load_current() -> Result<WorkspaceManager, CliError> {
    let mut manager = open_manager()?;
    let name = manager.last_opened()?.ok_or_else(|| {
        CliError::Usage("no workspace opened; run `init <name>` first".into())
    })?;
    manager.load(&name)?;
    Ok(manager)
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, CliError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing argument <{name}>")))
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, CliError> {
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    Err(CliError::Usage(format!(
        "cannot parse `{raw}` as a date; expected YYYY-MM-DD HH:MM"
    )))
}

fn cmd_init(args: &[String]) -> Result<(), CliError> {
    let name = arg(args, 0, "workspace")?;
    let mut manager = open_manager()?;
    manager.set_current(Workspace::new(name), None);
    manager.save_as(name)?;
    manager.record_last_opened(Some(name))?;
    output::success(format!("workspace `{name}` created and opened"));
    Ok(())
}

fn workspace_account<'a>(
    workspace: &'a mut Workspace,
    name: &str,
) -> Result<&'a mut SplitAccount, CliError> {
    workspace
        .account_by_name_mut(name)
        .ok_or_else(|| CliError::Usage(format!("account `{name}` not found")))
}

fn workspace_tournament<'a>(
    workspace: &'a mut Workspace,
    name: &str,
) -> Result<&'a mut Tournament, CliError> {
    workspace
        .tournament_by_name_mut(name)
        .ok_or_else(|| CliError::Usage(format!("tournament `{name}` not found")))
}

fn cmd_accounts(args: &[String]) -> Result<(), CliError> {
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    match args.first().map(String::as_str) {
        None | Some("list") => {
            output::section("Accounts");
            for account in &workspace.accounts {
                println!(
                    "  {:<24} {:>3} partners {:>4} lines  total {}",
                    account.name,
                    account.partners.len(),
                    account.lines.len(),
                    currency::format_amount(account.total_amount(), &account.currency),
                );
            }
            Ok(())
        }
        Some("add") => {
            let name = arg(args, 1, "name")?;
            if workspace.account_by_name(name).is_some() {
                return Err(CliError::Usage(format!("account `{name}` already exists")));
            }
            let config = ConfigManager::new()?.load()?;
            workspace
                .accounts
                .push(SplitAccount::new(name, CurrencyCode::new(config.currency)));
            workspace.touch();
            manager.save()?;
            output::success(format!("account `{name}` created"));
            Ok(())
        }
        Some("partner") => {
            let account_name = arg(args, 1, "account")?.to_string();
            let partner_name = arg(args, 2, "name")?.to_string();
            let weight: i32 = match args.get(3) {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| CliError::Usage(format!("bad weight `{raw}`")))?,
                None => 1,
            };
            let account = workspace_account(workspace, &account_name)?;
            account.add_partner(Partner::new(&partner_name), weight);
            workspace.touch();
            manager.save()?;
            output::success(format!(
                "partner `{partner_name}` added to `{account_name}` with weight {weight}"
            ));
            Ok(())
        }
        Some("expense") => {
            let account_name = arg(args, 1, "account")?.to_string();
            let description = arg(args, 2, "description")?.to_string();
            let amount: f64 = arg(args, 3, "amount")?
                .parse()
                .map_err(|_| CliError::Usage("bad amount".into()))?;
            let payer_name = arg(args, 4, "payer")?.to_string();
            let account = workspace_account(workspace, &account_name)?;
            let payer = account
                .partner_by_name(&payer_name)
                .map(|partner| partner.id)
                .ok_or_else(|| {
                    CliError::Split(SplitError::UnknownPartnerName(payer_name.clone()))
                })?;
            let mut line = AccountLine::expense(&description, amount);
            line.add_payer(payer, amount);
            account.add_line(line);
            workspace.touch();
            manager.save()?;
            output::success(format!("expense `{description}` recorded"));
            Ok(())
        }
        Some(other) => Err(CliError::Usage(format!(
            "unknown accounts action `{other}`"
        ))),
    }
}

fn cmd_balances(args: &[String]) -> Result<(), CliError> {
    let account_name = arg(args, 0, "account")?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let account = workspace_account(workspace, account_name)?;
    output::section(format!("Balances of {}", account.name));
    println!(
        "  {:<20} {:>12} {:>12} {:>12}",
        "Partner", "Paid", "Owes", "Balance"
    );
    for total in account.partner_totals() {
        println!(
            "  {:<20} {:>12} {:>12} {:>12}",
            account.partner_name(total.partner_id),
            currency::format_amount(total.credit, &account.currency),
            currency::format_amount(total.debit, &account.currency),
            currency::format_amount(total.amount(), &account.currency),
        );
    }
    Ok(())
}

fn cmd_propose(args: &[String]) -> Result<(), CliError> {
    let account_name = arg(args, 0, "account")?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let account = workspace_account(workspace, account_name)?;
    account.generate_payment_proposals();
    print_proposals(account);
    workspace.touch();
    manager.save()?;
    Ok(())
}

fn print_proposals(account: &SplitAccount) {
    output::section(format!("Proposals for {}", account.name));
    if account.proposals.is_empty() {
        output::info("all settled, nothing to pay");
        return;
    }
    for (index, proposal) in account.proposals.iter().enumerate() {
        println!(
            "  {}. {} gives {} to {}",
            index + 1,
            account.partner_name(proposal.from_partner_id),
            currency::format_amount(proposal.amount, &account.currency),
            account.partner_name(proposal.to_partner_id),
        );
    }
}

fn cmd_settle(args: &[String]) -> Result<(), CliError> {
    let account_name = arg(args, 0, "account")?;
    let number: usize = arg(args, 1, "n")?
        .parse()
        .map_err(|_| CliError::Usage("proposal number must be a positive integer".into()))?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let account = workspace_account(workspace, account_name)?;
    let proposal_id = account
        .proposals
        .get(number.wrapping_sub(1))
        .map(|proposal| proposal.id)
        .ok_or_else(|| CliError::Usage(format!("no proposal number {number}")))?;
    let line_id = account.settle_proposal(proposal_id)?;
    let line_name = account
        .line(line_id)
        .map(|line| line.name.clone())
        .unwrap_or_default();
    workspace.touch();
    manager.save()?;
    output::success(format!("settled: {line_name}"));
    Ok(())
}

fn cmd_export_csv(args: &[String]) -> Result<(), CliError> {
    let account_name = arg(args, 0, "account")?;
    let path = arg(args, 1, "file")?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let account = workspace_account(workspace, account_name)?;
    let data = csv_io::export_account(account)?;
    fs::write(path, data)?;
    output::success(format!("account `{account_name}` exported to {path}"));
    Ok(())
}

fn cmd_import_bank(args: &[String]) -> Result<(), CliError> {
    let account_name = arg(args, 0, "account")?;
    let path = arg(args, 1, "file")?;
    let data = fs::read_to_string(path)?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let account = workspace_account(workspace, account_name)?;
    let created = csv_io::import_bank_statement(account, &data, &ImportOptions::default())?;
    workspace.touch();
    manager.save()?;
    output::success(format!("{} statement lines imported", created.len()));
    Ok(())
}

fn cmd_tournaments(args: &[String]) -> Result<(), CliError> {
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    match args.first().map(String::as_str) {
        None | Some("list") => {
            output::section("Tournaments");
            for tournament in &workspace.tournaments {
                println!(
                    "  {:<24} {:>3} teams {:>3} courts {:>4} matches",
                    tournament.name,
                    tournament.teams.len(),
                    tournament.courts.len(),
                    tournament.matches.len(),
                );
            }
            Ok(())
        }
        Some("add") => {
            let name = arg(args, 1, "name")?;
            if workspace.tournament_by_name(name).is_some() {
                return Err(CliError::Usage(format!(
                    "tournament `{name}` already exists"
                )));
            }
            let mut tournament = Tournament::new(name);
            if let Some(raw) = args.get(2) {
                tournament.start_time = Some(parse_datetime(raw)?);
            }
            workspace.tournaments.push(tournament);
            workspace.touch();
            manager.save()?;
            output::success(format!("tournament `{name}` created"));
            Ok(())
        }
        Some("court") => {
            let tournament_name = arg(args, 1, "tournament")?.to_string();
            let court_name = arg(args, 2, "name")?.to_string();
            let tournament = workspace_tournament(workspace, &tournament_name)?;
            tournament.add_court(Court::new(&court_name));
            workspace.touch();
            manager.save()?;
            output::success(format!(
                "court `{court_name}` added to `{tournament_name}`"
            ));
            Ok(())
        }
        Some(other) => Err(CliError::Usage(format!(
            "unknown tournaments action `{other}`"
        ))),
    }
}

fn cmd_schedule(args: &[String]) -> Result<(), CliError> {
    let tournament_name = arg(args, 0, "tournament")?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let tournament = workspace_tournament(workspace, tournament_name)?;
    let created = tournament.generate_matches()?;
    output::section(format!("Schedule of {}", tournament.name));
    let mut ordered: Vec<_> = tournament.matches.iter().collect();
    ordered.sort_by_key(|m| m.time_start);
    for match_ in ordered {
        let court = tournament
            .court(match_.court_id)
            .map(|court| court.name.clone())
            .unwrap_or_else(|| match_.court_id.to_string());
        println!(
            "  {:<30} {:<12} {} - {}",
            tournament.match_label(match_),
            court,
            match_.time_start.format("%Y-%m-%d %H:%M"),
            match_.time_end.format("%H:%M"),
        );
    }
    workspace.touch();
    manager.save()?;
    output::success(format!("{created} matches scheduled"));
    Ok(())
}

fn cmd_standings(args: &[String]) -> Result<(), CliError> {
    let tournament_name = arg(args, 0, "tournament")?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let tournament = workspace_tournament(workspace, tournament_name)?;
    let standings = tournament.standings()?;
    output::section(format!("Standings of {}", tournament.name));
    println!(
        "  {:<4} {:<20} {:>7} {:>5} {:>5} {:>7} {:>7}",
        "#", "Team", "Matches", "Won", "Lost", "Points", "Ratio"
    );
    for (position, row) in standings.iter().enumerate() {
        let team = tournament
            .team(row.team_id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| row.team_id.to_string());
        println!(
            "  {:<4} {:<20} {:>7} {:>5} {:>5} {:>7} {:>7.2}",
            position + 1,
            team,
            row.matches_played,
            row.won_sets,
            row.lost_sets,
            row.tournament_points,
            row.sets_ratio,
        );
    }
    Ok(())
}

fn cmd_import_teams(args: &[String]) -> Result<(), CliError> {
    let path = arg(args, 0, "file")?;
    let data = fs::read_to_string(path)?;
    let mut manager = load_current()?;
    let workspace = current_mut(&mut manager)?;
    let registered = signup::import_signups(&mut workspace.tournaments, &data)?;
    workspace.touch();
    manager.save()?;
    output::success(format!("{registered} teams registered"));
    Ok(())
}
