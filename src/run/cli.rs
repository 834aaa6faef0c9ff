use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{self, flag_value, has_flag, positional};
use crate::db::Database;
use crate::error::LedgerError;
use crate::format::{format_amount, percent, progress_bar, truncate};
use crate::ledger::{self, BudgetState, BudgetUsage};
use crate::models::{Budget, Category, MovementKind, NewMovement, Period, User};
use crate::rollover;

/// Flags that take a value and never count as positional arguments.
const VALUE_FLAGS: &[&str] = &["--user", "--month"];

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "register" => cli_register(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledgerly {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "add" => with_user(rest, db, cli_add),
        "edit" => with_user(rest, db, cli_edit),
        "toggle" | "paid" => with_user(rest, db, cli_toggle),
        "delete" | "rm" => with_user(rest, db, cli_delete),
        "list" | "ls" => with_user(rest, db, cli_list),
        "months" => with_user(rest, db, cli_months),
        "summary" | "s" => with_user(rest, db, cli_summary),
        "rollover" => with_user(rest, db, cli_rollover),
        "budget" => with_user(rest, db, cli_budget),
        "budgets" => with_user(rest, db, cli_budgets),
        "subscriptions" | "subs" => with_user(rest, db, cli_subscriptions),
        "export" => with_user(rest, db, cli_export),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("Ledgerly — personal finance ledger");
    println!();
    println!("Usage: ledgerly <command> [args] [--user <email>]");
    println!();
    println!("Commands:");
    println!("  register <name> <email>                 Create an account");
    println!("  add <date> <category> <kind> <amount> <description>");
    println!("    --recurring                           Monthly bill, carried by rollover");
    println!("    --pending                             Not paid yet");
    println!("  edit <id> <date> <category> <kind> <amount> <description> [--recurring]");
    println!("  toggle <id>                             Flip paid/pending");
    println!("  delete <id>                             Delete a movement");
    println!("  list [YYYY-MM]                          List movements");
    println!("  months                                  List months with data");
    println!("  summary [YYYY-MM]                       Totals, spending and budgets");
    println!("  rollover <YYYY-MM> [--force]            Copy recurring bills into the next month");
    println!("  budget <category> <limit>               Set a monthly spending limit");
    println!("  budgets                                 List spending limits");
    println!("  subscriptions                           Monthly and yearly subscription cost");
    println!("  export [path] [--month YYYY-MM]         Export movements to CSV");
    println!("  --help, -h                              Show this help");
    println!("  --version, -V                           Show version");
    println!();
    println!("Dates are YYYY-MM-DD, kind is 'expense' or 'income', amounts are positive.");
    println!(
        "Categories: {}",
        Category::all()
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "Environment: {} (database), {} (email), {} (password), {} (log filter)",
        config::DB_ENV,
        config::USER_ENV,
        config::PASSWORD_ENV,
        config::LOG_ENV
    );
}

// ── Account ──────────────────────────────────────────────────

fn cli_register(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    if pos.len() < 2 {
        anyhow::bail!("Usage: ledgerly register <name> <email>");
    }
    let email = &pos[pos.len() - 1];
    let name = pos[..pos.len() - 1].join(" ");
    let password = config::password("Choose a password: ")?;

    let user = db.create_user(&name, email, &password)?;
    println!("Account created for {} <{}>", user.name, user.email);
    Ok(())
}

/// Resolve the acting user, then run `f` scoped to them.
fn with_user(
    args: &[String],
    db: &mut Database,
    f: fn(&[String], &mut Database, &User) -> Result<()>,
) -> Result<()> {
    let email = config::user_email(args).ok_or_else(|| {
        anyhow::anyhow!(
            "No user given. Pass --user <email> or set {}",
            config::USER_ENV
        )
    })?;
    let password = config::password(&format!("Password for {email}: "))?;
    let user = db.authenticate(&email, &password)?;
    tracing::debug!(owner = user.id, "authenticated");
    f(args, db, &user)
}

// ── Parsing ──────────────────────────────────────────────────

fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::validation(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

fn parse_category(s: &str) -> Result<Category, LedgerError> {
    Category::parse(s).ok_or_else(|| {
        LedgerError::validation(format!(
            "unknown category '{s}'. Choose one of: {}",
            Category::all()
                .iter()
                .map(Category::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

fn parse_kind(s: &str) -> Result<MovementKind, LedgerError> {
    MovementKind::parse(s)
        .ok_or_else(|| LedgerError::validation(format!("kind must be 'expense' or 'income', got '{s}'")))
}

/// Accepts `1,234.50` and `$12` as well as plain decimals. A comma is only
/// valid as a thousands separator between groups of three digits.
fn parse_amount(s: &str) -> Result<Decimal, LedgerError> {
    let invalid = || LedgerError::validation(format!("invalid amount '{s}'"));
    let trimmed = s.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if frac_part.contains(',') {
        return Err(invalid());
    }
    if int_part.contains(',') {
        let is_digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());
        let mut groups = int_part.split(',');
        let head = groups.next().unwrap_or_default();
        if head.len() > 3 || !is_digits(head) || !groups.all(|g| g.len() == 3 && is_digits(g)) {
            return Err(invalid());
        }
    }
    Decimal::from_str(&unsigned.replace(',', "")).map_err(|_| invalid())
}

fn parse_id(s: &str) -> Result<i64, LedgerError> {
    s.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| LedgerError::validation(format!("invalid id '{s}'")))
}

/// Fields shared by `add` and `edit`: date, category, kind, amount, description.
fn parse_entry(pos: &[String], is_recurring: bool, is_settled: bool) -> Result<NewMovement> {
    let description = pos[4..].join(" ");
    Ok(NewMovement::from_entry(
        parse_date(&pos[0])?,
        parse_category(&pos[1])?,
        &description,
        parse_kind(&pos[2])?,
        parse_amount(&pos[3])?,
        is_recurring,
        is_settled,
    )?)
}

/// Foreign or missing ids are reported, not treated as failures.
fn report_missing(result: Result<(), LedgerError>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(LedgerError::NotFound { id }) => {
            println!("No movement #{id}");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

// ── Movements ────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    if pos.len() < 5 {
        anyhow::bail!(
            "Usage: ledgerly add <YYYY-MM-DD> <category> <expense|income> <amount> <description> [--recurring] [--pending]"
        );
    }
    let movement = parse_entry(&pos, has_flag(args, "--recurring"), !has_flag(args, "--pending"))?;
    let id = db.add_movement(user.id, &movement)?;
    tracing::info!(owner = user.id, id, "added movement");
    println!(
        "Added #{id}: {} {} {} ({})",
        movement.occurred_on,
        movement.description,
        format_amount(movement.amount),
        movement.category
    );
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    if pos.len() < 6 {
        anyhow::bail!(
            "Usage: ledgerly edit <id> <YYYY-MM-DD> <category> <expense|income> <amount> <description> [--recurring]"
        );
    }
    let id = parse_id(&pos[0])?;
    // settled is not part of an edit; the store ignores it
    let fields = parse_entry(&pos[1..], has_flag(args, "--recurring"), false)?;
    if report_missing(db.update_movement(id, user.id, &fields))? {
        tracing::info!(owner = user.id, id, "edited movement");
        println!("Updated #{id}");
    }
    Ok(())
}

fn cli_toggle(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    let Some(raw_id) = pos.first() else {
        anyhow::bail!("Usage: ledgerly toggle <id>");
    };
    let id = parse_id(raw_id)?;
    let Some(current) = db.get_movement(id, user.id)? else {
        println!("No movement #{id}");
        return Ok(());
    };
    let settled = !current.is_settled;
    if report_missing(db.set_settled(id, user.id, settled))? {
        tracing::info!(owner = user.id, id, settled, "toggled settled flag");
        println!(
            "#{id} {} is now {}",
            current.description,
            if settled { "paid" } else { "pending" }
        );
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    let Some(raw_id) = pos.first() else {
        anyhow::bail!("Usage: ledgerly delete <id>");
    };
    let id = parse_id(raw_id)?;
    if report_missing(db.delete_movement(id, user.id))? {
        tracing::info!(owner = user.id, id, "deleted movement");
        println!("Deleted #{id}");
    }
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    let mut movements = db.list_movements(user.id)?;
    if let Some(raw) = pos.first() {
        let period: Period = raw.parse()?;
        movements = ledger::in_period(&movements, period);
    }
    if movements.is_empty() {
        println!("No movements");
        return Ok(());
    }

    println!(
        "{:<6} {:<10} {:<8} {:<24} {:<26} {:>14}",
        "ID", "Date", "Status", "Category", "Description", "Amount"
    );
    println!("{}", "─".repeat(93));
    for m in &movements {
        println!(
            "{:<6} {:<10} {:<8} {:<24} {:<26} {:>14}",
            m.id,
            m.occurred_on.format("%Y-%m-%d"),
            if m.is_settled { "paid" } else { "pending" },
            m.category,
            truncate(
                &if m.is_recurring {
                    format!("{} ↻", m.description)
                } else {
                    m.description.clone()
                },
                26
            ),
            format_amount(m.amount),
        );
    }
    Ok(())
}

fn cli_months(_args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let movements = db.list_movements(user.id)?;
    let periods = ledger::periods(&movements);
    if periods.is_empty() {
        println!("No movements yet");
    }
    for p in periods {
        println!("{p}");
    }
    Ok(())
}

fn cli_summary(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    let movements = db.list_movements(user.id)?;
    let period = match pos.first() {
        Some(raw) => raw.parse::<Period>()?,
        None => match ledger::periods(&movements).first() {
            Some(latest) => *latest,
            None => {
                println!("Welcome, {}! No movements yet. Start with `ledgerly add`.", user.name);
                return Ok(());
            }
        },
    };
    let budgets = db.list_budgets(user.id)?;
    let view = ledger::period_view(&movements, &budgets, period);

    println!("Ledgerly — {} — {}", user.name, view.period);
    println!("{}", "─".repeat(40));
    println!("  Income:       {}", format_amount(view.totals.income));
    println!("  Expenses:     {}", format_amount(view.totals.expense));
    println!("  Balance:      {}", format_amount(view.totals.balance));
    println!("  Outstanding:  {}", format_amount(view.totals.outstanding));
    println!("  Movements:    {}", view.movements.len());

    let ranked = view.spending_ranked();
    if !ranked.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, amount) in &ranked {
            println!("  {:<24} {}", category.as_str(), format_amount(*amount));
        }
    }

    if !view.budgets.is_empty() {
        println!();
        println!("Budgets:");
        for usage in &view.budgets {
            println!(
                "  {:<24} {}/{} {} {:>5} {}",
                usage.category.as_str(),
                format_amount(usage.consumed),
                format_amount(usage.limit_amount),
                progress_bar(usage.display_ratio(), 20),
                percent(usage.ratio),
                budget_note(usage),
            );
        }
    }
    Ok(())
}

fn budget_note(usage: &BudgetUsage) -> String {
    match usage.state() {
        BudgetState::Normal => String::new(),
        BudgetState::Warning => format!("(warning, {} left)", format_amount(usage.remaining())),
        BudgetState::OverBudget if usage.remaining() < Decimal::ZERO => {
            format!("(over budget by {})", format_amount(-usage.remaining()))
        }
        BudgetState::OverBudget => "(limit reached)".to_string(),
    }
}

fn cli_rollover(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    let Some(raw) = pos.first() else {
        anyhow::bail!("Usage: ledgerly rollover <YYYY-MM> [--force]");
    };
    let source: Period = raw.parse()?;
    let rolled = store_rollover(db, user.id, source, has_flag(args, "--force"))?;
    if rolled.added.is_empty() {
        println!("Nothing recurring in {source}");
        return Ok(());
    }

    println!(
        "Copied {} recurring bills from {source} into {} (pending):",
        rolled.added.len(),
        rolled.target
    );
    for (id, draft) in &rolled.added {
        println!(
            "  #{id} {} {} {}",
            draft.occurred_on,
            draft.description,
            format_amount(draft.amount)
        );
    }
    Ok(())
}

struct RolledOver {
    target: Period,
    added: Vec<(i64, NewMovement)>,
}

/// Roll `owner`'s recurring bills from `source` into the next month and store
/// them. Refuses when some of them already exist there, unless `force`.
fn store_rollover(db: &mut Database, owner: i64, source: Period, force: bool) -> Result<RolledOver> {
    let target = source
        .next()
        .ok_or_else(|| anyhow::anyhow!("Cannot roll past {source}"))?;

    let movements = db.list_movements(owner)?;
    let drafts = rollover::roll_forward(owner, &movements, source);
    if drafts.is_empty() {
        return Ok(RolledOver {
            target,
            added: Vec::new(),
        });
    }

    let existing = rollover::existing_in_target(&drafts, &movements);
    if existing > 0 && !force {
        tracing::warn!(owner, %source, existing, "refusing repeated rollover");
        anyhow::bail!(
            "{existing} of {} bills from {source} already exist in {target}. Rerun with --force to add them anyway",
            drafts.len()
        );
    }

    let ids = db
        .add_movements(owner, &drafts)
        .with_context(|| format!("Rollover from {source} failed, nothing was added"))?;
    tracing::info!(owner, %source, count = ids.len(), "rolled recurring bills forward");
    Ok(RolledOver {
        target,
        added: ids.into_iter().zip(drafts).collect(),
    })
}

// ── Budgets ──────────────────────────────────────────────────

fn cli_budget(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let pos = positional(args, VALUE_FLAGS);
    if pos.len() < 2 {
        anyhow::bail!("Usage: ledgerly budget <category> <limit>. Example: ledgerly budget Food 500");
    }

    // Last token is the amount, everything before is the category name
    let limit = parse_amount(&pos[pos.len() - 1])?;
    let category = parse_category(&pos[..pos.len() - 1].join(" "))?;
    let budget = Budget::new(user.id, category, limit)?;
    db.set_limit(&budget)?;
    tracing::info!(owner = user.id, %category, "saved budget");
    println!("Budget set: {category} = {}", format_amount(limit));
    Ok(())
}

fn cli_budgets(_args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let budgets = db.list_budgets(user.id)?;
    if budgets.is_empty() {
        println!("No budgets. Use `ledgerly budget <category> <limit>` to set one");
        println!(
            "Budgetable categories: {}",
            Category::budgetable()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Ok(());
    }
    for b in &budgets {
        println!("  {:<24} {}", b.category.as_str(), format_amount(b.limit_amount));
    }
    Ok(())
}

// ── Reports ──────────────────────────────────────────────────

fn cli_subscriptions(_args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let movements = db.list_movements(user.id)?;
    let Some(summary) = ledger::subscription_summary(&movements) else {
        println!("No '{}' movements found", Category::Subscriptions);
        return Ok(());
    };

    println!("Subscriptions — {}", summary.period);
    println!("{}", "─".repeat(40));
    println!("  Monthly total:     {}", format_amount(summary.monthly_cost));
    println!("  Estimated yearly:  {}", format_amount(summary.annual_estimate));
    println!();
    for m in &summary.items {
        println!(
            "  {:<10} {:<26} {}",
            m.occurred_on.format("%Y-%m-%d"),
            truncate(&m.description, 26),
            format_amount(m.amount)
        );
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let month = flag_value(args, "--month")
        .map(|m| m.parse::<Period>())
        .transpose()?;

    let output_path = positional(args, VALUE_FLAGS)
        .first()
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let suffix = month.map_or_else(|| "all".to_string(), |m| m.to_string());
            PathBuf::from(format!("{home}/ledgerly-export-{suffix}.csv"))
        });

    let mut movements = db.list_movements(user.id)?;
    if let Some(period) = month {
        movements = ledger::in_period(&movements, period);
    }
    if movements.is_empty() {
        println!("No movements to export");
        return Ok(());
    }
    let count = crate::export::write_csv(&output_path, &movements)?;
    println!("Exported {count} movements to {}", output_path.display());
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
