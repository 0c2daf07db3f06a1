use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{CommandEntry, CommandGroup, Position};
use crate::core::services::PaymentService;
use crate::domain::BillingMonth;

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "mark-paid",
            CommandGroup::Payments,
            "mark-paid <student#> [YYYY-MM]",
            "Record a student's payment for a month (default: this month)",
            cmd_mark_paid,
        )
        .positional(Position::Student),
        CommandEntry::new(
            "mark-unpaid",
            CommandGroup::Payments,
            "mark-unpaid <student#> [YYYY-MM]",
            "Remove a recorded payment (default: this month)",
            cmd_mark_unpaid,
        )
        .positional(Position::Student),
    ]
}

fn month_arg(context: &ShellContext, args: &[&str]) -> Result<BillingMonth, CommandError> {
    match args.get(1) {
        Some(raw) => Ok(BillingMonth::parse(raw)?),
        None => Ok(BillingMonth::of(context.today())),
    }
}

fn cmd_mark_paid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "mark-paid needs a student position")?;
    let id = context.student_id_at(args[0])?;
    let month = month_arg(context, args)?;
    context.mutate(|roster, _| Ok(PaymentService::mark_paid(roster, id, month)?))?;
    io::print_success(format!("Payment for {} recorded.", month.label()));
    Ok(())
}

fn cmd_mark_unpaid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "mark-unpaid needs a student position")?;
    let id = context.student_id_at(args[0])?;
    let month = month_arg(context, args)?;
    context.mutate(|roster, today| Ok(PaymentService::mark_unpaid(roster, id, month, today)?))?;
    io::print_success(format!("Payment for {} removed.", month.label()));
    Ok(())
}
