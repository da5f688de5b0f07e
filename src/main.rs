use autoloan::format::currency;
use autoloan::loan::{payment_dates, LoanInputs, MAX_TERM_MONTHS};
use autoloan::{AmortizationResult, ScheduleEntry};
use chrono::NaiveDate;
use clap::Parser;
use log::{error, info};
use simple_logger::SimpleLogger;
use std::process::ExitCode;

/// Auto loan calculator: monthly payment, totals and remaining balance.
#[derive(Parser, Debug)]
#[command(name = "autoloan", version, about)]
struct Cli {
    /// Price of the vehicle
    #[arg(long)]
    auto_value: u64,

    /// Down payment
    #[arg(long, default_value_t = 0)]
    deposit: u64,

    /// Annual interest rate in percent, e.g. 5.5
    #[arg(long, default_value_t = 0., allow_negative_numbers = true)]
    rate: f64,

    /// Loan term in months
    #[arg(long, default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..=MAX_TERM_MONTHS as i64))]
    term: u32,

    /// Print the month-by-month remaining balance
    #[arg(long)]
    schedule: bool,

    /// Due date of the first payment (YYYY-MM-DD), used to label schedule rows
    #[arg(long, requires = "schedule")]
    first_payment: Option<NaiveDate>,

    /// Log every step of the calculation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger setup failed: {}", err);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> autoloan::Result<String> {
    let inputs = LoanInputs::new(cli.auto_value, cli.deposit, cli.rate, cli.term)?;
    let result = inputs.amortize();
    info!("{}", result);

    let mut report = render_payments(&result);
    if cli.schedule {
        let schedule = inputs.schedule(&result);
        let dates = cli
            .first_payment
            .map(|first| payment_dates(first, inputs.term()))
            .transpose()?;
        report.push_str(&render_schedule(&schedule, dates.as_deref()));
    }
    Ok(report)
}

fn render_payments(result: &AmortizationResult) -> String {
    let mut out = String::from("Payments\n");
    for (label, amount) in [
        ("Monthly Payments", result.monthly_payment),
        ("Total Payment", result.total_payment),
        ("Total Interest", result.total_interest),
    ] {
        out.push_str(&format!("  {:<18}{:>18}\n", label, currency(amount)));
    }
    out
}

fn render_schedule(schedule: &[ScheduleEntry], dates: Option<&[NaiveDate]>) -> String {
    let mut out = String::from("Payment Schedule\n");
    for (i, entry) in schedule.iter().enumerate() {
        let balance = currency(entry.remaining_balance);
        let row = match dates.and_then(|d| d.get(i)) {
            Some(date) => format!("  {:>5}  {}  {:>18}\n", entry.month, date, balance),
            None => format!("  {:>5}  {:>18}\n", entry.month, balance),
        };
        out.push_str(&row);
    }
    out
}

// verifies that types can implement the gated traits below
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanInputs>();
    is_normal::<AmortizationResult>();
    is_normal::<ScheduleEntry>();
}
