use chrono::{Months, NaiveDate};
use log::{debug, trace};
use std::fmt;

use crate::error::{LoanError, Result};

/// Longest loan term accepted by `LoanInputs::new`, in months.
pub const MAX_TERM_MONTHS: u32 = 120;
/// Largest vehicle price accepted by `LoanInputs::new`.
pub const MAX_AUTO_VALUE: u64 = 10_000_000;
/// Schedule balances are reported to this many decimal places.
pub const DEC_PLACES: i32 = 2;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationResult {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

impl fmt::Display for AmortizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "monthly payment ${:.2}, total payment ${:.2}, total interest ${:.2}",
            self.monthly_payment, self.total_payment, self.total_interest
        )
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntry {
    pub month: u32,
    pub remaining_balance: f64,
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month {}, remaining balance ${:.2}",
            self.month, self.remaining_balance
        )
    }
}

/// Validated loan parameters.
///
/// The free functions `calculate` and `build_schedule` accept anything; this
/// type is the boundary where the deposit, rate and term constraints are
/// enforced.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoanInputs {
    auto_value: u64,
    deposit: u64,
    annual_rate: f64,
    term: u32,
}

impl LoanInputs {
    pub fn new(auto_value: u64, deposit: u64, annual_rate: f64, term: u32) -> Result<Self> {
        let checked = validate(auto_value, deposit, annual_rate, term);
        if let Err(err) = &checked {
            debug!("rejected loan inputs: {}", err);
        }
        checked.map(|()| Self {
            auto_value,
            deposit,
            annual_rate,
            term,
        })
    }

    pub fn auto_value(&self) -> u64 {
        self.auto_value
    }

    pub fn deposit(&self) -> u64 {
        self.deposit
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    pub fn principal(&self) -> f64 {
        principal(self.auto_value, self.deposit)
    }

    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate)
    }

    pub fn amortize(&self) -> AmortizationResult {
        calculate(self.auto_value, self.deposit, self.annual_rate, self.term)
    }

    pub fn schedule(&self, result: &AmortizationResult) -> Vec<ScheduleEntry> {
        build_schedule(
            self.auto_value,
            self.deposit,
            self.annual_rate,
            self.term,
            result.monthly_payment,
        )
    }
}

fn validate(auto_value: u64, deposit: u64, annual_rate: f64, term: u32) -> Result<()> {
    if auto_value > MAX_AUTO_VALUE {
        return Err(LoanError::invalid(
            "auto value",
            format!("{} exceeds the maximum of {}", auto_value, MAX_AUTO_VALUE),
        ));
    }
    if deposit > auto_value {
        return Err(LoanError::invalid(
            "deposit",
            format!("{} exceeds the auto value {}", deposit, auto_value),
        ));
    }
    if !annual_rate.is_finite() {
        return Err(LoanError::invalid("rate", "must be a finite number"));
    }
    if !(0. ..=100.).contains(&annual_rate) {
        return Err(LoanError::invalid(
            "rate",
            format!("{} is outside 0 to 100 percent", annual_rate),
        ));
    }
    if term == 0 || term > MAX_TERM_MONTHS {
        return Err(LoanError::invalid(
            "term",
            format!("{} months is outside 1 to {}", term, MAX_TERM_MONTHS),
        ));
    }
    Ok(())
}

fn principal(auto_value: u64, deposit: u64) -> f64 {
    // f64 subtraction so a deposit above the auto value goes negative instead of wrapping
    auto_value as f64 - deposit as f64
}

fn periodic_rate(annual_rate: f64) -> f64 {
    annual_rate / 100. / 12.
}

fn round(amt: f64, dec: i32) -> f64 {
    let rounded = (amt * 10_f64.powi(dec)).round_ties_even() / 10_f64.powi(dec);
    // drop the sign of a residual like -4e-10 so it reports as 0.00
    if rounded == 0. {
        0.
    } else {
        rounded
    }
}

/// Fixed monthly payment, total paid and total interest for a loan of
/// `auto_value - deposit` at `rate` percent per year over `term` months.
///
/// Nothing is validated or rounded. `term` must be at least 1.
pub fn calculate(auto_value: u64, deposit: u64, rate: f64, term: u32) -> AmortizationResult {
    let principal = principal(auto_value, deposit);
    let pmt_rate = periodic_rate(rate);
    let n = f64::from(term);

    let monthly_payment = if pmt_rate == 0. {
        principal / n
    } else {
        let factor = (1. + pmt_rate).powf(n);
        principal * (pmt_rate * factor) / (factor - 1.)
    };
    let total_payment = monthly_payment * n;
    let total_interest = total_payment - principal;

    trace!(
        "principal {}, periodic rate {}, term {}, monthly payment {}",
        principal,
        pmt_rate,
        term,
        monthly_payment
    );

    AmortizationResult {
        monthly_payment,
        total_payment,
        total_interest,
    }
}

/// Remaining balance after each of the `term` payments of `monthly_payment`.
///
/// `monthly_payment` is taken as given; a value that does not match the
/// other inputs yields a schedule that does not end at zero.
pub fn build_schedule(
    auto_value: u64,
    deposit: u64,
    rate: f64,
    term: u32,
    monthly_payment: f64,
) -> Vec<ScheduleEntry> {
    let pmt_rate = periodic_rate(rate);
    let mut balance = principal(auto_value, deposit);
    let mut schedule = Vec::with_capacity(term as usize);

    for month in 1..=term {
        let interest = balance * pmt_rate;
        balance -= monthly_payment - interest;
        trace!(
            "month {}, interest {}, end bal {}",
            month,
            interest,
            balance
        );
        schedule.push(ScheduleEntry {
            month,
            remaining_balance: round(balance, DEC_PLACES),
        });
    }
    schedule
}

/// Due date of each of `count` monthly payments, starting at `first`.
///
/// Each date is offset from `first` rather than from the previous payment,
/// so a loan starting on the 31st returns to the 31st after a short month.
pub fn payment_dates(first: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    (0..count)
        .map(|offset| {
            first
                .checked_add_months(Months::new(offset))
                .ok_or(LoanError::DateOutOfRange {
                    first,
                    months: offset,
                })
        })
        .collect()
}
