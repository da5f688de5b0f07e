pub mod error;
pub mod format;
pub mod loan;

pub use error::{LoanError, Result};
pub use loan::{build_schedule, calculate, AmortizationResult, LoanInputs, ScheduleEntry};
