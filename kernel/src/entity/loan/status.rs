use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/*
 * Stored as text in the loans table. Unknown strings fail loudly at the
 * store boundary.
 */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Loaned,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Loaned => "Loaned",
            LoanStatus::Returned => "Returned",
        }
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = InvalidLoanStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Loaned" => Ok(LoanStatus::Loaned),
            "Returned" => Ok(LoanStatus::Returned),
            other => Err(InvalidLoanStatus(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct InvalidLoanStatus(String);

impl Display for InvalidLoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid loan status: {}", self.0)
    }
}

impl std::error::Error for InvalidLoanStatus {}
