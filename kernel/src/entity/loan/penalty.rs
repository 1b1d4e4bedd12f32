use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{DateDue, PenaltyRate, ReturnedAt};

/*
 * Charge for a late return, in integer cents. Lateness counts whole
 * calendar days between the due date and the return date; time of day is
 * ignored, matching how due dates are issued.
 */
#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct Penalty(i64);

impl Penalty {
    pub fn new(amount: impl Into<i64>) -> Self {
        Self(amount.into())
    }

    pub fn assess(rate: &PenaltyRate, date_due: &DateDue, returned_at: &ReturnedAt) -> Option<Self> {
        let late_days = (returned_at.as_ref().date() - date_due.as_ref().date()).whole_days();
        if late_days > 0 {
            Some(Self(late_days * *rate.as_ref()))
        } else {
            None
        }
    }
}
