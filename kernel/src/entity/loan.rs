mod date_due;
mod date_out;
mod id;
mod penalty;
mod returned_at;
mod status;

pub use self::{date_due::*, date_out::*, id::*, penalty::*, returned_at::*, status::*};
use crate::entity::{DvdCopyId, MemberId};
use destructure::{Destructure, Mutation};
use vodca::References;

/*
 * One borrowing event. `returned_at` is set exactly when `status` is
 * `Returned`; the transition happens through `LoanModifier::mark_returned`
 * and nowhere else.
 */
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Loan {
    id: LoanId,
    copy_id: DvdCopyId,
    member_id: MemberId,
    date_out: DateOut,
    date_due: DateDue,
    returned_at: Option<ReturnedAt>,
    status: LoanStatus,
}

impl Loan {
    pub fn new(
        id: LoanId,
        copy_id: DvdCopyId,
        member_id: MemberId,
        date_out: DateOut,
        date_due: DateDue,
        returned_at: Option<ReturnedAt>,
        status: LoanStatus,
    ) -> Self {
        Self {
            id,
            copy_id,
            member_id,
            date_out,
            date_due,
            returned_at,
            status,
        }
    }
}
