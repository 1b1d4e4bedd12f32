use error_stack::Report;

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{
    DependOnDatabaseConnection, QueryDatabaseConnection, Transaction,
};
use kernel::interface::query::{
    DependOnDvdCopyQuery, DependOnDvdTitleQuery, DependOnLoanQuery, DvdCopyQuery, DvdTitleQuery,
    LoanQuery,
};
use kernel::interface::update::{DependOnLoanModifier, LoanModifier};
use kernel::prelude::entity::{DvdCopyId, LoanStatus, Penalty, ReturnedAt};
use kernel::KernelError;

use crate::transfer::{ReturnCopyDto, ReturnOutcomeDto};

#[async_trait::async_trait]
pub trait ReturnCopyService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnLoanQuery<Connection>
    + DependOnLoanModifier<Connection>
    + DependOnDvdCopyQuery<Connection>
    + DependOnDvdTitleQuery<Connection>
    + DependOnClock
{
    /// Settles the open loan on a copy. The loan with the latest `date_out`
    /// is the one a return request refers to; the store-side conditional
    /// update keeps a racing duplicate request from reporting a second
    /// success or charging a second penalty.
    async fn return_copy(
        &self,
        dto: ReturnCopyDto,
    ) -> error_stack::Result<ReturnOutcomeDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let copy_id = DvdCopyId::new(dto.copy_id);
        let Some(loan) = self
            .loan_query()
            .find_latest_by_copy_id(&mut connection, &copy_id)
            .await?
        else {
            return Ok(ReturnOutcomeDto::NotFound);
        };
        if *loan.status() == LoanStatus::Returned {
            return Ok(ReturnOutcomeDto::AlreadyReturned);
        }

        let returned_at = ReturnedAt::new(self.clock().now());
        let Some(returned) = self
            .loan_modifier()
            .mark_returned(&mut connection, loan.id(), &returned_at)
            .await?
        else {
            // A concurrent return settled this loan first.
            return Ok(ReturnOutcomeDto::AlreadyReturned);
        };

        let copy = self
            .dvd_copy_query()
            .find_by_id(&mut connection, &copy_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::Internal)
                    .attach_printable("Copy vanished while its loan was open")
            })?;
        let title = self
            .dvd_title_query()
            .find_by_id(&mut connection, copy.title_id())
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::Internal)
                    .attach_printable("Copy references a missing title")
            })?;

        let penalty = Penalty::assess(title.penalty_rate(), returned.date_due(), &returned_at);
        connection.commit().await?;

        tracing::debug!(copy_id = %dto.copy_id, late = penalty.is_some(), "copy returned");
        Ok(ReturnOutcomeDto::Returned {
            penalty: penalty.map(Into::into),
        })
    }
}

impl<Connection: Transaction + Send, T> ReturnCopyService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnLoanQuery<Connection>
        + DependOnLoanModifier<Connection>
        + DependOnDvdCopyQuery<Connection>
        + DependOnDvdTitleQuery<Connection>
        + DependOnClock
{
}
