use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::LoanQuery;
use kernel::interface::update::LoanModifier;
use kernel::prelude::entity::{
    DateDue, DateOut, DvdCopyId, Loan, LoanId, LoanStatus, MemberId, ReturnedAt,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::DriverError;

pub struct PostgresLoanRepository;

#[async_trait::async_trait]
impl LoanQuery<PostgresTransaction> for PostgresLoanRepository {
    async fn find_by_copy_id(
        &self,
        con: &mut PostgresTransaction,
        copy_id: &DvdCopyId,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        Ok(PgLoanInternal::find_by_copy_id(&mut con.0, copy_id).await?)
    }

    async fn find_latest_by_copy_id(
        &self,
        con: &mut PostgresTransaction,
        copy_id: &DvdCopyId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        Ok(PgLoanInternal::find_latest_by_copy_id(&mut con.0, copy_id).await?)
    }
}

#[async_trait::async_trait]
impl LoanModifier<PostgresTransaction> for PostgresLoanRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        Ok(PgLoanInternal::create(&mut con.0, loan).await?)
    }

    async fn mark_returned(
        &self,
        con: &mut PostgresTransaction,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        Ok(PgLoanInternal::mark_returned(&mut con.0, id, returned_at).await?)
    }
}

#[derive(sqlx::FromRow)]
struct LoanRow {
    id: Uuid,
    copy_id: Uuid,
    member_id: Uuid,
    date_out: OffsetDateTime,
    date_due: OffsetDateTime,
    returned_at: Option<OffsetDateTime>,
    status: String,
}

impl TryFrom<LoanRow> for Loan {
    type Error = DriverError;

    fn try_from(value: LoanRow) -> Result<Self, Self::Error> {
        let status = value.status.parse::<LoanStatus>()?;
        Ok(Loan::new(
            LoanId::new(value.id),
            DvdCopyId::new(value.copy_id),
            MemberId::new(value.member_id),
            DateOut::new(value.date_out),
            DateDue::new(value.date_due),
            value.returned_at.map(ReturnedAt::new),
            status,
        ))
    }
}

pub(in crate::database) struct PgLoanInternal;

impl PgLoanInternal {
    async fn find_by_copy_id(
        con: &mut PgConnection,
        copy_id: &DvdCopyId,
    ) -> Result<Vec<Loan>, DriverError> {
        let rows = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, copy_id, member_id, date_out, date_due, returned_at, status
            FROM loans
            WHERE copy_id = $1
            ORDER BY date_out DESC
            "#,
        )
        .bind(copy_id.as_ref())
        .fetch_all(con)
        .await?;
        rows.into_iter().map(Loan::try_from).collect()
    }

    async fn find_latest_by_copy_id(
        con: &mut PgConnection,
        copy_id: &DvdCopyId,
    ) -> Result<Option<Loan>, DriverError> {
        let row = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT id, copy_id, member_id, date_out, date_due, returned_at, status
            FROM loans
            WHERE copy_id = $1
            ORDER BY date_out DESC
            LIMIT 1
            "#,
        )
        .bind(copy_id.as_ref())
        .fetch_optional(con)
        .await?;
        row.map(Loan::try_from).transpose()
    }

    async fn create(con: &mut PgConnection, loan: &Loan) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO loans (id, copy_id, member_id, date_out, date_due, returned_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(loan.id().as_ref())
        .bind(loan.copy_id().as_ref())
        .bind(loan.member_id().as_ref())
        .bind(loan.date_out().as_ref())
        .bind(loan.date_due().as_ref())
        .bind(loan.returned_at().as_ref().map(|r| r.as_ref()))
        .bind(loan.status().as_str())
        .execute(con)
        .await?;
        Ok(())
    }

    /// The `status = 'Loaned'` predicate makes the transition conditional;
    /// of two racing returns only one sees an affected row.
    async fn mark_returned(
        con: &mut PgConnection,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> Result<Option<Loan>, DriverError> {
        let row = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            UPDATE loans
            SET status = 'Returned', returned_at = $2
            WHERE id = $1 AND status = 'Loaned'
            RETURNING id, copy_id, member_id, date_out, date_due, returned_at, status
            "#,
        )
        .bind(id.as_ref())
        .bind(returned_at.as_ref())
        .fetch_optional(con)
        .await?;
        row.map(Loan::try_from).transpose()
    }
}
