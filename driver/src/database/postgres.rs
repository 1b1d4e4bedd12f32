use error_stack::Report;
use sqlx::{Error, PgPool, Postgres};

use kernel::interface::clock::DependOnClock;
use kernel::interface::database::{QueryDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnDvdCopyQuery, DependOnDvdTitleQuery, DependOnLoanQuery};
use kernel::interface::update::{
    DependOnDvdCopyModifier, DependOnDvdTitleModifier, DependOnLoanModifier,
};
use kernel::KernelError;

use crate::clock::SystemClock;
use crate::env;
use crate::error::ConvertError;

pub use self::{dvd_copy::*, dvd_title::*, loan::*};

mod dvd_copy;
mod dvd_title;
mod loan;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = PgPool::connect(&url).await.convert_error()?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(crate::error::DriverError::from)?;
        tracing::debug!("Connected to Postgres and applied pending migrations");
        Ok(Self { pool })
    }
}

pub struct PostgresTransaction(pub(crate) sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

#[async_trait::async_trait]
impl QueryDatabaseConnection<PostgresTransaction> for PostgresDatabase {
    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(con))
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            Error::PoolTimedOut => Report::from(error).change_context(KernelError::Timeout),
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

impl DependOnDvdTitleQuery<PostgresTransaction> for PostgresDatabase {
    type DvdTitleQuery = PostgresDvdTitleRepository;
    fn dvd_title_query(&self) -> &Self::DvdTitleQuery {
        &PostgresDvdTitleRepository
    }
}

impl DependOnDvdTitleModifier<PostgresTransaction> for PostgresDatabase {
    type DvdTitleModifier = PostgresDvdTitleRepository;
    fn dvd_title_modifier(&self) -> &Self::DvdTitleModifier {
        &PostgresDvdTitleRepository
    }
}

impl DependOnDvdCopyQuery<PostgresTransaction> for PostgresDatabase {
    type DvdCopyQuery = PostgresDvdCopyRepository;
    fn dvd_copy_query(&self) -> &Self::DvdCopyQuery {
        &PostgresDvdCopyRepository
    }
}

impl DependOnDvdCopyModifier<PostgresTransaction> for PostgresDatabase {
    type DvdCopyModifier = PostgresDvdCopyRepository;
    fn dvd_copy_modifier(&self) -> &Self::DvdCopyModifier {
        &PostgresDvdCopyRepository
    }
}

impl DependOnLoanQuery<PostgresTransaction> for PostgresDatabase {
    type LoanQuery = PostgresLoanRepository;
    fn loan_query(&self) -> &Self::LoanQuery {
        &PostgresLoanRepository
    }
}

impl DependOnLoanModifier<PostgresTransaction> for PostgresDatabase {
    type LoanModifier = PostgresLoanRepository;
    fn loan_modifier(&self) -> &Self::LoanModifier {
        &PostgresLoanRepository
    }
}

impl DependOnClock for PostgresDatabase {
    type Clock = SystemClock;
    fn clock(&self) -> &Self::Clock {
        &SystemClock
    }
}

#[cfg(test)]
pub(in crate::database) mod test_support {
    use time::macros::date;
    use time::{Duration, OffsetDateTime};

    use kernel::prelude::entity::{
        DateDue, DateOut, DvdCopy, DvdCopyId, DvdTitle, DvdTitleId, Loan, LoanId, LoanStatus,
        MemberId, PenaltyRate, PurchasedAt, ReleasedAt, StandardCharge, TitleName,
    };

    pub fn sample_title() -> DvdTitle {
        DvdTitle::new(
            DvdTitleId::new(uuid::Uuid::new_v4()),
            TitleName::new("Paris, Texas".to_string()),
            StandardCharge::new(300),
            PenaltyRate::new(150),
            ReleasedAt::new(date!(1984 - 09 - 14)),
        )
    }

    /// `now` rounded down to whole seconds, so values survive the
    /// microsecond precision of TIMESTAMPTZ and compare equal after a
    /// round trip.
    pub fn rounded_now() -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        now.replace_nanosecond(0).unwrap_or(now)
    }

    pub fn sample_copy(title_id: &DvdTitleId, purchased_days_ago: i64) -> DvdCopy {
        DvdCopy::new(
            DvdCopyId::new(uuid::Uuid::new_v4()),
            title_id.clone(),
            PurchasedAt::new(rounded_now() - Duration::days(purchased_days_ago)),
        )
    }

    pub fn active_loan(copy_id: &DvdCopyId, due_days_ago: i64) -> Loan {
        let now = rounded_now();
        Loan::new(
            LoanId::new(uuid::Uuid::new_v4()),
            copy_id.clone(),
            MemberId::new(uuid::Uuid::new_v4()),
            DateOut::new(now - Duration::days(due_days_ago + 7)),
            DateDue::new(now - Duration::days(due_days_ago)),
            None,
            LoanStatus::Loaned,
        )
    }
}
