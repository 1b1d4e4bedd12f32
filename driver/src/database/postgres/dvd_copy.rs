use sqlx::PgConnection;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::query::DvdCopyQuery;
use kernel::interface::update::DvdCopyModifier;
use kernel::prelude::entity::{DvdCopy, DvdCopyId, DvdTitleId, PurchasedAt};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::DriverError;

pub struct PostgresDvdCopyRepository;

#[async_trait::async_trait]
impl DvdCopyQuery<PostgresTransaction> for PostgresDvdCopyRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &DvdCopyId,
    ) -> error_stack::Result<Option<DvdCopy>, KernelError> {
        Ok(PgDvdCopyInternal::find_by_id(&mut con.0, id).await?)
    }

    async fn find_retirable(
        &self,
        con: &mut PostgresTransaction,
        purchased_on_or_before: &Date,
    ) -> error_stack::Result<Vec<DvdCopy>, KernelError> {
        Ok(PgDvdCopyInternal::find_retirable(&mut con.0, purchased_on_or_before).await?)
    }
}

#[async_trait::async_trait]
impl DvdCopyModifier<PostgresTransaction> for PostgresDvdCopyRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        copy: &DvdCopy,
    ) -> error_stack::Result<(), KernelError> {
        Ok(PgDvdCopyInternal::create(&mut con.0, copy).await?)
    }

    async fn delete_if_unloaned(
        &self,
        con: &mut PostgresTransaction,
        id: &DvdCopyId,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(PgDvdCopyInternal::delete_if_unloaned(&mut con.0, id).await?)
    }
}

#[derive(sqlx::FromRow)]
struct DvdCopyRow {
    id: Uuid,
    title_id: Uuid,
    purchased_at: OffsetDateTime,
}

impl From<DvdCopyRow> for DvdCopy {
    fn from(value: DvdCopyRow) -> Self {
        DvdCopy::new(
            DvdCopyId::new(value.id),
            DvdTitleId::new(value.title_id),
            PurchasedAt::new(value.purchased_at),
        )
    }
}

pub(in crate::database) struct PgDvdCopyInternal;

impl PgDvdCopyInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &DvdCopyId,
    ) -> Result<Option<DvdCopy>, DriverError> {
        let row = sqlx::query_as::<_, DvdCopyRow>(
            // language=postgresql
            r#"
            SELECT id, title_id, purchased_at
            FROM dvd_copies
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await?;
        Ok(row.map(DvdCopy::from))
    }

    async fn find_retirable(
        con: &mut PgConnection,
        purchased_on_or_before: &Date,
    ) -> Result<Vec<DvdCopy>, DriverError> {
        let rows = sqlx::query_as::<_, DvdCopyRow>(
            // language=postgresql
            r#"
            SELECT id, title_id, purchased_at
            FROM dvd_copies
            WHERE purchased_at::date <= $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM loans
                  WHERE loans.copy_id = dvd_copies.id
                    AND loans.status = 'Loaned'
              )
            ORDER BY id
            "#,
        )
        .bind(purchased_on_or_before)
        .fetch_all(con)
        .await?;
        Ok(rows.into_iter().map(DvdCopy::from).collect())
    }

    async fn create(con: &mut PgConnection, copy: &DvdCopy) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO dvd_copies (id, title_id, purchased_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(copy.id().as_ref())
        .bind(copy.title_id().as_ref())
        .bind(copy.purchased_at().as_ref())
        .execute(con)
        .await?;
        Ok(())
    }

    async fn delete_if_unloaned(
        con: &mut PgConnection,
        id: &DvdCopyId,
    ) -> Result<bool, DriverError> {
        // The anti-join re-checks eligibility inside the statement, so a
        // copy loaned out between listing and retirement stays put.
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM dvd_copies
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM loans
                  WHERE loans.copy_id = dvd_copies.id
                    AND loans.status = 'Loaned'
              )
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
