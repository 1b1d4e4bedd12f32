use sqlx::PgConnection;
use time::Date;
use uuid::Uuid;

use kernel::interface::query::DvdTitleQuery;
use kernel::interface::update::DvdTitleModifier;
use kernel::prelude::entity::{
    DvdTitle, DvdTitleId, PenaltyRate, ReleasedAt, StandardCharge, TitleName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::DriverError;

pub struct PostgresDvdTitleRepository;

#[async_trait::async_trait]
impl DvdTitleQuery<PostgresTransaction> for PostgresDvdTitleRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &DvdTitleId,
    ) -> error_stack::Result<Option<DvdTitle>, KernelError> {
        Ok(PgDvdTitleInternal::find_by_id(&mut con.0, id).await?)
    }
}

#[async_trait::async_trait]
impl DvdTitleModifier<PostgresTransaction> for PostgresDvdTitleRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        title: &DvdTitle,
    ) -> error_stack::Result<(), KernelError> {
        Ok(PgDvdTitleInternal::create(&mut con.0, title).await?)
    }
}

#[derive(sqlx::FromRow)]
struct DvdTitleRow {
    id: Uuid,
    name: String,
    standard_charge: i64,
    penalty_rate: i64,
    released_at: Date,
}

impl From<DvdTitleRow> for DvdTitle {
    fn from(value: DvdTitleRow) -> Self {
        DvdTitle::new(
            DvdTitleId::new(value.id),
            TitleName::new(value.name),
            StandardCharge::new(value.standard_charge),
            PenaltyRate::new(value.penalty_rate),
            ReleasedAt::new(value.released_at),
        )
    }
}

pub(in crate::database) struct PgDvdTitleInternal;

impl PgDvdTitleInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &DvdTitleId,
    ) -> Result<Option<DvdTitle>, DriverError> {
        let row = sqlx::query_as::<_, DvdTitleRow>(
            // language=postgresql
            r#"
            SELECT id, name, standard_charge, penalty_rate, released_at
            FROM dvd_titles
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await?;
        Ok(row.map(DvdTitle::from))
    }

    async fn create(con: &mut PgConnection, title: &DvdTitle) -> Result<(), DriverError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO dvd_titles (id, name, standard_charge, penalty_rate, released_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(title.id().as_ref())
        .bind(title.name().as_ref())
        .bind(title.standard_charge().as_ref())
        .bind(title.penalty_rate().as_ref())
        .bind(title.released_at().as_ref())
        .execute(con)
        .await?;
        Ok(())
    }
}
