use std::collections::HashSet;

use time::Duration;

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{
    DependOnDatabaseConnection, QueryDatabaseConnection, Transaction,
};
use kernel::interface::query::{DependOnDvdCopyQuery, DvdCopyQuery};
use kernel::interface::update::{DependOnDvdCopyModifier, DvdCopyModifier};
use kernel::prelude::entity::DvdCopyId;
use kernel::KernelError;

use crate::transfer::{DvdCopyDto, RetireCopiesDto, RetirementReportDto};

/// Stock younger than this is never offered for retirement.
pub const RETIREMENT_AGE_DAYS: i64 = 365;

#[async_trait::async_trait]
pub trait GetRetirementCandidatesService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnDvdCopyQuery<Connection>
    + DependOnClock
{
    /// Copies aged past the threshold with no open loan. Derived from the
    /// store on every call; nothing is cached or flagged.
    async fn get_retirement_candidates(
        &self,
    ) -> error_stack::Result<Vec<DvdCopyDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let cutoff = self.clock().now().date() - Duration::days(RETIREMENT_AGE_DAYS);
        let copies = self
            .dvd_copy_query()
            .find_retirable(&mut connection, &cutoff)
            .await?;

        Ok(copies.into_iter().map(DvdCopyDto::from).collect())
    }
}

impl<Connection: Transaction + Send, T> GetRetirementCandidatesService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnDvdCopyQuery<Connection> + DependOnClock
{
}

#[async_trait::async_trait]
pub trait RetireCopiesService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnDvdCopyModifier<Connection>
{
    /// Removes the given copies from inventory. Candidates are re-validated
    /// at deletion time, so a list produced earlier can be submitted as-is;
    /// anything loaned out in the meantime, already gone, or failing at the
    /// store lands in `skipped` and the rest proceeds.
    async fn retire_copies(
        &self,
        dto: RetireCopiesDto,
    ) -> error_stack::Result<RetirementReportDto, KernelError> {
        let mut retired_count = 0;
        let mut skipped = HashSet::new();
        for copy_id in dto.copy_ids {
            match self.retire_copy(&DvdCopyId::new(copy_id)).await {
                Ok(true) => retired_count += 1,
                Ok(false) => {
                    skipped.insert(copy_id);
                }
                Err(report) => {
                    tracing::warn!(copy_id = %copy_id, error = ?report, "failed to retire copy");
                    skipped.insert(copy_id);
                }
            }
        }

        tracing::info!(retired_count, skipped = skipped.len(), "retirement pass finished");
        Ok(RetirementReportDto {
            retired_count,
            skipped,
        })
    }

    /// One copy per transaction; a failure here cannot poison sibling
    /// candidates.
    async fn retire_copy(&self, id: &DvdCopyId) -> error_stack::Result<bool, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let deleted = self
            .dvd_copy_modifier()
            .delete_if_unloaned(&mut connection, id)
            .await?;
        connection.commit().await?;
        Ok(deleted)
    }
}

impl<Connection: Transaction + Send, T> RetireCopiesService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnDvdCopyModifier<Connection>
{
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::prelude::entity::{
        DateDue, DateOut, DvdCopy, DvdCopyId, Loan, LoanId, LoanStatus, MemberId, PurchasedAt,
    };
    use kernel::KernelError;

    use crate::service::test_store::{sample_title, InMemoryStore};
    use crate::service::{GetRetirementCandidatesService, RetireCopiesService};
    use crate::transfer::RetireCopiesDto;

    const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);

    fn seed_copy(store: &InMemoryStore, purchased_days_ago: i64) -> DvdCopyId {
        let title = sample_title(150);
        let copy = DvdCopy::new(
            DvdCopyId::new(Uuid::new_v4()),
            title.id().clone(),
            PurchasedAt::new(NOW - Duration::days(purchased_days_ago)),
        );
        let copy_id = copy.id().clone();
        store.insert_title(title);
        store.insert_copy(copy);
        copy_id
    }

    fn seed_open_loan(store: &InMemoryStore, copy_id: &DvdCopyId) {
        store.insert_loan(Loan::new(
            LoanId::new(Uuid::new_v4()),
            copy_id.clone(),
            MemberId::new(Uuid::new_v4()),
            DateOut::new(NOW - Duration::days(3)),
            DateDue::new(NOW + Duration::days(4)),
            None,
            LoanStatus::Loaned,
        ));
    }

    #[tokio::test]
    async fn candidates_require_age_and_no_open_loan() -> error_stack::Result<(), KernelError> {
        let store = InMemoryStore::new(NOW);
        let aged = seed_copy(&store, 365);
        let fresh = seed_copy(&store, 364);
        let aged_but_loaned = seed_copy(&store, 400);
        seed_open_loan(&store, &aged_but_loaned);

        let candidates = store.get_retirement_candidates().await?;
        let ids = candidates.iter().map(|c| c.id).collect::<Vec<_>>();
        assert!(ids.contains(aged.as_ref()));
        assert!(!ids.contains(fresh.as_ref()));
        assert!(!ids.contains(aged_but_loaned.as_ref()));
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_idempotent() -> error_stack::Result<(), KernelError> {
        let store = InMemoryStore::new(NOW);
        seed_copy(&store, 365);
        seed_copy(&store, 500);

        let first = store.get_retirement_candidates().await?;
        let second = store.get_retirement_candidates().await?;
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn one_failing_candidate_does_not_abort_the_rest(
    ) -> error_stack::Result<(), KernelError> {
        let store = InMemoryStore::new(NOW);
        let first = seed_copy(&store, 400);
        let failing = seed_copy(&store, 400);
        let third = seed_copy(&store, 400);
        store.fail_delete_of(*failing.as_ref());

        let report = store
            .retire_copies(RetireCopiesDto {
                copy_ids: vec![*first.as_ref(), *failing.as_ref(), *third.as_ref()],
            })
            .await?;

        assert_eq!(report.retired_count, 2);
        assert_eq!(report.skipped, HashSet::from([*failing.as_ref()]));
        assert!(store.copy(&first).is_none());
        assert!(store.copy(&third).is_none());
        assert!(store.copy(&failing).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn copy_loaned_after_listing_is_skipped() -> error_stack::Result<(), KernelError> {
        let store = InMemoryStore::new(NOW);
        let aged = seed_copy(&store, 400);

        let candidates = store.get_retirement_candidates().await?;
        assert_eq!(candidates.len(), 1);

        // Checked out between listing and retirement.
        seed_open_loan(&store, &aged);

        let report = store
            .retire_copies(RetireCopiesDto {
                copy_ids: candidates.iter().map(|c| c.id).collect(),
            })
            .await?;
        assert_eq!(report.retired_count, 0);
        assert_eq!(report.skipped, HashSet::from([*aged.as_ref()]));
        assert!(store.copy(&aged).is_some());
        Ok(())
    }
}
