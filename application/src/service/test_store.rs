use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use error_stack::Report;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{QueryDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnDvdCopyQuery, DependOnDvdTitleQuery, DependOnLoanQuery, DvdCopyQuery, DvdTitleQuery,
    LoanQuery,
};
use kernel::interface::update::{
    DependOnDvdCopyModifier, DependOnLoanModifier, DvdCopyModifier, LoanModifier,
};
use kernel::prelude::entity::{
    DvdCopy, DvdCopyId, DvdTitle, DvdTitleId, Loan, LoanId, LoanStatus, PenaltyRate, ReleasedAt,
    ReturnedAt, StandardCharge, TitleName,
};
use kernel::KernelError;

pub fn sample_title(penalty_rate: i64) -> DvdTitle {
    DvdTitle::new(
        DvdTitleId::new(Uuid::new_v4()),
        TitleName::new("Stalker".to_string()),
        StandardCharge::new(300),
        PenaltyRate::new(penalty_rate),
        ReleasedAt::new(time::macros::date!(1979 - 05 - 25)),
    )
}

#[derive(Default)]
struct StoreState {
    titles: HashMap<Uuid, DvdTitle>,
    copies: HashMap<Uuid, DvdCopy>,
    loans: HashMap<Uuid, Loan>,
    fail_copy_deletes: HashSet<Uuid>,
}

impl StoreState {
    fn has_open_loan(&self, copy_id: &DvdCopyId) -> bool {
        self.loans
            .values()
            .any(|loan| loan.copy_id() == copy_id && *loan.status() == LoanStatus::Loaned)
    }
}

/// Hash-map store with a pinned clock, standing in for Postgres in service
/// tests. The conditional operations take the same all-or-nothing effect as
/// their SQL counterparts by running under one mutex guard.
#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    now: OffsetDateTime,
}

impl InMemoryStore {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            now,
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }

    pub fn insert_title(&self, title: DvdTitle) {
        self.state().titles.insert(*title.id().as_ref(), title);
    }

    pub fn insert_copy(&self, copy: DvdCopy) {
        self.state().copies.insert(*copy.id().as_ref(), copy);
    }

    pub fn insert_loan(&self, loan: Loan) {
        self.state().loans.insert(*loan.id().as_ref(), loan);
    }

    pub fn fail_delete_of(&self, copy_id: Uuid) {
        self.state().fail_copy_deletes.insert(copy_id);
    }

    pub fn loan(&self, id: &LoanId) -> Loan {
        self.state().loans.get(id.as_ref()).cloned().expect("loan seeded")
    }

    pub fn copy(&self, id: &DvdCopyId) -> Option<DvdCopy> {
        self.state().copies.get(id.as_ref()).cloned()
    }
}

pub struct MemTransaction(Arc<Mutex<StoreState>>);

impl MemTransaction {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.0.lock().expect("store mutex poisoned")
    }
}

#[async_trait::async_trait]
impl Transaction for MemTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl QueryDatabaseConnection<MemTransaction> for InMemoryStore {
    async fn transact(&self) -> error_stack::Result<MemTransaction, KernelError> {
        Ok(MemTransaction(Arc::clone(&self.state)))
    }
}

#[async_trait::async_trait]
impl DvdTitleQuery<MemTransaction> for InMemoryStore {
    async fn find_by_id(
        &self,
        con: &mut MemTransaction,
        id: &DvdTitleId,
    ) -> error_stack::Result<Option<DvdTitle>, KernelError> {
        Ok(con.lock().titles.get(id.as_ref()).cloned())
    }
}

#[async_trait::async_trait]
impl DvdCopyQuery<MemTransaction> for InMemoryStore {
    async fn find_by_id(
        &self,
        con: &mut MemTransaction,
        id: &DvdCopyId,
    ) -> error_stack::Result<Option<DvdCopy>, KernelError> {
        Ok(con.lock().copies.get(id.as_ref()).cloned())
    }

    async fn find_retirable(
        &self,
        con: &mut MemTransaction,
        purchased_on_or_before: &Date,
    ) -> error_stack::Result<Vec<DvdCopy>, KernelError> {
        let state = con.lock();
        let mut copies = state
            .copies
            .values()
            .filter(|copy| copy.purchased_at().as_ref().date() <= *purchased_on_or_before)
            .filter(|copy| !state.has_open_loan(copy.id()))
            .cloned()
            .collect::<Vec<_>>();
        copies.sort_by_key(|copy| *copy.id().as_ref());
        Ok(copies)
    }
}

#[async_trait::async_trait]
impl LoanQuery<MemTransaction> for InMemoryStore {
    async fn find_by_copy_id(
        &self,
        con: &mut MemTransaction,
        copy_id: &DvdCopyId,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        let mut loans = con
            .lock()
            .loans
            .values()
            .filter(|loan| loan.copy_id() == copy_id)
            .cloned()
            .collect::<Vec<_>>();
        loans.sort_by_key(|loan| std::cmp::Reverse(*loan.date_out().as_ref()));
        Ok(loans)
    }

    async fn find_latest_by_copy_id(
        &self,
        con: &mut MemTransaction,
        copy_id: &DvdCopyId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        let loans = self.find_by_copy_id(con, copy_id).await?;
        Ok(loans.into_iter().next())
    }
}

#[async_trait::async_trait]
impl LoanModifier<MemTransaction> for InMemoryStore {
    async fn create(
        &self,
        con: &mut MemTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().loans.insert(*loan.id().as_ref(), loan.clone());
        Ok(())
    }

    async fn mark_returned(
        &self,
        con: &mut MemTransaction,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        let mut state = con.lock();
        let Some(loan) = state.loans.get(id.as_ref()) else {
            return Ok(None);
        };
        if *loan.status() != LoanStatus::Loaned {
            return Ok(None);
        }
        let updated = loan.clone().reconstruct(|loan| {
            loan.status = LoanStatus::Returned;
            loan.returned_at = Some(returned_at.clone());
        });
        state.loans.insert(*id.as_ref(), updated.clone());
        Ok(Some(updated))
    }
}

#[async_trait::async_trait]
impl DvdCopyModifier<MemTransaction> for InMemoryStore {
    async fn create(
        &self,
        con: &mut MemTransaction,
        copy: &DvdCopy,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().copies.insert(*copy.id().as_ref(), copy.clone());
        Ok(())
    }

    async fn delete_if_unloaned(
        &self,
        con: &mut MemTransaction,
        id: &DvdCopyId,
    ) -> error_stack::Result<bool, KernelError> {
        let mut state = con.lock();
        if state.fail_copy_deletes.contains(id.as_ref()) {
            return Err(Report::new(KernelError::Internal)
                .attach_printable("Injected store failure"));
        }
        if state.has_open_loan(id) {
            return Ok(false);
        }
        let removed = state.copies.remove(id.as_ref()).is_some();
        if removed {
            state
                .loans
                .retain(|_, loan| loan.copy_id() != id);
        }
        Ok(removed)
    }
}

impl DependOnDvdTitleQuery<MemTransaction> for InMemoryStore {
    type DvdTitleQuery = Self;
    fn dvd_title_query(&self) -> &Self::DvdTitleQuery {
        self
    }
}

impl DependOnDvdCopyQuery<MemTransaction> for InMemoryStore {
    type DvdCopyQuery = Self;
    fn dvd_copy_query(&self) -> &Self::DvdCopyQuery {
        self
    }
}

impl DependOnLoanQuery<MemTransaction> for InMemoryStore {
    type LoanQuery = Self;
    fn loan_query(&self) -> &Self::LoanQuery {
        self
    }
}

impl DependOnLoanModifier<MemTransaction> for InMemoryStore {
    type LoanModifier = Self;
    fn loan_modifier(&self) -> &Self::LoanModifier {
        self
    }
}

impl DependOnDvdCopyModifier<MemTransaction> for InMemoryStore {
    type DvdCopyModifier = Self;
    fn dvd_copy_modifier(&self) -> &Self::DvdCopyModifier {
        self
    }
}

impl Clock for InMemoryStore {
    fn now(&self) -> OffsetDateTime {
        self.now
    }
}

impl DependOnClock for InMemoryStore {
    type Clock = Self;
    fn clock(&self) -> &Self::Clock {
        self
    }
}
