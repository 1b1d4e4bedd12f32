use time::Date;

use crate::database::Transaction;
use crate::entity::{DvdCopy, DvdCopyId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait DvdCopyQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &DvdCopyId,
    ) -> error_stack::Result<Option<DvdCopy>, KernelError>;

    /// Copies purchased on or before the cutoff date that have no `Loaned`
    /// loan, ordered by copy id. One parameterized query; the loan check is
    /// an anti-join on the store side.
    async fn find_retirable(
        &self,
        con: &mut Connection,
        purchased_on_or_before: &Date,
    ) -> error_stack::Result<Vec<DvdCopy>, KernelError>;
}

pub trait DependOnDvdCopyQuery<Connection: Transaction>: Sync + Send + 'static {
    type DvdCopyQuery: DvdCopyQuery<Connection>;
    fn dvd_copy_query(&self) -> &Self::DvdCopyQuery;
}
