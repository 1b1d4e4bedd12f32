use crate::database::Transaction;
use crate::entity::{DvdTitle, DvdTitleId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait DvdTitleQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &DvdTitleId,
    ) -> error_stack::Result<Option<DvdTitle>, KernelError>;
}

pub trait DependOnDvdTitleQuery<Connection: Transaction>: Sync + Send + 'static {
    type DvdTitleQuery: DvdTitleQuery<Connection>;
    fn dvd_title_query(&self) -> &Self::DvdTitleQuery;
}
