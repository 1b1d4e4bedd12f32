use crate::database::Transaction;
use crate::entity::{DvdCopyId, Loan};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_copy_id(
        &self,
        con: &mut Connection,
        copy_id: &DvdCopyId,
    ) -> error_stack::Result<Vec<Loan>, KernelError>;

    /// The loan with the latest `date_out` for the copy, regardless of
    /// status. This is the loan a return request refers to.
    async fn find_latest_by_copy_id(
        &self,
        con: &mut Connection,
        copy_id: &DvdCopyId,
    ) -> error_stack::Result<Option<Loan>, KernelError>;
}

pub trait DependOnLoanQuery<Connection: Transaction>: Sync + Send + 'static {
    type LoanQuery: LoanQuery<Connection>;
    fn loan_query(&self) -> &Self::LoanQuery;
}
