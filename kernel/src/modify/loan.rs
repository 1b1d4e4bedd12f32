use crate::database::Transaction;
use crate::entity::{Loan, LoanId, ReturnedAt};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(&self, con: &mut Connection, loan: &Loan)
        -> error_stack::Result<(), KernelError>;

    /// Conditional transition `Loaned` -> `Returned`. Updates the loan only
    /// while its status is still `Loaned` and returns the updated record;
    /// `None` means another return already won, so the caller must not
    /// report a second success.
    async fn mark_returned(
        &self,
        con: &mut Connection,
        id: &LoanId,
        returned_at: &ReturnedAt,
    ) -> error_stack::Result<Option<Loan>, KernelError>;
}

pub trait DependOnLoanModifier<Connection: Transaction>: 'static + Sync + Send {
    type LoanModifier: LoanModifier<Connection>;
    fn loan_modifier(&self) -> &Self::LoanModifier;
}
