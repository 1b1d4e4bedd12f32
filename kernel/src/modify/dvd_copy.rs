use crate::database::Transaction;
use crate::entity::{DvdCopy, DvdCopyId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait DvdCopyModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        copy: &DvdCopy,
    ) -> error_stack::Result<(), KernelError>;

    /// Removes the copy only if no `Loaned` loan references it, in one
    /// conditional statement. Returns whether a row was deleted, so callers
    /// can tell retirement from a copy that got loaned out in between.
    async fn delete_if_unloaned(
        &self,
        con: &mut Connection,
        id: &DvdCopyId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnDvdCopyModifier<Connection: Transaction>: 'static + Sync + Send {
    type DvdCopyModifier: DvdCopyModifier<Connection>;
    fn dvd_copy_modifier(&self) -> &Self::DvdCopyModifier;
}
