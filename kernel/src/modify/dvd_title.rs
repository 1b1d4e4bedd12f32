use crate::database::Transaction;
use crate::entity::DvdTitle;
use crate::KernelError;

#[async_trait::async_trait]
pub trait DvdTitleModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        title: &DvdTitle,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnDvdTitleModifier<Connection: Transaction>: 'static + Sync + Send {
    type DvdTitleModifier: DvdTitleModifier<Connection>;
    fn dvd_title_modifier(&self) -> &Self::DvdTitleModifier;
}
