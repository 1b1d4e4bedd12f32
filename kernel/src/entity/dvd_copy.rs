mod id;
mod purchased_at;

pub use self::{id::*, purchased_at::*};
use crate::entity::DvdTitleId;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct DvdCopy {
    id: DvdCopyId,
    title_id: DvdTitleId,
    purchased_at: PurchasedAt,
}

impl DvdCopy {
    pub fn new(id: DvdCopyId, title_id: DvdTitleId, purchased_at: PurchasedAt) -> Self {
        Self {
            id,
            title_id,
            purchased_at,
        }
    }
}
