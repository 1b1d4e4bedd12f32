use std::collections::HashSet;

use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{DestructDvdCopy, DvdCopy};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DvdCopyDto {
    pub id: Uuid,
    pub title_id: Uuid,
    pub purchased_at: OffsetDateTime,
}

impl From<DvdCopy> for DvdCopyDto {
    fn from(value: DvdCopy) -> Self {
        let DestructDvdCopy {
            id,
            title_id,
            purchased_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title_id: title_id.into(),
            purchased_at: purchased_at.into(),
        }
    }
}

pub struct RetireCopiesDto {
    pub copy_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RetirementReportDto {
    pub retired_count: usize,
    pub skipped: HashSet<Uuid>,
}
