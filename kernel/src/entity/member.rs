use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

/*
 * Loans only carry the borrower's identifier. The member record itself
 * (name, address, membership category) belongs to the presentation side
 * of the shop and is not consumed by the lifecycle core.
 */
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
