use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct DvdCopyId(Uuid);

impl DvdCopyId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
