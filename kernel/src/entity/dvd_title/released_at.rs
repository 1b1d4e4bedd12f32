use serde::{Deserialize, Serialize};
use time::Date;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ReleasedAt(Date);

impl ReleasedAt {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }
}
