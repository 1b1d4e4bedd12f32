use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

// Monetary amounts are integer cents.

#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct StandardCharge(i64);

impl StandardCharge {
    pub fn new(charge: impl Into<i64>) -> Self {
        Self(charge.into())
    }
}

/*
 * Charge per whole day a copy is returned late. Never negative; the schema
 * carries the matching CHECK constraint.
 */
#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct PenaltyRate(i64);

impl PenaltyRate {
    pub fn new(rate: impl Into<i64>) -> Self {
        let rate = rate.into();
        Self(rate.max(0))
    }
}
