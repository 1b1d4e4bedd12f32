mod charge;
mod id;
mod name;
mod released_at;

pub use self::{charge::*, id::*, name::*, released_at::*};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct DvdTitle {
    id: DvdTitleId,
    name: TitleName,
    standard_charge: StandardCharge,
    penalty_rate: PenaltyRate,
    released_at: ReleasedAt,
}

impl DvdTitle {
    pub fn new(
        id: DvdTitleId,
        name: TitleName,
        standard_charge: StandardCharge,
        penalty_rate: PenaltyRate,
        released_at: ReleasedAt,
    ) -> Self {
        Self {
            id,
            name,
            standard_charge,
            penalty_rate,
            released_at,
        }
    }
}
