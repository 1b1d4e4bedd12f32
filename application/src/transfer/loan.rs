use uuid::Uuid;

pub struct ReturnCopyDto {
    pub copy_id: Uuid,
}

/*
 * Outcome of a return request. `NotFound` and `AlreadyReturned` are part of
 * the contract, not error conditions; the penalty is in integer cents.
 */
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ReturnOutcomeDto {
    Returned { penalty: Option<i64> },
    AlreadyReturned,
    NotFound,
}
