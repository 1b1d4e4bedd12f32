mod loan;
mod retirement;

pub use self::{loan::*, retirement::*};

#[cfg(test)]
pub(crate) mod test_store;
