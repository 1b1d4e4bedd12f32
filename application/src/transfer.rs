mod loan;
mod retirement;

pub use self::{loan::*, retirement::*};
