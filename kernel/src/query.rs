mod dvd_copy;
mod dvd_title;
mod loan;

pub use self::{dvd_copy::*, dvd_title::*, loan::*};
