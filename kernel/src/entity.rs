mod dvd_copy;
mod dvd_title;
mod loan;
mod member;

pub use self::{dvd_copy::*, dvd_title::*, loan::*, member::*};
