//! Domain models for the calculator.

mod drug;
mod guidelines;
mod patient;
mod results;

pub use drug::*;
pub use guidelines::*;
pub use patient::*;
pub use results::*;
