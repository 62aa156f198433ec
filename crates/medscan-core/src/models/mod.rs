//! Domain models for medication identification.

mod corpus;
mod history;
mod identification;
mod medication;

pub use corpus::*;
pub use history::*;
pub use identification::*;
pub use medication::*;
