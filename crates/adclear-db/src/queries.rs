//! Database query functions organized by domain.

pub mod distributions;
pub mod ledger;
pub mod payments;
pub mod users;
