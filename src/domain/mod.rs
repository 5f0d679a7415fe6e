//! Domain types shared by list controllers and the rows they display.

pub mod billing;
pub mod customer;
pub mod list;
pub mod query;
pub mod ticket;
pub mod types;
