//! List-state controllers for the help desk dashboard.
//!
//! Every list page of the dashboard (customers, tickets, tasks, invoices,
//! payments, products, trashed tickets) shows one page of a REST collection
//! with search, filters and pagination. [`controller::ListController`] owns
//! that state for one endpoint; [`resources::ResourceKind`] describes the
//! endpoints the dashboard knows about.

pub mod controller;
pub mod domain;
pub mod dto;
pub mod export;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod resources;
pub mod store;

pub use controller::{ListController, ListSettings, SessionEvent};
pub use domain::list::{ListResult, ListState, ListStatus};
pub use domain::query::{FilterValue, ListQuery, Sort, SortDirection};
pub use resources::ResourceKind;
