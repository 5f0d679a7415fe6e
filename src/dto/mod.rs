//! DTO modules that bridge the REST backend with list controllers.

pub mod api;
