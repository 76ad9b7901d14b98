pub mod api;
pub mod flow;
pub mod models;
