pub mod api;
pub mod config;
pub mod datasets;
pub mod db;
