pub mod filter;
pub mod service;

pub use filter::DatasetFilter;
pub use service::{DatasetAttributes, DatasetError, DatasetService, ValidationErrors};
