pub mod analyzers;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod output;
pub mod parser;
pub mod records;
pub mod stats;

pub use dataset::{DateRange, FilteredView, RentalDataset};
pub use error::DashboardError;
pub use labels::LabelConfig;
pub use stats::DashboardStats;
