pub mod batch;

pub use batch::{validate_csv, validate_csv_file, BatchSummary};
