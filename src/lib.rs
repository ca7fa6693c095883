pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LookupService;
pub use config::AppConfig;
pub use domain::model::{
    AddressRecord, CompanyRecord, PersonType, TaxIdKind, TaxIdRejection, TaxIdValidation,
};
pub use utils::error::{GestaoError, Result};
