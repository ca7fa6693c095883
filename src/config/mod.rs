#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{AppConfig, CacheConfig, CepProvider, FormConfig, LookupConfig};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Commands, KindArg, MaskKind};
