use crate::domain::model::PersonType;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gestao-forms")]
#[command(about = "Masks, validates and looks up Brazilian registration data (CPF, CNPJ, CEP)")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Apply a field mask to a value
    Format {
        #[arg(value_enum)]
        mask: MaskKind,
        value: String,
    },
    /// Validate a CPF or CNPJ
    Validate {
        value: String,
        #[arg(long, value_enum, help = "Force the identifier type instead of detecting it")]
        kind: Option<KindArg>,
    },
    /// Validate a column of CPF/CNPJ values in a CSV file
    Batch {
        input: PathBuf,
        #[arg(long, default_value = "documento")]
        column: String,
        #[arg(long, help = "Output CSV (defaults to stdout)")]
        output: Option<PathBuf>,
    },
    /// Look up an address by CEP
    Cep { value: String },
    /// Look up a company by CNPJ
    Cnpj { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MaskKind {
    Cpf,
    Cnpj,
    Document,
    Phone,
    Cep,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Cpf,
    Cnpj,
}

impl From<KindArg> for PersonType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Cpf => PersonType::Fisica,
            KindArg::Cnpj => PersonType::Juridica,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("--config", &path.to_string_lossy())?;
        }
        if let Commands::Batch {
            input,
            column,
            output,
        } = &self.command
        {
            validation::validate_path("input", &input.to_string_lossy())?;
            validation::validate_non_empty_string("--column", column)?;
            if let Some(output) = output {
                validation::validate_path("--output", &output.to_string_lossy())?;
            }
        }
        Ok(())
    }
}
