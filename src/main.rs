use clap::Parser;
use gestao_forms::app::validate_csv_file;
use gestao_forms::config::{Commands, MaskKind};
use gestao_forms::core::{mask, tax_id};
use gestao_forms::domain::model::TaxIdValidation;
use gestao_forms::domain::ports::{AddressLookup, CompanyLookup};
use gestao_forms::utils::error::ErrorSeverity;
use gestao_forms::utils::{logger, validation::Validate};
use gestao_forms::{AppConfig, CliConfig, GestaoError, LookupService};

fn apply_mask(kind: MaskKind, value: &str) -> String {
    match kind {
        MaskKind::Cpf => mask::format_cpf(value),
        MaskKind::Cnpj => mask::format_cnpj(value),
        MaskKind::Document => mask::format_document(value),
        MaskKind::Phone => mask::format_phone(value),
        MaskKind::Cep => mask::format_cep(value),
        MaskKind::Currency => mask::format_currency(value),
    }
}

/// Runs the command; `Ok(false)` means the input was processed but rejected.
async fn run(cli: &CliConfig, config: &AppConfig) -> gestao_forms::Result<bool> {
    match &cli.command {
        Commands::Format { mask, value } => {
            println!("{}", apply_mask(*mask, value));
            Ok(true)
        }
        Commands::Validate { value, kind } => {
            let result = tax_id::validate_document(value, kind.map(Into::into));
            match &result.outcome {
                TaxIdValidation::Verified => println!("✅ válido"),
                TaxIdValidation::FormatOnly => println!("✅ válido (somente formato)"),
                TaxIdValidation::Rejected(reason) => println!("❌ inválido: {}", reason),
            }
            Ok(result.is_accepted())
        }
        Commands::Batch {
            input,
            column,
            output,
        } => {
            let summary = validate_csv_file(input, output.as_deref(), column)?;
            eprintln!(
                "📊 {} linhas: {} verificadas, {} somente formato, {} inválidas",
                summary.total, summary.verified, summary.format_only, summary.invalid
            );
            Ok(true)
        }
        Commands::Cep { value } => {
            let service = LookupService::from_config(config)?;
            let record = service.lookup_cep(value).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(true)
        }
        Commands::Cnpj { value } => {
            if !tax_id::validate_cnpj_detailed(value).is_verified() {
                return Err(GestaoError::invalid_input("cnpj", "CNPJ inválido"));
            }
            let service = LookupService::from_config(config)?;
            let record = service.lookup_cnpj(value).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(true)
        }
    }
}

fn exit_code(e: &GestaoError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0, // warning only
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report(e: &GestaoError) {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Sugestão: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli
        .validate()
        .and_then(|_| AppConfig::load(cli.config.as_deref()))
        .and_then(|config| config.validate().map(|_| config))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            report(&e);
            std::process::exit(1);
        }
    };

    match run(&cli, &config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            report(&e);
            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }
}
