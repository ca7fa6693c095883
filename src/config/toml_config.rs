use crate::domain::ports::LookupSettings;
use crate::utils::error::{GestaoError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_BRASILAPI_URL: &str = "https://brasilapi.com.br";
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br";
/// CEPs rarely change.
pub const DEFAULT_CEP_TTL_SECONDS: u64 = 60 * 60 * 24 * 30;
/// Registry data can change daily.
pub const DEFAULT_CNPJ_TTL_SECONDS: u64 = 60 * 60 * 24;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub form: FormConfig,
}

/// Service used for CEP lookups. CNPJ lookups always go to BrasilAPI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CepProvider {
    #[default]
    BrasilApi,
    ViaCep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
}

fn default_brasilapi() -> ServiceConfig {
    ServiceConfig {
        base_url: DEFAULT_BRASILAPI_URL.to_string(),
    }
}

fn default_viacep() -> ServiceConfig {
    ServiceConfig {
        base_url: DEFAULT_VIACEP_URL.to_string(),
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "GestaoContrato/1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cep_ttl() -> u64 {
    DEFAULT_CEP_TTL_SECONDS
}

fn default_cnpj_ttl() -> u64 {
    DEFAULT_CNPJ_TTL_SECONDS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub provider: CepProvider,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_brasilapi")]
    pub brasilapi: ServiceConfig,
    #[serde(default = "default_viacep")]
    pub viacep: ServiceConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            provider: CepProvider::default(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            brasilapi: default_brasilapi(),
            viacep: default_viacep(),
        }
    }
}

impl LookupSettings for LookupConfig {
    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cep_ttl")]
    pub cep_ttl_seconds: u64,
    #[serde(default = "default_cnpj_ttl")]
    pub cnpj_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cep_ttl_seconds: DEFAULT_CEP_TTL_SECONDS,
            cnpj_ttl_seconds: DEFAULT_CNPJ_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Canonical record field -> form field name, for forms that rename fields.
    #[serde(default)]
    pub field_names: HashMap<String, String>,
}

impl AppConfig {
    /// Read and parse a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GestaoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GestaoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Load the file when given, otherwise fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Replace `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GestaoError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Check URLs, timeouts, cache TTLs and field-name overrides.
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("lookup.brasilapi.base_url", &self.lookup.brasilapi.base_url)?;
        validation::validate_url("lookup.viacep.base_url", &self.lookup.viacep.base_url)?;
        validation::validate_range("lookup.timeout_seconds", self.lookup.timeout_seconds, 1, 120)?;
        validation::validate_non_empty_string("lookup.user_agent", &self.lookup.user_agent)?;

        if self.cache.enabled {
            validation::validate_positive_number("cache.cep_ttl_seconds", self.cache.cep_ttl_seconds, 1)?;
            validation::validate_positive_number(
                "cache.cnpj_ttl_seconds",
                self.cache.cnpj_ttl_seconds,
                1,
            )?;
        }

        for (canonical, form_name) in &self.form.field_names {
            validation::validate_non_empty_string(&format!("form.field_names.{}", canonical), form_name)?;
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
