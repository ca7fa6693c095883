use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which identifier a document value represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxIdKind {
    Cpf,
    Cnpj,
}

impl std::fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxIdKind::Cpf => write!(f, "CPF"),
            TaxIdKind::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// Person-type selector on registration forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersonType {
    /// Pessoa física, identified by CPF.
    #[default]
    #[serde(rename = "PF")]
    Fisica,
    /// Pessoa jurídica, identified by CNPJ.
    #[serde(rename = "PJ")]
    Juridica,
}

impl PersonType {
    pub fn tax_id_kind(self) -> TaxIdKind {
        match self {
            PersonType::Fisica => TaxIdKind::Cpf,
            PersonType::Juridica => TaxIdKind::Cnpj,
        }
    }
}

impl std::str::FromStr for PersonType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PF" | "CPF" => Ok(PersonType::Fisica),
            "PJ" | "CNPJ" => Ok(PersonType::Juridica),
            other => Err(format!("unknown person type: {}", other)),
        }
    }
}

/// Why a tax-id value was rejected. The messages are the ones shown next to the field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdRejection {
    #[error("deve conter {expected} caracteres (encontrados {found})")]
    WrongLength { expected: usize, found: usize },

    #[error("deve conter 11 (CPF) ou 14 (CNPJ) caracteres (encontrados {found})")]
    UnrecognizedLength { found: usize },

    #[error("contém caracteres inválidos")]
    InvalidCharacters,

    #[error("todos os dígitos são iguais")]
    RepeatedDigits,

    #[error("dígito verificador não confere")]
    CheckDigitMismatch,
}

/// Outcome of validating a CPF or CNPJ.
///
/// A CPF is either `Verified` or `Rejected`. Alphanumeric CNPJs are accepted
/// on format alone until the issuing authority publishes their check-digit
/// rule, so callers that need a checked identifier must match on `Verified`
/// rather than rely on [`TaxIdValidation::is_accepted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxIdValidation {
    Verified,
    FormatOnly,
    Rejected(TaxIdRejection),
}

impl TaxIdValidation {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, TaxIdValidation::Rejected(_))
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, TaxIdValidation::Verified)
    }
}

/// Result of validating a value that may be either a CPF or a CNPJ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentValidation {
    /// `None` when the length matched neither identifier.
    pub kind: Option<TaxIdKind>,
    pub outcome: TaxIdValidation,
}

impl DocumentValidation {
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_accepted()
    }
}

/// Address returned by a postal-code lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddressRecord {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub ibge: Option<String>,
    pub ddd: Option<String>,
    pub fonte: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cnae {
    pub codigo: String,
    pub descricao: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Partner {
    pub nome: String,
    pub qualificacao: String,
}

/// Company data returned by a registry lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub cnpj: String,
    pub razao_social: String,
    pub nome_fantasia: String,
    pub situacao_cadastral: String,
    pub data_situacao_cadastral: Option<NaiveDate>,
    pub natureza_juridica: String,
    pub capital_social: f64,
    pub porte: String,

    pub email: String,
    pub telefone: String,
    pub telefone_2: String,

    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,

    pub cnae_principal: Cnae,
    pub cnaes_secundarios: Vec<Cnae>,
    pub socios: Vec<Partner>,
    pub data_inicio_atividade: Option<NaiveDate>,
    pub fonte: String,
}

impl CompanyRecord {
    pub fn is_active(&self) -> bool {
        self.situacao_cadastral.eq_ignore_ascii_case("ATIVA")
    }
}
