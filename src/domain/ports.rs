use crate::domain::model::{AddressRecord, CompanyRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Resolves a postal code (CEP) into an address.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup_cep(&self, cep: &str) -> Result<AddressRecord>;
}

/// Resolves a CNPJ into the company's registry data.
#[async_trait]
pub trait CompanyLookup: Send + Sync {
    async fn lookup_cnpj(&self, cnpj: &str) -> Result<CompanyRecord>;
}

pub trait LookupSettings: Send + Sync {
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
}
