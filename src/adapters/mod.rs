//! Lookup services backed by external HTTP APIs.

pub mod brasilapi;
pub mod cache;
pub mod http;
pub mod viacep;

use crate::config::{AppConfig, CepProvider};
use crate::domain::model::{AddressRecord, CompanyRecord};
use crate::domain::ports::{AddressLookup, CompanyLookup};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub use brasilapi::BrasilApiClient;
pub use cache::{CachedLookup, TtlCache};
pub use viacep::ViaCepClient;

/// The configured CEP provider plus BrasilAPI for CNPJ.
pub struct Providers {
    address: Box<dyn AddressLookup>,
    company: BrasilApiClient,
}

#[async_trait]
impl AddressLookup for Providers {
    async fn lookup_cep(&self, cep: &str) -> Result<AddressRecord> {
        self.address.lookup_cep(cep).await
    }
}

#[async_trait]
impl CompanyLookup for Providers {
    async fn lookup_cnpj(&self, cnpj: &str) -> Result<CompanyRecord> {
        self.company.lookup_cnpj(cnpj).await
    }
}

/// Both lookup ports, wired from [`AppConfig`] and cached.
pub struct LookupService {
    inner: CachedLookup<Providers>,
}

impl LookupService {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let lookup = &config.lookup;
        let company = BrasilApiClient::new(lookup.brasilapi.base_url.clone(), lookup)?;
        let address: Box<dyn AddressLookup> = match lookup.provider {
            CepProvider::BrasilApi => Box::new(BrasilApiClient::new(
                lookup.brasilapi.base_url.clone(),
                lookup,
            )?),
            CepProvider::ViaCep => {
                Box::new(ViaCepClient::new(lookup.viacep.base_url.clone(), lookup)?)
            }
        };
        tracing::debug!(
            "Lookup service ready (CEP provider: {:?}, cache: {})",
            lookup.provider,
            config.cache.enabled
        );

        Ok(Self {
            inner: CachedLookup::new(
                Providers { address, company },
                config.cache.enabled,
                Duration::from_secs(config.cache.cep_ttl_seconds),
                Duration::from_secs(config.cache.cnpj_ttl_seconds),
            ),
        })
    }
}

#[async_trait]
impl AddressLookup for LookupService {
    async fn lookup_cep(&self, cep: &str) -> Result<AddressRecord> {
        self.inner.lookup_cep(cep).await
    }
}

#[async_trait]
impl CompanyLookup for LookupService {
    async fn lookup_cnpj(&self, cnpj: &str) -> Result<CompanyRecord> {
        self.inner.lookup_cnpj(cnpj).await
    }
}
