use crate::core::mask::only_digits;
use crate::domain::model::{AddressRecord, CompanyRecord};
use crate::domain::ports::{AddressLookup, CompanyLookup};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// In-memory map whose entries expire after a fixed time-to-live.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value and drop every entry that has already expired.
    pub async fn insert(&self, key: String, value: T) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Wraps a lookup service and remembers successful answers.
///
/// Keys are the digits of the queried value, so `01310-100` and `01310100`
/// share an entry. Failures are never cached.
pub struct CachedLookup<L> {
    inner: L,
    enabled: bool,
    addresses: TtlCache<AddressRecord>,
    companies: TtlCache<CompanyRecord>,
}

impl<L> CachedLookup<L> {
    pub fn new(inner: L, enabled: bool, cep_ttl: Duration, cnpj_ttl: Duration) -> Self {
        Self {
            inner,
            enabled,
            addresses: TtlCache::new(cep_ttl),
            companies: TtlCache::new(cnpj_ttl),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: AddressLookup> AddressLookup for CachedLookup<L> {
    async fn lookup_cep(&self, cep: &str) -> Result<AddressRecord> {
        if !self.enabled {
            return self.inner.lookup_cep(cep).await;
        }

        let key = only_digits(cep);
        if let Some(record) = self.addresses.get(&key).await {
            tracing::debug!("Cache hit for CEP {}", key);
            return Ok(record);
        }

        let record = self.inner.lookup_cep(cep).await?;
        self.addresses.insert(key, record.clone()).await;
        Ok(record)
    }
}

#[async_trait]
impl<L: CompanyLookup> CompanyLookup for CachedLookup<L> {
    async fn lookup_cnpj(&self, cnpj: &str) -> Result<CompanyRecord> {
        if !self.enabled {
            return self.inner.lookup_cnpj(cnpj).await;
        }

        let key = only_digits(cnpj);
        if let Some(record) = self.companies.get(&key).await {
            tracing::debug!("Cache hit for CNPJ {}", key);
            return Ok(record);
        }

        let record = self.inner.lookup_cnpj(cnpj).await?;
        self.companies.insert(key, record.clone()).await;
        Ok(record)
    }
}
