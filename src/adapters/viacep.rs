use crate::adapters::http::{build_client, join_url, request_error, status_error};
use crate::core::mask::{format_cep, only_digits};
use crate::domain::model::AddressRecord;
use crate::domain::ports::{AddressLookup, LookupSettings};
use crate::utils::error::{GestaoError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const SERVICE: &str = "ViaCEP";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    /// Present (`true` or `"true"`) when the CEP does not exist.
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    ibge: Option<String>,
    #[serde(default)]
    ddd: Option<String>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(_) => true,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>, settings: &dyn LookupSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup_cep(&self, cep: &str) -> Result<AddressRecord> {
        let digits = only_digits(cep);
        if digits.len() != 8 {
            tracing::warn!("CEP inválido: {}", cep);
            return Err(GestaoError::invalid_input("cep", "CEP deve ter 8 dígitos"));
        }

        let url = join_url(&self.base_url, &format!("ws/{}/json/", digits));
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(SERVICE, e))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        match status {
            StatusCode::BAD_REQUEST => {
                return Err(GestaoError::invalid_input("cep", "CEP inválido"));
            }
            StatusCode::NOT_FOUND => {
                return Err(GestaoError::NotFound {
                    resource: "CEP".to_string(),
                    key: digits,
                });
            }
            s if !s.is_success() => return Err(status_error(SERVICE, s)),
            _ => {}
        }

        let body: ViaCepResponse = response.json().await.map_err(|e| request_error(SERVICE, e))?;
        if body.is_error() {
            tracing::info!("CEP {} não encontrado", digits);
            return Err(GestaoError::NotFound {
                resource: "CEP".to_string(),
                key: digits,
            });
        }

        let record = AddressRecord {
            cep: format_cep(body.cep.as_deref().unwrap_or(&digits)),
            logradouro: body.logradouro.unwrap_or_default(),
            complemento: body.complemento.unwrap_or_default(),
            bairro: body.bairro.unwrap_or_default(),
            cidade: body.localidade.unwrap_or_default(),
            estado: body.uf.unwrap_or_default(),
            ibge: non_empty(body.ibge),
            ddd: non_empty(body.ddd),
            fonte: SERVICE.to_string(),
        };
        tracing::info!(
            "📍 CEP {} encontrado: {}/{}",
            digits,
            record.cidade,
            record.estado
        );
        Ok(record)
    }
}
