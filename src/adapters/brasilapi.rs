use crate::adapters::http::{build_client, join_url, request_error, status_error};
use crate::core::mask::{format_cep, format_cnpj, only_digits};
use crate::domain::model::{AddressRecord, Cnae, CompanyRecord, Partner};
use crate::domain::ports::{AddressLookup, CompanyLookup, LookupSettings};
use crate::utils::error::{GestaoError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

const SERVICE: &str = "BrasilAPI";

#[derive(Debug, Deserialize)]
struct CepV2Response {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    neighborhood: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    complement: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CnaeResponse {
    #[serde(default)]
    codigo: Option<Value>,
    #[serde(default)]
    descricao: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SocioResponse {
    #[serde(default)]
    nome_socio: Option<String>,
    #[serde(default)]
    qualificacao_socio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CnpjResponse {
    #[serde(default)]
    cnpj: Option<String>,
    #[serde(default)]
    razao_social: Option<String>,
    #[serde(default)]
    nome_fantasia: Option<String>,
    #[serde(default)]
    descricao_situacao_cadastral: Option<String>,
    #[serde(default)]
    data_situacao_cadastral: Option<String>,
    #[serde(default)]
    descricao_natureza_juridica: Option<String>,
    #[serde(default)]
    natureza_juridica: Option<String>,
    #[serde(default)]
    capital_social: Option<f64>,
    #[serde(default)]
    porte: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    ddd_telefone_1: Option<String>,
    #[serde(default)]
    ddd_telefone_2: Option<String>,
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    descricao_tipo_de_logradouro: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    numero: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    municipio: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    cnae_fiscal: Option<Value>,
    #[serde(default)]
    cnae_fiscal_descricao: Option<String>,
    #[serde(default)]
    cnaes_secundarios: Vec<CnaeResponse>,
    #[serde(default)]
    qsa: Vec<SocioResponse>,
    #[serde(default)]
    data_inicio_atividade: Option<String>,
}

/// Codes come back as numbers or strings depending on the endpoint version.
fn code_to_string(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

impl CnpjResponse {
    fn into_record(self, cnpj_digits: &str) -> CompanyRecord {
        let logradouro = format!(
            "{} {}",
            self.descricao_tipo_de_logradouro.unwrap_or_default(),
            self.logradouro.unwrap_or_default()
        )
        .trim()
        .to_string();

        CompanyRecord {
            cnpj: format_cnpj(self.cnpj.as_deref().unwrap_or(cnpj_digits)),
            razao_social: self.razao_social.unwrap_or_default(),
            nome_fantasia: self.nome_fantasia.unwrap_or_default(),
            situacao_cadastral: self.descricao_situacao_cadastral.unwrap_or_default(),
            data_situacao_cadastral: parse_date(self.data_situacao_cadastral.as_deref()),
            natureza_juridica: self
                .descricao_natureza_juridica
                .or(self.natureza_juridica)
                .unwrap_or_default(),
            capital_social: self.capital_social.unwrap_or(0.0),
            porte: self.porte.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            telefone: self.ddd_telefone_1.unwrap_or_default(),
            telefone_2: self.ddd_telefone_2.unwrap_or_default(),
            cep: self.cep.as_deref().map(format_cep).unwrap_or_default(),
            logradouro,
            numero: self.numero.unwrap_or_default(),
            complemento: self.complemento.unwrap_or_default(),
            bairro: self.bairro.unwrap_or_default(),
            cidade: self.municipio.unwrap_or_default(),
            estado: self.uf.unwrap_or_default(),
            cnae_principal: Cnae {
                codigo: code_to_string(self.cnae_fiscal),
                descricao: self.cnae_fiscal_descricao.unwrap_or_default(),
            },
            cnaes_secundarios: self
                .cnaes_secundarios
                .into_iter()
                .map(|c| Cnae {
                    codigo: code_to_string(c.codigo),
                    descricao: c.descricao.unwrap_or_default(),
                })
                // the API sends a single zero entry when there are none
                .filter(|c| !c.codigo.is_empty() && c.codigo != "0")
                .collect(),
            socios: self
                .qsa
                .into_iter()
                .map(|s| Partner {
                    nome: s.nome_socio.unwrap_or_default(),
                    qualificacao: s.qualificacao_socio.unwrap_or_default(),
                })
                .collect(),
            data_inicio_atividade: parse_date(self.data_inicio_atividade.as_deref()),
            fonte: SERVICE.to_string(),
        }
    }
}

/// BrasilAPI client for CEP (v2) and CNPJ (v1) lookups.
pub struct BrasilApiClient {
    client: Client,
    base_url: String,
}

impl BrasilApiClient {
    pub fn new(base_url: impl Into<String>, settings: &dyn LookupSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: base_url.into(),
        })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = join_url(&self.base_url, path);
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(SERVICE, e))?;
        tracing::debug!("API response status: {}", response.status());
        Ok(response)
    }
}

#[async_trait]
impl AddressLookup for BrasilApiClient {
    async fn lookup_cep(&self, cep: &str) -> Result<AddressRecord> {
        let digits = only_digits(cep);
        if digits.len() != 8 {
            tracing::warn!("CEP inválido: {}", cep);
            return Err(GestaoError::invalid_input("cep", "CEP deve ter 8 dígitos"));
        }

        let response = self.get(&format!("api/cep/v2/{}", digits)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::info!("CEP {} não encontrado", digits);
                return Err(GestaoError::NotFound {
                    resource: "CEP".to_string(),
                    key: digits,
                });
            }
            s if !s.is_success() => return Err(status_error(SERVICE, s)),
            _ => {}
        }

        let body: CepV2Response = response.json().await.map_err(|e| request_error(SERVICE, e))?;
        let record = AddressRecord {
            cep: format_cep(body.cep.as_deref().unwrap_or(&digits)),
            logradouro: body.street.unwrap_or_default(),
            complemento: body.complement.unwrap_or_default(),
            bairro: body.neighborhood.unwrap_or_default(),
            cidade: body.city.unwrap_or_default(),
            estado: body.state.unwrap_or_default(),
            ibge: None,
            ddd: None,
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

#[async_trait]
impl CompanyLookup for BrasilApiClient {
    async fn lookup_cnpj(&self, cnpj: &str) -> Result<CompanyRecord> {
        let digits = only_digits(cnpj);
        if digits.len() != 14 {
            tracing::warn!("CNPJ inválido: {}", cnpj);
            return Err(GestaoError::invalid_input("cnpj", "CNPJ deve conter 14 dígitos"));
        }

        let response = self.get(&format!("api/cnpj/v1/{}", digits)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::info!("CNPJ {} não encontrado", digits);
                return Err(GestaoError::NotFound {
                    resource: "CNPJ".to_string(),
                    key: digits,
                });
            }
            StatusCode::BAD_REQUEST => {
                tracing::info!("CNPJ {} rejeitado pela API", digits);
                return Err(GestaoError::invalid_input("cnpj", "CNPJ inválido"));
            }
            s if !s.is_success() => return Err(status_error(SERVICE, s)),
            _ => {}
        }

        let body: CnpjResponse = response.json().await.map_err(|e| request_error(SERVICE, e))?;
        let record = body.into_record(&digits);
        tracing::info!("🏢 CNPJ {} encontrado: {}", digits, record.razao_social);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupConfig;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> BrasilApiClient {
        BrasilApiClient::new(server.base_url(), &LookupConfig::default()).unwrap()
    }

    fn company_body() -> Value {
        serde_json::json!({
            "cnpj": "00000000000191",
            "razao_social": "BANCO DO BRASIL SA",
            "nome_fantasia": "DIRECAO GERAL",
            "descricao_situacao_cadastral": "ATIVA",
            "data_situacao_cadastral": "2005-11-03",
            "descricao_natureza_juridica": "Sociedade de Economia Mista",
            "capital_social": 120000000000.0,
            "porte": "DEMAIS",
            "email": null,
            "ddd_telefone_1": "6134939002",
            "ddd_telefone_2": "",
            "cep": "70040912",
            "descricao_tipo_de_logradouro": "QUADRA",
            "logradouro": "SAUN QUADRA 5 LOTE B",
            "numero": "S/N",
            "complemento": "ANDAR 1 A 16",
            "bairro": "ASA NORTE",
            "municipio": "BRASILIA",
            "uf": "DF",
            "cnae_fiscal": 6422100,
            "cnae_fiscal_descricao": "Bancos múltiplos, com carteira comercial",
            "cnaes_secundarios": [
                { "codigo": 0, "descricao": "" }
            ],
            "qsa": [
                { "nome_socio": "FULANO DE TAL", "qualificacao_socio": "Presidente" }
            ],
            "data_inicio_atividade": "1966-08-01"
        })
    }

    #[tokio::test]
    async fn test_lookup_cep_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/cep/v2/01310100");
            then.status(200).json_body(serde_json::json!({
                "cep": "01310100",
                "state": "SP",
                "city": "São Paulo",
                "neighborhood": "Bela Vista",
                "street": "Avenida Paulista",
                "service": "open-cep"
            }));
        });

        let record = client(&server).lookup_cep("01310-100").await.unwrap();

        api_mock.assert();
        assert_eq!(record.cep, "01310-100");
        assert_eq!(record.logradouro, "Avenida Paulista");
        assert_eq!(record.complemento, "");
        assert_eq!(record.fonte, "BrasilAPI");
    }

    #[tokio::test]
    async fn test_lookup_cep_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/cep/v2/99999999");
            then.status(404)
                .json_body(serde_json::json!({ "message": "Todos os serviços de CEP retornaram erro." }));
        });

        let err = client(&server).lookup_cep("99999999").await.unwrap_err();
        assert!(matches!(err, GestaoError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lookup_cnpj_normalizes_record() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/cnpj/v1/00000000000191");
            then.status(200).json_body(company_body());
        });

        let record = client(&server)
            .lookup_cnpj("00.000.000/0001-91")
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(record.cnpj, "00.000.000/0001-91");
        assert_eq!(record.razao_social, "BANCO DO BRASIL SA");
        assert!(record.is_active());
        assert_eq!(
            record.data_situacao_cadastral,
            NaiveDate::from_ymd_opt(2005, 11, 3)
        );
        assert_eq!(record.email, "");
        assert_eq!(record.cep, "70040-912");
        assert_eq!(record.logradouro, "QUADRA SAUN QUADRA 5 LOTE B");
        assert_eq!(record.cidade, "BRASILIA");
        assert_eq!(record.cnae_principal.codigo, "6422100");
        assert!(record.cnaes_secundarios.is_empty());
        assert_eq!(record.socios.len(), 1);
        assert_eq!(record.socios[0].qualificacao, "Presidente");
    }

    #[tokio::test]
    async fn test_lookup_cnpj_error_statuses() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/cnpj/v1/11222333000181");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/cnpj/v1/11222333000182");
            then.status(400);
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/cnpj/v1/11444777000161");
            then.status(500);
        });

        let api = client(&server);
        let not_found = api.lookup_cnpj("11222333000181").await.unwrap_err();
        assert_eq!(not_found.user_friendly_message(), "CNPJ não encontrado");

        let bad_request = api.lookup_cnpj("11222333000182").await.unwrap_err();
        assert_eq!(bad_request.user_friendly_message(), "CNPJ inválido");

        let server_error = api.lookup_cnpj("11444777000161").await.unwrap_err();
        assert!(matches!(
            server_error,
            GestaoError::UpstreamStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_lookup_cnpj_rejects_short_input() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let err = client(&server).lookup_cnpj("11.222.333").await.unwrap_err();
        api_mock.assert_hits(0);
        assert!(matches!(err, GestaoError::InvalidInput { .. }));
    }
}
