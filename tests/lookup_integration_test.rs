use anyhow::Result;
use gestao_forms::config::{AppConfig, CepProvider};
use gestao_forms::core::form::{
    execute_lookup, update, Command, FieldEvent, FieldMapping, FieldStatus, FormState,
};
use gestao_forms::domain::ports::{AddressLookup, CompanyLookup};
use gestao_forms::{GestaoError, LookupService, PersonType};
use httpmock::prelude::*;

fn config_for(server: &MockServer, provider: CepProvider) -> AppConfig {
    let mut config = AppConfig::default();
    config.lookup.provider = provider;
    config.lookup.brasilapi.base_url = server.base_url();
    config.lookup.viacep.base_url = server.base_url();
    config
}

fn run_events(form: &mut FormState, events: Vec<FieldEvent>) -> Vec<Command> {
    let mut cmds = Vec::new();
    for event in events {
        update(form, event, &mut cmds);
    }
    cmds
}

#[tokio::test]
async fn test_cep_lookup_is_cached_across_masks() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/cep/v2/01310100")
            .header("user-agent", "GestaoContrato/1.0");
        then.status(200).json_body(serde_json::json!({
            "cep": "01310100",
            "state": "SP",
            "city": "São Paulo",
            "neighborhood": "Bela Vista",
            "street": "Avenida Paulista"
        }));
    });

    let service = LookupService::from_config(&config_for(&server, CepProvider::BrasilApi))?;
    let first = service.lookup_cep("01310-100").await?;
    let second = service.lookup_cep("01310100").await?;

    api_mock.assert_hits(1);
    assert_eq!(first, second);
    assert_eq!(first.fonte, "BrasilAPI");
    Ok(())
}

#[tokio::test]
async fn test_viacep_provider_and_disabled_cache() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ws/20040020/json/");
        then.status(200).json_body(serde_json::json!({
            "cep": "20040-020",
            "logradouro": "Avenida Rio Branco",
            "bairro": "Centro",
            "localidade": "Rio de Janeiro",
            "uf": "RJ"
        }));
    });

    let mut config = config_for(&server, CepProvider::ViaCep);
    config.cache.enabled = false;
    let service = LookupService::from_config(&config)?;

    service.lookup_cep("20040020").await?;
    let record = service.lookup_cep("20040020").await?;

    api_mock.assert_hits(2);
    assert_eq!(record.cidade, "Rio de Janeiro");
    assert_eq!(record.fonte, "ViaCEP");
    Ok(())
}

#[tokio::test]
async fn test_cnpj_not_found_is_not_cached() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/cnpj/v1/11222333000181");
        then.status(404)
            .json_body(serde_json::json!({ "message": "CNPJ 11222333000181 não encontrado." }));
    });

    let service = LookupService::from_config(&config_for(&server, CepProvider::BrasilApi))?;
    for _ in 0..2 {
        match service.lookup_cnpj("11.222.333/0001-81").await {
            Err(GestaoError::NotFound { resource, .. }) => assert_eq!(resource, "CNPJ"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    api_mock.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn test_form_fills_company_from_lookup() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/cnpj/v1/11222333000181");
        then.status(200).json_body(serde_json::json!({
            "cnpj": "11222333000181",
            "razao_social": "EMPRESA EXEMPLO LTDA",
            "nome_fantasia": "EXEMPLO",
            "descricao_situacao_cadastral": "ATIVA",
            "cep": "01310100",
            "logradouro": "PAULISTA",
            "descricao_tipo_de_logradouro": "AVENIDA",
            "numero": "1000",
            "bairro": "BELA VISTA",
            "municipio": "SAO PAULO",
            "uf": "SP",
            "ddd_telefone_1": "1133334444"
        }));
    });

    let service = LookupService::from_config(&config_for(&server, CepProvider::BrasilApi))?;
    let mut form = FormState::new(
        [
            "cnpj",
            "razao_social",
            "nome_fantasia",
            "telefone",
            "cep",
            "logradouro",
            "numero",
            "cidade",
            "estado",
        ],
        FieldMapping::new(),
    );

    let cmds = run_events(
        &mut form,
        vec![
            FieldEvent::PersonTypeChanged(PersonType::Juridica),
            FieldEvent::Input {
                field: "cnpj".to_string(),
                raw: "11222333000181".to_string(),
            },
            FieldEvent::Blur {
                field: "cnpj".to_string(),
            },
        ],
    );
    assert_eq!(cmds.len(), 1);

    let event = execute_lookup(&cmds[0], &service, &service)
        .await
        .expect("lookup command yields an event");
    let follow_up = run_events(&mut form, vec![event]);

    assert_eq!(form.value("razao_social"), Some("EMPRESA EXEMPLO LTDA"));
    assert_eq!(form.value("logradouro"), Some("AVENIDA PAULISTA"));
    assert_eq!(form.value("cep"), Some("01310-100"));
    assert_eq!(form.value("telefone"), Some("(11) 3333-4444"));
    assert_eq!(form.field("cnpj").map(|f| &f.status), Some(&FieldStatus::Valid));
    assert_eq!(follow_up.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_form_reports_missing_cep() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ws/99999999/json/");
        then.status(200).json_body(serde_json::json!({ "erro": true }));
    });

    let service = LookupService::from_config(&config_for(&server, CepProvider::ViaCep))?;
    let mut form = FormState::new(["cep", "logradouro"], FieldMapping::new());
    let cmds = run_events(
        &mut form,
        vec![
            FieldEvent::Input {
                field: "cep".to_string(),
                raw: "99999-999".to_string(),
            },
            FieldEvent::Blur {
                field: "cep".to_string(),
            },
        ],
    );

    let event = execute_lookup(&cmds[0], &service, &service)
        .await
        .expect("lookup command yields an event");
    run_events(&mut form, vec![event]);

    assert_eq!(
        form.field("cep").map(|f| f.status.clone()),
        Some(FieldStatus::Invalid("CEP não encontrado".to_string()))
    );
    assert_eq!(form.value("logradouro"), Some(""));
    Ok(())
}
