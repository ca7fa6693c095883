//! Registration form state driven by field events.
//!
//! The form is a plain value updated by [`update`]; side effects (lookups,
//! toasts, focus, submit) come back as [`Command`]s for the caller to run.
//! Lookups are turned back into events by [`execute_lookup`].

use std::collections::{BTreeMap, HashMap};

use crate::config::FormConfig;
use crate::core::contact::{validate_email_format, validate_phone_format};
use crate::core::mask::{
    format_cep, format_cnpj, format_cpf, format_currency, format_document, format_phone,
    only_digits,
};
use crate::core::tax_id::{validate_cpf, validate_cnpj_detailed, validate_document};
use crate::domain::model::{AddressRecord, CompanyRecord, PersonType, TaxIdValidation};
use crate::domain::ports::{AddressLookup, CompanyLookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Cpf,
    Cnpj,
    /// Combined "CPF ou CNPJ" input.
    Document,
    Phone,
    Cep,
    Currency,
    Email,
    Text,
}

impl FieldKind {
    /// Default schema for the application's field names.
    pub fn for_field(name: &str) -> Self {
        match name {
            "cpf" | "conjuge_cpf" => FieldKind::Cpf,
            "cnpj" => FieldKind::Cnpj,
            "documento" => FieldKind::Document,
            "telefone" | "telefone_2" | "celular" => FieldKind::Phone,
            "cep" => FieldKind::Cep,
            "email" => FieldKind::Email,
            n if n.starts_with("valor") => FieldKind::Currency,
            _ => FieldKind::Text,
        }
    }

    pub fn mask(self, raw: &str) -> String {
        match self {
            FieldKind::Cpf => format_cpf(raw),
            FieldKind::Cnpj => format_cnpj(raw),
            FieldKind::Document => format_document(raw),
            FieldKind::Phone => format_phone(raw),
            FieldKind::Cep => format_cep(raw),
            FieldKind::Currency => format_currency(raw),
            FieldKind::Email | FieldKind::Text => raw.to_string(),
        }
    }
}

/// Form sections toggled by the person-type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Common,
    PessoaFisica,
    PessoaJuridica,
}

impl Section {
    pub fn of_field(name: &str) -> Self {
        match name {
            "cpf" | "rg" | "data_nascimento" | "estado_civil" | "profissao" => {
                Section::PessoaFisica
            }
            n if n.starts_with("conjuge_") => Section::PessoaFisica,
            "cnpj" | "razao_social" | "nome_fantasia" | "inscricao_estadual" => {
                Section::PessoaJuridica
            }
            _ => Section::Common,
        }
    }

    pub fn is_visible_for(self, person_type: PersonType) -> bool {
        match self {
            Section::Common => true,
            Section::PessoaFisica => person_type == PersonType::Fisica,
            Section::PessoaJuridica => person_type == PersonType::Juridica,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Untouched,
    Pending,
    Valid,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub kind: FieldKind,
    pub value: String,
    pub status: FieldStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
}

/// Explicit mapping from lookup-record field names to form field names.
///
/// Record fields use the canonical names (`logradouro`, `cidade`, ...). A form
/// that names a field differently overrides just that entry.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    overrides: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Mapping from the `[form.field_names]` section of the configuration.
    pub fn from_config(config: &FormConfig) -> Self {
        Self::with_overrides(config.field_names.clone())
    }

    pub fn form_field<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.overrides
            .get(canonical)
            .map(String::as_str)
            .unwrap_or(canonical)
    }
}

fn address_values(record: &AddressRecord) -> [(&'static str, &str); 5] {
    [
        ("logradouro", record.logradouro.as_str()),
        ("complemento", record.complemento.as_str()),
        ("bairro", record.bairro.as_str()),
        ("cidade", record.cidade.as_str()),
        ("estado", record.estado.as_str()),
    ]
}

fn company_values(record: &CompanyRecord) -> [(&'static str, &str); 11] {
    [
        ("razao_social", record.razao_social.as_str()),
        ("nome_fantasia", record.nome_fantasia.as_str()),
        ("email", record.email.as_str()),
        ("telefone", record.telefone.as_str()),
        ("cep", record.cep.as_str()),
        ("logradouro", record.logradouro.as_str()),
        ("numero", record.numero.as_str()),
        ("complemento", record.complemento.as_str()),
        ("bairro", record.bairro.as_str()),
        ("cidade", record.cidade.as_str()),
        ("estado", record.estado.as_str()),
    ]
}

/// Messages routed through [`update`].
#[derive(Debug, Clone)]
pub enum FieldEvent {
    Input { field: String, raw: String },
    Blur { field: String },
    PersonTypeChanged(PersonType),
    AddressResolved { field: String, record: AddressRecord },
    CompanyResolved { field: String, record: CompanyRecord },
    LookupFailed { field: String, message: String },
    SubmitRequested { show_spinner: bool },
}

/// Side effects requested by the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LookupCep { field: String, cep: String },
    LookupCnpj { field: String, cnpj: String },
    Toast(Toast),
    Focus(String),
    ShowSpinner { label: String },
    Submit(BTreeMap<String, String>),
}

fn toast(cmds: &mut Vec<Command>, message: impl Into<String>, level: ToastLevel) {
    cmds.push(Command::Toast(Toast {
        message: message.into(),
        level,
    }));
}

#[derive(Debug, Clone)]
pub struct FormState {
    person_type: PersonType,
    fields: BTreeMap<String, FieldState>,
    mapping: FieldMapping,
    submitting: bool,
}

impl FormState {
    pub fn new<I, S>(field_names: I, mapping: FieldMapping) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = field_names
            .into_iter()
            .map(|name| {
                let name: String = name.into();
                let state = FieldState {
                    kind: FieldKind::for_field(&name),
                    value: String::new(),
                    status: FieldStatus::Untouched,
                };
                (name, state)
            })
            .collect();

        Self {
            person_type: PersonType::default(),
            fields,
            mapping,
            submitting: false,
        }
    }

    pub fn person_type(&self) -> PersonType {
        self.person_type
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_visible(&self, name: &str) -> bool {
        Section::of_field(name).is_visible_for(self.person_type)
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = (&String, &FieldState)> {
        self.fields.iter().filter(|(name, _)| self.is_visible(name))
    }

    fn set_status(&mut self, name: &str, status: FieldStatus) {
        if let Some(field) = self.fields.get_mut(name) {
            field.status = status;
        }
    }

    /// Store a value coming from a lookup, masked the way the field masks typing.
    fn fill(&mut self, name: &str, value: &str) {
        match self.fields.get_mut(name) {
            Some(field) => {
                field.value = field.kind.mask(value);
                field.status = FieldStatus::Valid;
            }
            None => tracing::debug!("Form has no field {}, skipping", name),
        }
    }

    /// Validate one field; returns the lookup it triggers, if any.
    fn validate_field(&mut self, name: &str) -> Option<Command> {
        let field = self.fields.get(name)?;
        let value = field.value.clone();
        if value.is_empty() {
            self.set_status(name, FieldStatus::Untouched);
            return None;
        }

        let (status, lookup) = match field.kind {
            FieldKind::Cpf => {
                if validate_cpf(&value) {
                    (FieldStatus::Valid, None)
                } else {
                    (FieldStatus::Invalid("CPF inválido".to_string()), None)
                }
            }
            FieldKind::Cnpj => match validate_cnpj_detailed(&value) {
                TaxIdValidation::Verified => (
                    FieldStatus::Valid,
                    Some(Command::LookupCnpj {
                        field: name.to_string(),
                        cnpj: value.clone(),
                    }),
                ),
                // the registry cannot resolve alphanumeric CNPJs yet
                TaxIdValidation::FormatOnly => (FieldStatus::Valid, None),
                TaxIdValidation::Rejected(_) => {
                    (FieldStatus::Invalid("CNPJ inválido".to_string()), None)
                }
            },
            FieldKind::Document => {
                if validate_document(&value, None).is_accepted() {
                    (FieldStatus::Valid, None)
                } else {
                    (FieldStatus::Invalid("CPF/CNPJ inválido".to_string()), None)
                }
            }
            FieldKind::Email => {
                if validate_email_format(&value) {
                    (FieldStatus::Valid, None)
                } else {
                    (FieldStatus::Invalid("Email inválido".to_string()), None)
                }
            }
            FieldKind::Phone => {
                if validate_phone_format(&value) {
                    (FieldStatus::Valid, None)
                } else {
                    (FieldStatus::Invalid("Telefone inválido".to_string()), None)
                }
            }
            FieldKind::Cep => {
                let digits = only_digits(&value);
                if digits.len() == 8 {
                    (
                        FieldStatus::Pending,
                        Some(Command::LookupCep {
                            field: name.to_string(),
                            cep: digits,
                        }),
                    )
                } else {
                    (
                        FieldStatus::Invalid("CEP deve ter 8 dígitos".to_string()),
                        None,
                    )
                }
            }
            FieldKind::Currency | FieldKind::Text => (FieldStatus::Valid, None),
        };

        self.set_status(name, status);
        lookup
    }

    /// Submit-time check: format only, no lookups.
    ///
    /// CEP and CNPJ fields that were already blurred keep the status their
    /// lookup produced (resolved, failed or still pending).
    fn check_for_submit(&mut self, name: &str) {
        let Some(field) = self.fields.get(name) else {
            return;
        };
        let looked_up = matches!(field.kind, FieldKind::Cep | FieldKind::Cnpj)
            && field.status != FieldStatus::Untouched;
        if looked_up || field.status == FieldStatus::Pending {
            return;
        }
        if self.validate_field(name).is_some() {
            self.set_status(name, FieldStatus::Valid);
        }
    }
}

/// Apply one event to the form and enqueue the resulting commands.
pub fn update(form: &mut FormState, event: FieldEvent, cmds: &mut Vec<Command>) {
    match event {
        FieldEvent::Input { field, raw } => {
            if let Some(state) = form.fields.get_mut(&field) {
                state.value = state.kind.mask(&raw);
                state.status = FieldStatus::Untouched;
            }
        }
        FieldEvent::Blur { field } => {
            if !form.is_visible(&field) {
                return;
            }
            if let Some(lookup) = form.validate_field(&field) {
                cmds.push(lookup);
            }
        }
        FieldEvent::PersonTypeChanged(person_type) => {
            form.person_type = person_type;
            // hidden sections must not block submission with stale errors
            let hidden: Vec<String> = form
                .fields
                .keys()
                .filter(|name| !form.is_visible(name))
                .cloned()
                .collect();
            for name in hidden {
                form.set_status(&name, FieldStatus::Untouched);
            }
        }
        FieldEvent::AddressResolved { field, record } => {
            form.set_status(&field, FieldStatus::Valid);
            for (canonical, value) in address_values(&record) {
                let target = form.mapping.form_field(canonical).to_string();
                form.fill(&target, value);
            }
            toast(
                cmds,
                "Endereço encontrado! Verifique e complete os dados.",
                ToastLevel::Success,
            );
            let numero = form.mapping.form_field("numero").to_string();
            if form.fields.contains_key(&numero) {
                cmds.push(Command::Focus(numero));
            }
        }
        FieldEvent::CompanyResolved { field, record } => {
            form.set_status(&field, FieldStatus::Valid);
            for (canonical, value) in company_values(&record) {
                let target = form.mapping.form_field(canonical).to_string();
                form.fill(&target, value);
            }
            toast(
                cmds,
                "Empresa encontrada! Verifique os dados.",
                ToastLevel::Success,
            );
            if !record.is_active() {
                toast(
                    cmds,
                    format!("Situação cadastral: {}", record.situacao_cadastral),
                    ToastLevel::Warning,
                );
            }
        }
        FieldEvent::LookupFailed { field, message } => {
            form.set_status(&field, FieldStatus::Invalid(message.clone()));
            toast(cmds, message, ToastLevel::Warning);
        }
        FieldEvent::SubmitRequested { show_spinner } => {
            if form.submitting {
                return;
            }

            let visible: Vec<String> = form
                .fields
                .keys()
                .filter(|name| form.is_visible(name))
                .cloned()
                .collect();
            for name in &visible {
                form.check_for_submit(name);
            }

            let invalid = visible
                .iter()
                .filter(|name| matches!(form.fields[*name].status, FieldStatus::Invalid(_)))
                .count();
            if invalid > 0 {
                toast(
                    cmds,
                    format!("Corrija os {} campo(s) inválido(s) antes de enviar.", invalid),
                    ToastLevel::Danger,
                );
                return;
            }

            form.submitting = true;
            if show_spinner {
                cmds.push(Command::ShowSpinner {
                    label: "Processando...".to_string(),
                });
            }
            let values = visible
                .into_iter()
                .map(|name| {
                    let value = form.fields[&name].value.clone();
                    (name, value)
                })
                .collect();
            cmds.push(Command::Submit(values));
        }
    }
}

/// Run a lookup command and turn its result into the event that completes it.
///
/// Returns `None` for commands that are not lookups.
pub async fn execute_lookup(
    cmd: &Command,
    addresses: &dyn AddressLookup,
    companies: &dyn CompanyLookup,
) -> Option<FieldEvent> {
    match cmd {
        Command::LookupCep { field, cep } => Some(match addresses.lookup_cep(cep).await {
            Ok(record) => FieldEvent::AddressResolved {
                field: field.clone(),
                record,
            },
            Err(e) => {
                tracing::warn!("CEP lookup for {} failed: {}", field, e);
                FieldEvent::LookupFailed {
                    field: field.clone(),
                    message: e.user_friendly_message(),
                }
            }
        }),
        Command::LookupCnpj { field, cnpj } => Some(match companies.lookup_cnpj(cnpj).await {
            Ok(record) => FieldEvent::CompanyResolved {
                field: field.clone(),
                record,
            },
            Err(e) => {
                tracing::warn!("CNPJ lookup for {} failed: {}", field, e);
                FieldEvent::LookupFailed {
                    field: field.clone(),
                    message: e.user_friendly_message(),
                }
            }
        }),
        _ => None,
    }
}
