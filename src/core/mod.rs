pub mod contact;
pub mod form;
pub mod mask;
pub mod tax_id;

pub use contact::{validate_cep_format, validate_email_format, validate_phone_format};
pub use form::{execute_lookup, update, Command, FieldEvent, FieldMapping, FormState};
pub use mask::{
    format_cep, format_cnpj, format_cpf, format_currency, format_document, format_phone,
    only_digits,
};
pub use tax_id::{
    cnpj_check_digits, complete_cnpj, complete_cpf, cpf_check_digits, validate_cnpj,
    validate_cnpj_detailed, validate_cpf, validate_document,
};
