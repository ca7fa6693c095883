use gestao_forms::core::mask::{format_cnpj, format_cpf, format_document, only_digits};
use gestao_forms::core::tax_id::{
    cnpj_check_digits, complete_cnpj, complete_cpf, cpf_check_digits, validate_cnpj,
    validate_cnpj_detailed, validate_cpf, validate_document,
};
use gestao_forms::{PersonType, TaxIdKind, TaxIdRejection, TaxIdValidation};

fn is_repeated(value: &str) -> bool {
    let digits = only_digits(value);
    digits.chars().all(|c| Some(c) == digits.chars().next())
}

#[test]
fn test_known_documents() {
    assert!(validate_cpf("529.982.247-25"));
    assert!(validate_cpf("52998224725"));
    assert!(validate_cnpj("11.222.333/0001-81"));
    assert!(validate_cnpj("00.000.000/0001-91"));

    assert_eq!(cpf_check_digits("529982247").unwrap(), [2, 5]);
    assert_eq!(cnpj_check_digits("112223330001").unwrap(), [8, 1]);
}

#[test]
fn test_completed_bases_always_validate() {
    for seed in 0..200u64 {
        let cpf_base = format!("{:09}", seed * 4_999_999 % 1_000_000_000);
        let cpf = complete_cpf(&cpf_base).unwrap();
        if !is_repeated(&cpf) {
            assert!(validate_cpf(&cpf), "generated CPF {} failed", cpf);
        }
        assert_eq!(format_cpf(&cpf), cpf);

        let cnpj_base = format!("{:012}", seed * 7_777_777_771 % 1_000_000_000_000);
        let cnpj = complete_cnpj(&cnpj_base).unwrap();
        if !is_repeated(&cnpj) {
            assert_eq!(
                validate_cnpj_detailed(&cnpj),
                TaxIdValidation::Verified,
                "generated CNPJ {} failed",
                cnpj
            );
        }
        assert_eq!(format_cnpj(&cnpj), cnpj);
    }
}

#[test]
fn test_single_digit_change_is_detected() {
    let cpf = "52998224725";
    for pos in 0..cpf.len() {
        let mut chars: Vec<char> = cpf.chars().collect();
        let d = chars[pos].to_digit(10).unwrap();
        chars[pos] = char::from_digit((d + 1) % 10, 10).unwrap();
        let altered: String = chars.into_iter().collect();
        assert!(!validate_cpf(&altered), "altered CPF {} accepted", altered);
    }

    let cnpj = "11222333000181";
    for pos in 0..cnpj.len() {
        let mut chars: Vec<char> = cnpj.chars().collect();
        let d = chars[pos].to_digit(10).unwrap();
        chars[pos] = char::from_digit((d + 1) % 10, 10).unwrap();
        let altered: String = chars.into_iter().collect();
        assert!(!validate_cnpj(&altered), "altered CNPJ {} accepted", altered);
    }
}

#[test]
fn test_repeated_digits_rejected() {
    for d in 0..=9 {
        let cpf = d.to_string().repeat(11);
        let cnpj = d.to_string().repeat(14);
        assert!(!validate_cpf(&cpf));
        assert_eq!(
            validate_cnpj_detailed(&cnpj),
            TaxIdValidation::Rejected(TaxIdRejection::RepeatedDigits)
        );
    }
}

#[test]
fn test_alphanumeric_cnpj_is_format_only() {
    let result = validate_cnpj_detailed("12.ABC.345/0001-77");
    assert_eq!(result, TaxIdValidation::FormatOnly);
    assert!(result.is_accepted());
    assert!(!result.is_verified());

    assert!(!validate_cnpj("12ABC3450001AB"));
    assert!(!validate_cnpj("12ABC34501234"));
}

#[test]
fn test_document_detection_and_masking() {
    let cpf = validate_document("529.982.247-25", None);
    assert_eq!(cpf.kind, Some(TaxIdKind::Cpf));
    assert!(cpf.outcome.is_verified());

    let cnpj = validate_document("11222333000181", None);
    assert_eq!(cnpj.kind, Some(TaxIdKind::Cnpj));

    let forced = validate_document("52998224725", Some(PersonType::Juridica));
    assert_eq!(forced.kind, Some(TaxIdKind::Cnpj));
    assert!(!forced.is_accepted());

    assert_eq!(format_document("52998224725"), "529.982.247-25");
    assert_eq!(format_document("11222333000181"), "11.222.333/0001-81");
    assert_eq!(format_document("12abc"), "12.ABC");
}
