//! Keystroke masks for the registration forms.
//!
//! Every mask is a pure function from whatever the user has typed so far to
//! the display value, so it can be reapplied on each input event. None of them
//! fail: short input yields a partial mask.

/// Keep only ASCII digits.
pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// CPF mask `###.###.###-##`.
pub fn format_cpf(raw: &str) -> String {
    let mut out = String::with_capacity(14);
    for (i, ch) in raw.chars().filter(char::is_ascii_digit).take(11).enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(ch);
    }
    out
}

/// CNPJ mask `##.###.###/####-##`.
///
/// Letters are kept (upper-cased) so the same mask serves the numeric and the
/// alphanumeric CNPJ. Separators depend only on position.
pub fn format_cnpj(raw: &str) -> String {
    let mut out = String::with_capacity(18);
    let base = raw
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_alphanumeric)
        .take(14);
    for (i, ch) in base.enumerate() {
        match i {
            2 | 5 => out.push('.'),
            8 => out.push('/'),
            12 => out.push('-'),
            _ => {}
        }
        out.push(ch);
    }
    out
}

/// Mask for a combined "CPF ou CNPJ" input.
///
/// Stays on the CPF mask while the value could still be a CPF and switches to
/// the CNPJ mask on the 12th character or the first letter.
pub fn format_document(raw: &str) -> String {
    let has_letter = raw.chars().any(|c| c.is_ascii_alphabetic());
    let digit_count = raw.chars().filter(char::is_ascii_digit).count();
    if has_letter || digit_count > 11 {
        format_cnpj(raw)
    } else {
        format_cpf(raw)
    }
}

/// Phone mask: `(AA) NNNN-NNNN` for landlines, `(AA) NNNNN-NNNN` for mobiles.
pub fn format_phone(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).take(11).collect();
    if digits.len() < 3 {
        return digits.into_iter().collect();
    }

    let hyphen_at = if digits.len() <= 10 { 4 } else { 5 };
    let (area, number) = digits.split_at(2);

    let mut out = String::with_capacity(15);
    out.push('(');
    out.extend(area);
    out.push_str(") ");
    for (i, ch) in number.iter().enumerate() {
        if i == hyphen_at {
            out.push('-');
        }
        out.push(*ch);
    }
    out
}

/// CEP mask `#####-###`.
pub fn format_cep(raw: &str) -> String {
    let mut out = String::with_capacity(9);
    for (i, ch) in raw.chars().filter(char::is_ascii_digit).take(8).enumerate() {
        if i == 5 {
            out.push('-');
        }
        out.push(ch);
    }
    out
}

/// Currency mask: digits are read as cents and rendered as `R$ 1.234,56`.
///
/// Works on the digit string directly so long inputs never overflow.
pub fn format_currency(raw: &str) -> String {
    let digits = only_digits(raw);
    let significant = digits.trim_start_matches('0');
    let padded = format!("{:0>3}", significant);
    let (integer, cents) = padded.split_at(padded.len() - 2);

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("R$ {},{}", grouped, cents)
}
