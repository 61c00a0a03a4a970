//! Label to identifier conversion.
//!
//! Cerb labels (context names, field names, fieldset names) are free text.
//! These helpers turn them into names that are always valid Rust
//! identifiers once prefixed (`get_`, `set_`) or cased.

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Names the generated module imports, declares, or takes from the prelude.
///
/// A wrapper struct with one of these names would shadow the item the
/// generated code refers to.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Box",
    "CerbClient",
    "CerbError",
    "CerbRecord",
    "Err",
    "Fields",
    "Into",
    "Map",
    "None",
    "Ok",
    "Option",
    "Record",
    "RecordDescriptor",
    "RecordRegistry",
    "Result",
    "Self",
    "Sized",
    "Some",
    "String",
    "Value",
    "Vec",
];

/// Makes a label safe for use inside a function name.
///
/// Lower-cases; turns spaces, dots and hyphens into `_`; drops everything
/// outside `[a-z0-9_]`. A leading digit is replaced by its English word.
///
/// ## Examples
///
/// ```
/// use cerb_gen::sanitize::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Ship-To.Address"), "ship_to_address");
/// assert_eq!(sanitize_identifier("3 Cool Widgets!"), "three_cool_widgets");
/// ```
pub fn sanitize_identifier(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '.' | '-' => '_',
            other => other,
        })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();

    match cleaned.chars().next().and_then(|c| c.to_digit(10)) {
        Some(digit) => format!("{}{}", DIGIT_WORDS[digit as usize], &cleaned[1..]),
        None => cleaned,
    }
}

/// Builds a PascalCase type name from a label.
///
/// Falls back to `UnnamedContext` for labels with no usable characters and appends
/// `Record` to names the generated module already uses.
///
/// ## Examples
///
/// ```
/// use cerb_gen::sanitize::sanitize_type_name;
///
/// assert_eq!(sanitize_type_name("Knowledgebase Article"), "KnowledgebaseArticle");
/// assert_eq!(sanitize_type_name("Value"), "ValueRecord");
/// ```
pub fn sanitize_type_name(text: &str) -> String {
    let name: String = sanitize_identifier(text)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if name.is_empty() {
        "UnnamedContext".to_string()
    } else if RESERVED_TYPE_NAMES.contains(&name.as_str()) {
        format!("{name}Record")
    } else {
        name
    }
}

/// Converts a PascalCase type name to SCREAMING_SNAKE_CASE.
pub fn const_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, c) in type_name.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
