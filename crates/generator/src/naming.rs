//! Identifier casing and sanitizing for emitted source

use provisioning_generator_common::{GeneratorError, Result};
use regex::Regex;
use std::sync::LazyLock;

static CASE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\- ]").unwrap());
static MERGE_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());
static REPLACE_WITH_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\/.+ -]+").unwrap());
static VERSION_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-.]").unwrap());

/// Spelled-out name of a printable ASCII symbol or digit
pub fn basic_latin_name(c: char) -> Option<&'static str> {
    let name = match c {
        ' ' => "Space",
        '!' => "ExclamationMark",
        '"' => "QuotationMark",
        '#' => "NumberSign",
        '$' => "DollarSign",
        '%' => "PercentSign",
        '&' => "Ampersand",
        '\'' => "Apostrophe",
        '(' => "LeftParenthesis",
        ')' => "RightParenthesis",
        '*' => "Asterisk",
        '+' => "PlusSign",
        ',' => "Comma",
        '-' => "HyphenMinus",
        '.' => "FullStop",
        '/' => "Slash",
        '0' => "Zero",
        '1' => "One",
        '2' => "Two",
        '3' => "Three",
        '4' => "Four",
        '5' => "Five",
        '6' => "Six",
        '7' => "Seven",
        '8' => "Eight",
        '9' => "Nine",
        ':' => "Colon",
        ';' => "Semicolon",
        '<' => "LessThanSign",
        '=' => "EqualSign",
        '>' => "GreaterThanSign",
        '?' => "QuestionMark",
        '@' => "AtSign",
        '[' => "LeftSquareBracket",
        '\\' => "Backslash",
        ']' => "RightSquareBracket",
        '^' => "CircumflexAccent",
        '`' => "GraveAccent",
        '{' => "LeftCurlyBracket",
        '|' => "VerticalBar",
        '}' => "RightCurlyBracket",
        '~' => "Tilde",
        _ => return None,
    };
    Some(name)
}

/// `storage_account-name` -> `StorageAccountName`
pub fn to_pascal_case(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }

    // Leading underscores survive and the remainder is camel cased
    if let Some(rest) = name.strip_prefix('_') {
        return format!("_{}", to_camel_case(rest));
    }

    CASE_SPLIT
        .split(name)
        .filter(|s| !s.is_empty())
        .map(|s| format_case(s, false))
        .collect()
}

/// `Storage_account-name` -> `storageAccountName`
pub fn to_camel_case(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }

    if let Some(rest) = name.strip_prefix('_') {
        return to_camel_case(rest);
    }

    let mut splits: Vec<&str> = CASE_SPLIT.split(name).collect();
    while splits.last().is_some_and(|s| s.is_empty()) {
        splits.pop();
    }

    splits
        .iter()
        .enumerate()
        .map(|(i, s)| format_case(s, i == 0))
        .collect()
}

fn format_case(name: &str, to_lower: bool) -> String {
    let chars: Vec<char> = name.chars().collect();
    let whole_word = chars.len() < 2
        || (chars.len() == 2 && chars[0].is_uppercase() && chars[1].is_uppercase());

    if whole_word {
        return if to_lower {
            name.to_lowercase()
        } else {
            name.to_uppercase()
        };
    }

    let first: String = if to_lower {
        chars[0].to_lowercase().collect()
    } else {
        chars[0].to_uppercase().collect()
    };
    format!("{}{}", first, chars[1..].iter().collect::<String>())
}

/// `2021-01-01` -> `V2021_01_01`
pub fn version_identifier(version: &str) -> String {
    let identifier = VERSION_SEPARATORS
        .replace_all(version, "_")
        .to_uppercase();
    if identifier.starts_with('V') {
        identifier
    } else {
        format!("V{}", identifier)
    }
}

/// Constant name for an enum value (`Standard_LRS` -> `STANDARD_LRS`,
/// `canNotDelete` -> `CAN_NOT_DELETE`)
pub fn enum_member_name(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Ok(name.to_string());
    }

    let trimmed = if !all_underscores(name) {
        name.trim_matches('_')
    } else {
        name
    };

    let replaced = REPLACE_WITH_UNDERSCORE.replace_all(trimmed, "_");
    let valid = valid_name(&replaced, |c| c == '_' || c == '-')?;
    let merged = MERGE_UNDERSCORES.replace_all(&valid, "_");

    let mut chars: Vec<char> = merged.chars().collect();
    let mut i = 1;
    while i + 1 < chars.len() {
        if chars[i].is_ascii_uppercase() && chars[i - 1].is_ascii_lowercase() {
            chars.insert(i, '_');
        }
        i += 1;
    }
    let mut result: String = chars.into_iter().collect();

    if result.starts_with('_') || result.ends_with('_') {
        if !all_underscores(&result) {
            result = result.trim_matches('_').to_string();
        } else if let Some(first) = name.chars().next().and_then(basic_latin_name) {
            result = format!("{}{}", first, &result[1..]);
            if let Some(last) = name.chars().last().and_then(basic_latin_name) {
                if result.ends_with('_') {
                    result = format!("{}{}", &result[..result.len() - 1], last);
                }
            }
        }
    }

    Ok(result.to_uppercase())
}

fn all_underscores(s: &str) -> bool {
    s.chars().all(|c| c == '_')
}

/// Replace characters that can't appear in an identifier with `_`,
/// spelling out leading symbols and digits
pub fn valid_name(name: &str, allowed: impl Fn(char) -> bool) -> Result<String> {
    let mut correct = remove_invalid_characters(name, &allowed);

    let needs_spelling = correct
        .chars()
        .next()
        .map_or(true, |c| basic_latin_name(c).is_some());
    if needs_spelling {
        let spelled: String = name
            .chars()
            .map(|c| match basic_latin_name(c) {
                Some(replacement) => replacement.to_string(),
                None => c.to_string(),
            })
            .collect();
        correct = remove_invalid_characters(&spelled, &allowed);
    }

    if correct.is_empty() {
        return Err(GeneratorError::Generation(format!(
            "Property name {} cannot be used as an identifier, as it contains only invalid characters.",
            name
        )));
    }

    Ok(correct)
}

fn remove_invalid_characters(name: &str, allowed: &impl Fn(char) -> bool) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || allowed(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}
