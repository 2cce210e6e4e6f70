//! `{{name}}` substitution for command tokens.
//!
//! Every placeholder must resolve: a name missing from the parameter map is an
//! error, as is an opening `{{` that does not form a placeholder. Substituted
//! values are inserted verbatim and never scanned again.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// `{{name}}`, `{{ name }}` or `{{.name}}`.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.?([A-Za-z_][A-Za-z0-9_.\-]*)\s*\}\}").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unresolved template variable `{name}` in `{token}`")]
    Unresolved { name: String, token: String },
    #[error("malformed template placeholder in `{token}`")]
    Malformed { token: String },
}

/// Fill every token, stopping at the first token that fails.
pub fn fill_command_templates(
    tokens: &[String],
    params: &HashMap<String, String>,
) -> Result<Vec<String>, TemplateError> {
    tokens
        .iter()
        .map(|token| fill_command_template(token, params))
        .collect()
}

pub fn fill_command_template(
    token: &str,
    params: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut filled = String::with_capacity(token.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(token) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let literal = &token[last..whole.start()];
        check_literal(literal, token)?;

        let value = params
            .get(name.as_str())
            .ok_or_else(|| TemplateError::Unresolved {
                name: name.as_str().to_string(),
                token: token.to_string(),
            })?;
        filled.push_str(literal);
        filled.push_str(value);
        last = whole.end();
    }

    let rest = &token[last..];
    check_literal(rest, token)?;
    filled.push_str(rest);
    Ok(filled)
}

fn check_literal(literal: &str, token: &str) -> Result<(), TemplateError> {
    if literal.contains("{{") {
        return Err(TemplateError::Malformed {
            token: token.to_string(),
        });
    }
    Ok(())
}
