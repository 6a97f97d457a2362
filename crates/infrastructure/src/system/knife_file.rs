use knife_dns_application::ports::{CredentialLoader, EnvironmentStore};
use knife_dns_domain::{ConfigValue, DomainError, KnifeConfig};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads knife-style credential files.
///
/// One `key value` setting per line; `#` starts a comment. Supported values:
///
/// ```text
/// node_name        "deploy"
/// chef_server_url  'https://chef.example.com/organizations/ops'
/// ssl_verify       false
/// retries          3
/// client_key       ENV['CHEF_CLIENT_KEY']
/// validation_key   nil
/// ```
///
/// `nil` and unset `ENV[...]` references remove the key, so a value inherited
/// from the baseline configuration can be cleared.
#[derive(Debug, Default, Clone, Copy)]
pub struct KnifeFileLoader;

impl KnifeFileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialLoader for KnifeFileLoader {
    fn load(
        &self,
        path: &Path,
        config: &mut KnifeConfig,
        environment: &dyn EnvironmentStore,
    ) -> Result<(), DomainError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DomainError::CredentialLoad(format!("{}: {}", path.display(), e))
        })?;

        let mut applied = 0usize;
        for (index, line) in content.lines().enumerate() {
            let Some((key, value)) = parse_line(line).map_err(|message| {
                DomainError::CredentialLoad(format!(
                    "{}:{}: {}",
                    path.display(),
                    index + 1,
                    message
                ))
            })?
            else {
                continue;
            };

            match resolve_value(value, environment) {
                Some(value) => config.set(key, value),
                None => {
                    config.remove(key);
                }
            }
            applied += 1;
        }

        debug!(path = %path.display(), settings = applied, "Credential file loaded");
        Ok(())
    }
}

enum RawValue<'a> {
    Literal(ConfigValue),
    Nil,
    Env(&'a str),
}

fn resolve_value(value: RawValue<'_>, environment: &dyn EnvironmentStore) -> Option<ConfigValue> {
    match value {
        RawValue::Literal(value) => Some(value),
        RawValue::Nil => None,
        RawValue::Env(name) => environment.get(name).map(ConfigValue::Str),
    }
}

fn parse_line(line: &str) -> Result<Option<(&str, RawValue<'_>)>, String> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (key, rest) = match line.find(char::is_whitespace) {
        Some(split) => (&line[..split], line[split..].trim()),
        None => return Err(format!("setting '{}' has no value", line)),
    };

    if !is_identifier(key) {
        return Err(format!("invalid setting name '{}'", key));
    }

    Ok(Some((key, parse_value(rest)?)))
}

fn parse_value(raw: &str) -> Result<RawValue<'_>, String> {
    match raw {
        "true" => return Ok(RawValue::Literal(ConfigValue::Bool(true))),
        "false" => return Ok(RawValue::Literal(ConfigValue::Bool(false))),
        "nil" => return Ok(RawValue::Nil),
        _ => {}
    }

    if let Some(inner) = raw
        .strip_prefix("ENV[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return match unquote(inner.trim())? {
            Some(name) if !name.is_empty() => Ok(RawValue::Env(name)),
            _ => Err(format!("invalid environment reference '{}'", raw)),
        };
    }

    if let Some(text) = unquote(raw)? {
        return Ok(RawValue::Literal(ConfigValue::Str(unescape(text))));
    }

    raw.parse::<i64>()
        .map(|n| RawValue::Literal(ConfigValue::Integer(n)))
        .map_err(|_| format!("unsupported value '{}'", raw))
}

/// Contents of a single- or double-quoted string, `None` if `raw` is unquoted.
fn unquote(raw: &str) -> Result<Option<&str>, String> {
    let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return Ok(None);
    };
    if raw.len() < 2 || !raw.ends_with(quote) {
        return Err(format!("unterminated string {}", raw));
    }
    Ok(Some(&raw[1..raw.len() - 1]))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return &line[..i],
            None => {}
        }
    }
    line
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
