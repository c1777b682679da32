use crate::error::{FactoryError, Result};
use url::Url;

/// Validates that `url` is an absolute URL with a scheme and a host.
///
/// The parsed form is thrown away. Parsing normalizes things like
/// percent-encoding and fragments, and the submitted string has to be
/// stored exactly as the user typed it.
///
/// `Url::parse` also repairs input: it drops tabs and newlines, reads `\`
/// as `/` and fills in a missing `//` after special schemes. Those inputs
/// are rejected up front, so the string that is stored is the one that
/// was checked.
pub fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(FactoryError::InvalidUrl(
            "URL cannot be empty".to_string(),
        ));
    }

    if url.trim() != url {
        return Err(FactoryError::InvalidUrl(format!(
            "URL must not start or end with whitespace: {:?}",
            url
        )));
    }

    if let Some(c) = url.chars().find(|c| c.is_control() || *c == '\\') {
        return Err(FactoryError::InvalidUrl(format!(
            "URL must not contain {:?}: {:?}",
            c, url
        )));
    }

    let has_authority = url
        .split_once(':')
        .is_some_and(|(scheme, rest)| !scheme.is_empty() && rest.starts_with("//"));
    if !has_authority {
        return Err(FactoryError::InvalidUrl(format!(
            "URL must start with a scheme followed by \"://\": {}",
            url
        )));
    }

    let parsed = Url::parse(url)
        .map_err(|e| FactoryError::InvalidUrl(format!("{}: {}", e, url)))?;

    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(FactoryError::InvalidUrl(format!(
            "URL must have a host: {}",
            url
        )));
    }

    Ok(())
}
