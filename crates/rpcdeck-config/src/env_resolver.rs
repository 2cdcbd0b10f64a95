//! `${VAR}` and `${VAR:default}` placeholders inside config file values

use crate::error::{ConfigError, ConfigResult};
use regex::Regex;

const PLACEHOLDER: &str = r"\$\{([^}:]+)(?::([^}]*))?\}";

/// Substitutes environment placeholders, restricted to whitelisted prefixes
#[derive(Debug, Clone)]
pub struct EnvResolver {
    /// Empty means no restrictions
    allowed_prefixes: Vec<String>,
}

impl Default for EnvResolver {
    fn default() -> Self {
        Self {
            allowed_prefixes: vec![
                "RPCDECK_".to_string(),
                "ANVIL_".to_string(),
                "ETH_".to_string(),
            ],
        }
    }
}

impl EnvResolver {
    pub fn new(allowed_prefixes: Vec<String>) -> Self {
        Self { allowed_prefixes }
    }

    pub fn unrestricted() -> Self {
        Self {
            allowed_prefixes: vec![],
        }
    }

    /// Resolve against the process environment
    pub fn resolve(&self, input: &str) -> ConfigResult<String> {
        self.resolve_with(input, |name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for variable values
    pub fn resolve_with<F>(&self, input: &str, lookup: F) -> ConfigResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !input.contains("${") {
            return Ok(input.to_string());
        }
        let re = Regex::new(PLACEHOLDER).map_err(|e| ConfigError::validation(e.to_string()))?;

        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for caps in re.captures_iter(input) {
            let Some(whole) = caps.get(0) else { continue };
            let name = &caps[1];
            self.validate_var_name(name)?;

            let value = match (lookup(name), caps.get(2)) {
                (Some(value), _) => value,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => return Err(ConfigError::VarNotFound(name.to_string())),
            };
            out.push_str(&input[last..whole.start()]);
            out.push_str(&value);
            last = whole.end();
        }
        out.push_str(&input[last..]);
        Ok(out)
    }

    fn validate_var_name(&self, name: &str) -> ConfigResult<()> {
        if self.allowed_prefixes.is_empty()
            || self.allowed_prefixes.iter().any(|p| name.starts_with(p))
        {
            return Ok(());
        }
        Err(ConfigError::VarNotWhitelisted(name.to_string(), self.allowed_prefixes.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "RPCDECK_HOST" => Some("anvil.local".to_string()),
            "RPCDECK_PORT" => Some("9545".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_variables_and_defaults() {
        let resolver = EnvResolver::default();
        let out = resolver
            .resolve_with("http://${RPCDECK_HOST}:${RPCDECK_PORT}/${RPCDECK_PATH:rpc}", lookup)
            .unwrap();
        assert_eq!(out, "http://anvil.local:9545/rpc");
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(
            EnvResolver::default().resolve_with("http://localhost:8545", lookup).unwrap(),
            "http://localhost:8545"
        );
    }

    #[test]
    fn missing_variable_without_default_is_an_error() {
        let err = EnvResolver::default().resolve_with("${RPCDECK_MISSING}", lookup).unwrap_err();
        assert!(matches!(err, ConfigError::VarNotFound(name) if name == "RPCDECK_MISSING"));
    }

    #[test]
    fn variables_outside_whitelist_are_rejected() {
        let err = EnvResolver::default().resolve_with("${HOME}", lookup).unwrap_err();
        assert!(matches!(err, ConfigError::VarNotWhitelisted(..)));
        assert_eq!(EnvResolver::unrestricted().resolve_with("${HOME:x}", lookup).unwrap(), "x");
    }
}
