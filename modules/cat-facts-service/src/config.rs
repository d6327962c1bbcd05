use std::env;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://catfact.ninja/fact";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("CAT_FACTS_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "CAT_FACTS_PORT", 8000),
            db_path: lookup("CAT_FACTS_DB_PATH").unwrap_or_else(|| "./cat_facts.db".to_string()),
            upstream_url: lookup("CAT_FACTS_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            upstream_timeout: Duration::from_secs(positive_or(
                &lookup,
                "CAT_FACTS_UPSTREAM_TIMEOUT_SECS",
                10,
            )),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{} has invalid value {:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}

/// Like `parse_or`, but zero also counts as invalid.
fn positive_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default) {
        0 => {
            log::warn!("{} must be greater than 0, using {}", key, default);
            default
        }
        v => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.db_path, "./cat_facts.db");
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("CAT_FACTS_HOST", "0.0.0.0"),
            ("CAT_FACTS_PORT", "9200"),
            ("CAT_FACTS_DB_PATH", "/tmp/facts.db"),
            ("CAT_FACTS_UPSTREAM_URL", "http://localhost:1234/fact"),
            ("CAT_FACTS_UPSTREAM_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.bind_addr(), "0.0.0.0:9200");
        assert_eq!(config.db_path, "/tmp/facts.db");
        assert_eq!(config.upstream_url, "http://localhost:1234/fact");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("CAT_FACTS_PORT", "eighty"),
            ("CAT_FACTS_UPSTREAM_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }

    #[test]
    fn zero_timeout_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("CAT_FACTS_UPSTREAM_TIMEOUT_SECS", "0")]));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }
}
