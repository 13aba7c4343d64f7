//! Routegate configuration file support
//!
//! Cluster facts the checks depend on (ingress IP, CNAME target, which
//! domains require HTTPS) live in a `.routegate.yml` file, discovered by
//! walking up from the current directory.

use anyhow::{Context, Result};
use routegate_domain::{is_dns_name, is_ip_literal, ForceHttpsDomains};
use routegate_dns::DnsTarget;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_FILE_NAMES: &[&str] = &[".routegate.yml", ".routegate.yaml"];

/// Routegate configuration file format
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Public IP of the cluster ingress (supports ${ENV_VAR} expansion)
    #[serde(default)]
    pub ingress_ip: String,

    /// Hostname route hosts may CNAME to instead of using an A record
    #[serde(default)]
    pub cname_target: Option<String>,

    /// Domains that must always be served over HTTPS
    #[serde(default)]
    pub force_https: ForceHttpsDomains,

    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Timeout for system resolver lookups
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout_seconds: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dns_timeout() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ingress_ip: String::new(),
            cname_target: None,
            force_https: ForceHttpsDomains::default(),
            log_level: default_log_level(),
            dns_timeout_seconds: default_dns_timeout(),
        }
    }
}

impl Config {
    /// Load the explicit config file, or discover one, or fall back to defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<(Option<PathBuf>, Self)> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            return Ok((Some(path.to_path_buf()), config));
        }

        let current_dir = std::env::current_dir()?;
        match Self::discover_from(&current_dir)? {
            Some((path, config)) => Ok((Some(path), config)),
            None => Ok((None, Self::default())),
        }
    }

    /// Discover config starting from a specific directory
    pub fn discover_from(start_dir: &Path) -> Result<Option<(PathBuf, Self)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let config = Self::load(&path)?;
                    return Ok(Some((path, config)));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Load config from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Self::parse(&content)
    }

    /// Parse config from YAML string
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            serde_yaml::from_str(content).context("Failed to parse YAML config")?;

        config.ingress_ip = expand_env_vars(&config.ingress_ip);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.ingress_ip.is_empty() && !is_ip_literal(&self.ingress_ip) {
            anyhow::bail!("Invalid ingress_ip '{}': must be an IP address", self.ingress_ip);
        }

        if let Some(target) = &self.cname_target {
            if !is_dns_name(target.trim_end_matches('.')) {
                anyhow::bail!("Invalid cname_target '{}': must be a DNS name", target);
            }
        }

        for tld in &self.force_https.tlds {
            if tld.is_empty() || tld.contains('.') {
                anyhow::bail!(
                    "Invalid force_https tld '{}': must be a single label such as 'dev'",
                    tld
                );
            }
        }

        for suffix in &self.force_https.suffixes {
            if !is_dns_name(suffix.trim_start_matches('.')) {
                anyhow::bail!("Invalid force_https suffix '{}': must be a DNS name", suffix);
            }
        }

        if self.dns_timeout_seconds == 0 {
            anyhow::bail!("dns_timeout_seconds must be greater than 0");
        }

        Ok(())
    }

    /// DNS target for host status checks, with an optional ingress IP override
    pub fn dns_target(&self, ingress_ip: Option<&str>) -> DnsTarget {
        let mut target = DnsTarget::new(ingress_ip.unwrap_or(&self.ingress_ip));
        target.cname_domain = self.cname_target.clone();
        target
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_seconds)
    }

    /// Generate a template config file content
    pub fn template() -> String {
        r#"# Routegate configuration

# Public IP of the cluster ingress. Route hosts should have an A record
# pointing here.
ingress_ip: "${ROUTEGATE_INGRESS_IP}"

# Hosts may alternatively CNAME to this name.
# cname_target: lb.cluster.example.com

log_level: info
dns_timeout_seconds: 5

force_https:
  # Extra domains that only work over https, e.g. the cluster app domain
  suffixes: []
  # HSTS-preloaded top-level domains; leave unset to use the built-in list
  # tlds: [app, dev, page]
"#
        .to_string()
    }
}

/// Expand environment variables in a string
///
/// Supports `${VAR}` syntax. If the variable is not set, returns empty string.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    let Ok(re) = regex_lite::Regex::new(r"\$\{([^}]+)\}") else {
        return result;
    };

    for cap in re.captures_iter(input) {
        let var_value = std::env::var(&cap[1]).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
