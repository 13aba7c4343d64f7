//! Routegate CLI - route host, certificate and DNS checks
//!
//! Evaluates an HTTP route definition the way the route editor does:
//! applies the route rules, validates the fields, and reports certificate
//! coverage and DNS status for every host.

mod config;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use routegate_dns::{DnsInfoLoader, DnsRecord, DnsStatusStore, StaticLoader, SystemLoader};
use routegate_domain::{matches, Certificate};
use routegate_rules::{on_transition, Effect, RouteForm, RuleContext};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::report::{ReportInputs, RouteReport};

/// Routegate - check HTTP routes against certificates and DNS
#[derive(Parser, Debug)]
#[command(name = "routegate")]
#[command(about = "Routegate - check HTTP routes against certificates and DNS")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ROUTEGATE_COMMIT"),
    ")\nBuilt: ",
    env!("ROUTEGATE_BUILD_TIME")
))]
struct Cli {
    /// Config file (defaults to .routegate.yml found in the current or a parent directory)
    #[arg(long, global = true, env = "ROUTEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where DNS records come from
#[derive(clap::Args, Debug)]
struct DnsSource {
    /// File with DNS records (YAML or JSON list of {domain, cname, aRecords})
    #[arg(long, conflicts_with = "resolve")]
    dns: Option<PathBuf>,

    /// Resolve hosts with the system resolver
    #[arg(long)]
    resolve: bool,

    /// Ingress IP hosts should point to (overrides the config file)
    #[arg(long, env = "ROUTEGATE_INGRESS_IP")]
    ingress_ip: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a route definition
    #[command(long_about = r#"
Apply the route rules to a route definition, validate it, and report
certificate coverage and DNS status for its hosts.

EXAMPLES:
  # Check a route against the cluster certificates
  routegate check --route route.yml --certs certificates.yml

  # Include DNS status using the system resolver
  routegate check --route route.yml --certs certificates.yml --resolve

ENVIRONMENT VARIABLES:
  ROUTEGATE_CONFIG       Config file path
  ROUTEGATE_INGRESS_IP   Cluster ingress IP
    "#)]
    Check {
        /// Route definition (YAML or JSON)
        #[arg(long)]
        route: PathBuf,

        /// Certificate list (YAML or JSON list of {name, domains})
        #[arg(long)]
        certs: Option<PathBuf>,

        #[command(flatten)]
        dns_source: DnsSource,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether certificate domains cover a host
    Match {
        /// Host to check
        #[arg(long)]
        host: String,

        /// Certificate domains, e.g. "*.example.com"
        #[arg(required = true)]
        domains: Vec<String>,
    },

    /// Show the DNS status of a single domain
    Dns {
        /// Domain to check
        #[arg(long)]
        domain: String,

        #[command(flatten)]
        dns_source: DnsSource,
    },

    /// Write a template config file
    Init {
        /// Path of the config file to create
        #[arg(long, default_value = ".routegate.yml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Setup logging; RUST_LOG takes precedence over the configured level
fn setup_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("Failed to initialize logging filter")?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Load a YAML or JSON document, chosen by file extension
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {:?}", path))
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML: {:?}", path))
    }
}

/// Build a DNS store for the requested source, if any
fn dns_store(source: &DnsSource, config: &Config) -> Result<Option<DnsStatusStore>> {
    let loader: Arc<dyn DnsInfoLoader> = if let Some(path) = &source.dns {
        let records: Vec<DnsRecord> = load_document(path)?;
        debug!("Loaded {} DNS record(s) from {:?}", records.len(), path);
        Arc::new(StaticLoader::new(records))
    } else if source.resolve {
        Arc::new(SystemLoader::new(config.dns_timeout()))
    } else {
        return Ok(None);
    };

    Ok(Some(DnsStatusStore::new(loader)))
}

/// Run effects and wait for the lookups to land in the store
async fn execute_effects(effects: &[Effect], store: Option<&DnsStatusStore>) {
    let Some(store) = store else {
        debug!("No DNS source configured, skipping {} lookup(s)", effects.len());
        return;
    };

    let mut handles = Vec::new();
    for effect in effects {
        match effect {
            Effect::LoadDnsInfo(domain) => handles.extend(store.request(domain)),
        }
    }

    for handle in handles {
        if let Err(e) = handle.await {
            warn!("DNS lookup task failed: {}", e);
        }
    }
}

async fn run_check(
    config: &Config,
    route_path: &Path,
    certs_path: Option<&Path>,
    dns_source: &DnsSource,
    json: bool,
) -> Result<()> {
    let route: RouteForm = load_document(route_path)?;
    let certificates: Vec<Certificate> = match certs_path {
        Some(path) => load_document(path)?,
        None => Vec::new(),
    };
    info!(
        "Checking route with {} host(s) against {} certificate(s)",
        route.hosts.len(),
        certificates.len()
    );

    // Opening a route is a transition from an empty host list
    let ctx = RuleContext::new(config.force_https.clone());
    let opened = RouteForm {
        hosts: Vec::new(),
        ..route.clone()
    };
    let reaction = on_transition(&opened, &route, &ctx);
    let corrected = reaction.apply(&route);

    let store = dns_store(dns_source, config)?;
    execute_effects(&reaction.effects, store.as_ref()).await;

    let target = config.dns_target(dns_source.ingress_ip.as_deref());
    if store.is_some() && target.ip().is_empty() {
        warn!("No ingress IP configured; A record checks will fail");
    }

    let report = RouteReport::build(
        corrected,
        &reaction.updates,
        ReportInputs {
            certificates: &certificates,
            force_https: &config.force_https,
            dns: store.as_ref().map(|store| (store, &target)),
        },
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    if !report.is_valid() {
        anyhow::bail!("Route has validation errors");
    }

    Ok(())
}

async fn run_dns(config: &Config, domain: &str, dns_source: &DnsSource) -> Result<()> {
    let target = config.dns_target(dns_source.ingress_ip.as_deref());

    let Some(store) = dns_store(dns_source, config)? else {
        anyhow::bail!("No DNS source: pass --dns <file> or --resolve");
    };

    execute_effects(&[Effect::LoadDnsInfo(domain.to_string())], Some(&store)).await;

    let status = store.status(domain, &target);
    println!("{}: {}", domain, status);
    if let Some(checked_at) = store.checked_at(domain) {
        println!("  checked at {}", checked_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{:?} already exists (use --force to overwrite)", path);
    }

    std::fs::write(path, Config::template())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;
    println!("Wrote {}", path.display());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_path, config) = Config::resolve(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    setup_logging(log_level)?;

    match &config_path {
        Some(path) => debug!("Using config {:?}", path),
        None => debug!("No config file found, using defaults"),
    }

    match cli.command {
        Commands::Check {
            route,
            certs,
            dns_source,
            json,
        } => run_check(&config, &route, certs.as_deref(), &dns_source, json).await,
        Commands::Match { host, domains } => {
            let covered = matches(domains.as_slice(), &host);
            println!(
                "{} {} covered by [{}]",
                host,
                if covered { "is" } else { "is not" },
                domains.join(", ")
            );
            if !covered {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Dns { domain, dns_source } => run_dns(&config, &domain, &dns_source).await,
        Commands::Init { path, force } => run_init(&path, force),
    }
}
