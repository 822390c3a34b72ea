use crate::domain::model::{ReportEntry, SubdomainReport};
use crate::domain::ports::HostResolver;
use crate::utils::error::Result;
use chrono::Utc;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const UNRESOLVED_NOTE: &str = "No nmap commands (DNS resolution failed)";

/// Resolves subdomains and attaches suggested scan commands to each.
pub struct ReportBuilder<R: HostResolver + 'static> {
    resolver: Arc<R>,
    concurrency: usize,
    commands: Vec<String>,
}

impl<R: HostResolver + 'static> ReportBuilder<R> {
    pub fn new(resolver: Arc<R>, concurrency: usize, commands: Vec<String>) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
            commands,
        }
    }

    pub fn entry(&self, subdomain: String, address: Option<Ipv4Addr>) -> ReportEntry {
        let suggested_commands = match address {
            Some(ip) => {
                let ip = ip.to_string();
                self.commands
                    .iter()
                    .map(|template| template.replace("{ip}", &ip))
                    .collect()
            }
            None => vec![UNRESOLVED_NOTE.to_string()],
        };

        ReportEntry {
            subdomain,
            address,
            suggested_commands,
        }
    }

    /// Entries keep the order of `subdomains`.
    pub async fn build(&self, domain: &str, subdomains: &[String]) -> SubdomainReport {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, subdomain) in subdomains.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let resolver = Arc::clone(&self.resolver);
            let subdomain = subdomain.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (index, resolver.resolve_ipv4(&subdomain).await)
            });
        }

        let mut addresses: Vec<Option<Ipv4Addr>> = vec![None; subdomains.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, address)) => addresses[index] = address,
                Err(e) => tracing::warn!("Resolution task failed: {}", e),
            }
        }

        let entries: Vec<ReportEntry> = subdomains
            .iter()
            .cloned()
            .zip(addresses)
            .map(|(subdomain, address)| self.entry(subdomain, address))
            .collect();
        let resolved = entries.iter().filter(|e| e.address.is_some()).count();

        SubdomainReport {
            domain: domain.to_string(),
            generated_at: Utc::now(),
            total: entries.len(),
            resolved,
            entries,
        }
    }
}

pub fn write_report(path: &Path, report: &SubdomainReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
