use crate::model::SiteId;
use crate::scraper::fetcher::PolitenessDelay;

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FIREFOX_USER_AGENT: &str = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0";
const X11_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub fn to_delay(self) -> PolitenessDelay {
        PolitenessDelay::from_millis(self.min_ms, self.max_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub site: SiteId,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub politeness_delay_ms: Option<DelayRange>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub politeness_delay_ms: DelayRange,
    pub batch_deadline_seconds: Option<u64>,
    pub max_concurrency: usize,
    pub sites: Vec<SiteConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: CHROME_USER_AGENT.to_string(),
            request_timeout_seconds: 15,
            politeness_delay_ms: DelayRange { min_ms: 500, max_ms: 1500 },
            batch_deadline_seconds: Some(60),
            max_concurrency: 5,
            sites: vec![
                SiteConfig {
                    site: SiteId::Amazon,
                    enabled: true,
                    user_agent: Some(FIREFOX_USER_AGENT.to_string()),
                    politeness_delay_ms: None,
                },
                SiteConfig {
                    site: SiteId::MercadoLivre,
                    enabled: true,
                    user_agent: None,
                    politeness_delay_ms: None,
                },
                SiteConfig {
                    site: SiteId::EstanteVirtual,
                    enabled: true,
                    user_agent: None,
                    politeness_delay_ms: None,
                },
                SiteConfig {
                    site: SiteId::Americanas,
                    enabled: true,
                    user_agent: Some(FIREFOX_USER_AGENT.to_string()),
                    politeness_delay_ms: Some(DelayRange { min_ms: 1000, max_ms: 5000 }),
                },
                SiteConfig {
                    site: SiteId::Travessa,
                    enabled: true,
                    user_agent: Some(X11_USER_AGENT.to_string()),
                    politeness_delay_ms: None,
                },
            ],
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("request_timeout_seconds must be positive".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be positive".into()));
        }
        if self.batch_deadline_seconds == Some(0) {
            return Err(ConfigError::Invalid("batch_deadline_seconds must be positive".into()));
        }

        let ranges = std::iter::once(&self.politeness_delay_ms)
            .chain(self.sites.iter().filter_map(|s| s.politeness_delay_ms.as_ref()));
        for range in ranges {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::Invalid(format!(
                    "politeness delay min {}ms exceeds max {}ms",
                    range.min_ms, range.max_ms
                )));
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.sites {
            if !seen.insert(entry.site) {
                return Err(ConfigError::Invalid(format!("site {} configured twice", entry.site)));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn batch_deadline(&self) -> Option<Duration> {
        self.batch_deadline_seconds.map(Duration::from_secs)
    }

    fn site_entry(&self, site: SiteId) -> Option<&SiteConfig> {
        self.sites.iter().find(|entry| entry.site == site)
    }

    pub fn user_agent_for(&self, site: SiteId) -> &str {
        self.site_entry(site)
            .and_then(|entry| entry.user_agent.as_deref())
            .unwrap_or(self.user_agent.as_str())
    }

    pub fn delay_for(&self, site: SiteId) -> PolitenessDelay {
        self.site_entry(site)
            .and_then(|entry| entry.politeness_delay_ms)
            .unwrap_or(self.politeness_delay_ms)
            .to_delay()
    }

    /// Sites scraped when the caller does not name any. A site without an entry is enabled.
    pub fn enabled_sites(&self) -> Vec<SiteId> {
        SiteId::ALL
            .into_iter()
            .filter(|site| self.site_entry(*site).is_none_or(|entry| entry.enabled))
            .collect()
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_site() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.enabled_sites(), SiteId::ALL.to_vec());
        assert_eq!(config.user_agent_for(SiteId::Amazon), FIREFOX_USER_AGENT);
        assert_eq!(config.user_agent_for(SiteId::EstanteVirtual), CHROME_USER_AGENT);
        assert_eq!(config.delay_for(SiteId::Americanas), PolitenessDelay::from_millis(1000, 5000));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "max_concurrency": 2,
                "sites": [
                    {"site": "amazon", "enabled": false},
                    {"site": "travessa", "politeness_delay_ms": {"min_ms": 0, "max_ms": 10}}
                ]
            }"#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(!config.enabled_sites().contains(&SiteId::Amazon));
        assert!(config.enabled_sites().contains(&SiteId::MercadoLivre));
        assert_eq!(config.delay_for(SiteId::Travessa), PolitenessDelay::from_millis(0, 10));
        assert_eq!(config.user_agent_for(SiteId::Travessa), CHROME_USER_AGENT);
    }

    #[test]
    fn rejects_inverted_delay_and_duplicates() {
        let mut config = AppConfig::default();
        config.politeness_delay_ms = DelayRange { min_ms: 10, max_ms: 1 };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.sites.push(config.sites[0].clone());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = AppConfig { max_concurrency: 0, ..AppConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_site_name_is_rejected() {
        let parsed = serde_json::from_str::<AppConfig>(r#"{"sites": [{"site": "submarino"}]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(load_config("does/not/exist.json"), Err(ConfigError::Io(_))));
    }
}
