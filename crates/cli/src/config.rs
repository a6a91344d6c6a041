use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use rating_agent::AgentConfig;
use rating_oracle::DataFeedStore;
use rating_registry::{InMemoryTokenRegistry, TokenRegistration, TokenSymbol};
use rating_types::{Address, AssetId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "RATING";
const DEFAULT_FEED_ORACLE: &str = "CONFIG_ORACLE";

/// A secondary asset to register at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub symbol: String,
    pub asset: String,
    pub decimals: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub agent: AgentConfig,
    pub state_dir: PathBuf,
    pub log_level: String,
    /// `pretty` or `json`.
    pub log_format: String,
    pub tokens: Vec<TokenEntry>,
    /// Feed name to decimal price, posted once at startup.
    pub feeds: BTreeMap<String, String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            state_dir: PathBuf::from("./rating-state"),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            tokens: Vec::new(),
            feeds: BTreeMap::new(),
        }
    }
}

impl CliConfig {
    /// File (if given) first, then `RATING__*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: CliConfig = builder
            .build()?
            .try_deserialize()
            .context("invalid rating-cli configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!("log_format must be \"pretty\" or \"json\", got {:?}", self.log_format);
        }
        self.agent.validate()?;
        Ok(())
    }

    pub fn build_registry(&self) -> Result<InMemoryTokenRegistry> {
        let registry = InMemoryTokenRegistry::new();
        for token in &self.tokens {
            let asset = AssetId::new(token.asset.as_str())
                .with_context(|| format!("token {}: bad asset id", token.symbol))?;
            registry
                .register(TokenRegistration {
                    symbol: TokenSymbol::new(token.symbol.as_str()),
                    asset,
                    decimals: token.decimals,
                    description: token.description.clone(),
                    registrant: None,
                })
                .with_context(|| format!("failed to register token {}", token.symbol))?;
        }
        Ok(registry)
    }

    /// Feeds are posted by the first configured oracle, so they are honoured
    /// even when the agent restricts its oracle set.
    pub fn build_feeds(&self) -> Result<DataFeedStore> {
        let store = DataFeedStore::with_oracles(self.agent.oracles.iter().cloned());
        if self.feeds.is_empty() {
            return Ok(store);
        }
        let poster = match self.agent.oracles.first() {
            Some(oracle) => oracle.clone(),
            None => Address::new(DEFAULT_FEED_ORACLE)?,
        };
        let mut payload = BTreeMap::new();
        for (name, value) in &self.feeds {
            let value: Decimal = value
                .trim()
                .parse()
                .with_context(|| format!("feed {name}: {value:?} is not a decimal"))?;
            // config keys may arrive lower-cased
            payload.insert(name.to_ascii_uppercase(), value);
        }
        store.post(&poster, payload, 0)?;
        Ok(store)
    }
}
