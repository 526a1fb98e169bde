//! CLI runner - executes commands

use super::commands::{Cli, Commands, ConfigAction};
use super::output;
use crate::assets::AssetType;
use crate::cancel::StopSignal;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::progress::{ProgressSink, TracingProgress, WriterProgress};
use crate::service::{self, LookupParams, SearchParams, SearchResult};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was returned
    Complete,
    /// Results were printed but the run stopped early
    Partial,
}

impl Outcome {
    /// Process exit code
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Complete => 0,
            Self::Partial => 2,
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<Outcome> {
        match &self.cli.command {
            Commands::Search {
                query,
                fields,
                page_size,
                max_pages,
                collection,
            } => {
                let config = self.load_config()?;
                let params = SearchParams {
                    query: query.clone(),
                    fields: fields.clone(),
                    page_size: page_size.or(config.default_page_size),
                    max_pages: max_pages.or(config.default_max_pages),
                    collection_id: collection.clone(),
                };
                self.search(&config, &params).await
            }
            Commands::Lookup {
                asset_type,
                ids,
                page_size,
                max_pages,
                at_time,
            } => {
                let config = self.load_config()?;
                let params = lookup_params(
                    &config,
                    *asset_type,
                    ids,
                    *page_size,
                    *max_pages,
                    *at_time,
                );
                self.lookup(&config, &params).await
            }
            Commands::Config { action } => self.config(*action),
        }
    }

    /// Load the config file and environment, then apply command-line flags
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.cli.config.as_deref())?;
        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        if let Some(token) = &self.cli.token {
            config.token = Some(token.clone());
        }
        if let Some(org) = &self.cli.org {
            config.organization_id = Some(org.clone());
        }
        Ok(config)
    }

    async fn search(&self, config: &AppConfig, params: &SearchParams) -> Result<Outcome> {
        let client = config.platform_client()?;
        let stop = self.stop_signal()?;
        let progress = self.progress();

        let ctrl_c = stop.cancel_on_ctrl_c();
        let result = service::search(&client, params, &stop, progress.as_ref()).await;
        ctrl_c.abort();

        self.emit(&result?)
    }

    async fn lookup(&self, config: &AppConfig, params: &LookupParams) -> Result<Outcome> {
        let client = config.platform_client()?;
        let stop = self.stop_signal()?;
        let progress = self.progress();

        let ctrl_c = stop.cancel_on_ctrl_c();
        let result = service::lookup(&client, params, &stop, progress.as_ref()).await;
        ctrl_c.abort();

        self.emit(&result?)
    }

    fn config(&self, action: ConfigAction) -> Result<Outcome> {
        match action {
            ConfigAction::Path => {
                let path = self
                    .cli
                    .config
                    .clone()
                    .or_else(AppConfig::default_path)
                    .ok_or_else(|| Error::config("no config directory on this platform"))?;
                println!("{}", path.display());
            }
            ConfigAction::Show => {
                let config = self.load_config()?;
                print!("{}", config.redacted().to_yaml()?);
            }
        }
        Ok(Outcome::Complete)
    }

    /// Stop signal carrying the `--timeout` deadline
    fn stop_signal(&self) -> Result<StopSignal> {
        match self.cli.timeout {
            Some(0) => Err(Error::invalid_argument(
                "timeout",
                "timeout must be greater than 0",
            )),
            Some(secs) => Ok(StopSignal::with_timeout(Duration::from_secs(secs))),
            None => Ok(StopSignal::new()),
        }
    }

    fn progress(&self) -> Box<dyn ProgressSink> {
        if self.cli.quiet {
            Box::new(TracingProgress)
        } else {
            Box::new(WriterProgress::new(std::io::stderr()))
        }
    }

    /// Print the result and report whether it is complete
    fn emit(&self, result: &SearchResult) -> Result<Outcome> {
        println!("{}", output::render(result, self.cli.format)?);

        debug!(
            hits = result.hits.len(),
            pages = ?result.page_count(),
            stop_cause = ?result.stop_cause,
            partial = result.is_partial(),
            "command finished"
        );

        match partial_warning(result) {
            Some(warning) => {
                eprintln!("{warning}");
                Ok(Outcome::Partial)
            }
            None => Ok(Outcome::Complete),
        }
    }
}

/// Closing stderr line for a run that stopped early. It leads with the
/// error kind so it reads as a summary of the progress error line above it.
fn partial_warning(result: &SearchResult) -> Option<String> {
    let error = result.partial_error.as_ref()?;
    Some(format!(
        "Warning: results are incomplete ({}, {} of {} hits): {error}",
        error.kind(),
        result.hits.len(),
        result.total_hits
    ))
}

fn lookup_params(
    config: &AppConfig,
    asset_type: AssetType,
    ids: &[String],
    page_size: Option<u32>,
    max_pages: Option<u32>,
    at_time: Option<DateTime<Utc>>,
) -> LookupParams {
    LookupParams {
        asset_type,
        asset_ids: ids.to_vec(),
        page_size: page_size.or(config.default_page_size),
        max_pages: max_pages.or(config.default_max_pages),
        at_time,
    }
}
