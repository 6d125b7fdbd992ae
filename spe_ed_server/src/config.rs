use anyhow::Context;
use spe_ed_ai::rules::{read_env_u64, Rules};
use std::env;
use std::time::Duration;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub(crate) const DEFAULT_AI_NAME: &str = "BadRandomAI";
// spe_ed servers usually leave a few seconds per tick; answer well inside that.
pub(crate) const DEFAULT_DECISION_BUDGET_MS: u64 = 500;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) ai_name: String,
    pub(crate) decision_budget: Duration,
    pub(crate) rules: Rules,
}

impl ServerConfig {
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        let rules = Rules::from_env().context("invalid ruleset in environment")?;

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            ai_name: env::var("AI_NAME").unwrap_or_else(|_| DEFAULT_AI_NAME.to_string()),
            decision_budget: Duration::from_millis(read_env_u64(
                "DECISION_BUDGET_MS",
                DEFAULT_DECISION_BUDGET_MS,
            )),
            rules,
        })
    }
}
