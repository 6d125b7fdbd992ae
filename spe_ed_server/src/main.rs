use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use spe_ed_ai::{registry::Registry, Action, Ai, Game, Rules, Trial};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

mod config;
use config::ServerConfig;

#[derive(Clone)]
struct AppState {
    ai: Arc<dyn Ai>,
    rules: Rules,
    budget: Duration,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let ai = Registry::with_defaults()
        .create(&config.ai_name, config.rules)
        .with_context(|| format!("no ai registered as '{}'", config.ai_name))?;

    let app = router(AppState {
        ai: Arc::from(ai),
        rules: config.rules,
        budget: config.decision_budget,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed binding {}", config.bind_addr))?;
    info!(
        addr = %config.bind_addr,
        ai = %config.ai_name,
        rules = ?config.rules,
        "spe_ed bot server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_info))
        .route("/move", post(handle_move))
        .with_state(state)
}

async fn handle_move(
    State(state): State<AppState>,
    Json(game): Json<Game>,
) -> Result<Json<MoveResponse>, StatusCode> {
    if game.me().is_none() {
        warn!(you = game.you, "snapshot has no state for own player");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let (reply, answer) = oneshot::channel();
    let ai = Arc::clone(&state.ai);
    tokio::task::spawn_blocking(move || ai.answer(&game, reply));

    let decision = match tokio::time::timeout(state.budget, answer).await {
        Ok(Ok(decision)) => decision,
        // the ai drops the reply slot when the game is over
        Ok(Err(_)) => return Err(StatusCode::NO_CONTENT),
        Err(_) => {
            warn!(
                budget_ms = state.budget.as_millis() as u64,
                "no answer within the decision budget"
            );
            return Err(StatusCode::NO_CONTENT);
        }
    };

    for trial in &decision.trials {
        debug!(action = %trial.action, verdict = ?trial.verdict, "candidate");
    }
    info!(action = %decision.action, safe = decision.safe, "answer");

    Ok(Json(MoveResponse {
        action: decision.action,
        safe: decision.safe,
        trials: decision.trials,
    }))
}

async fn handle_info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        apiversion: "1".into(),
        name: state.ai.name().to_string(),
        rules: state.rules,
    })
}

#[derive(Serialize)]
struct MoveResponse {
    action: Action,
    safe: bool,
    trials: Vec<Trial>,
}

#[derive(Serialize)]
struct InfoResponse {
    apiversion: String,
    name: String,
    rules: Rules,
}
