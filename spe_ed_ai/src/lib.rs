//! Strategies for spe_ed, the light-cycle game where every player leaves an
//! impassable trail.
//!
//! An [`Ai`] receives a [`Game`] snapshot each tick and answers with one
//! [`Action`]. Answers are delivered best-effort: either through a channel
//! wired once with [`Ai::set_channel`], or through a one-shot reply slot
//! handed over together with the snapshot ([`Ai::answer`]).
//!
//! # Example
//! ```
//! use spe_ed_ai::{registry::Registry, rules::Rules, Ai, Game};
//!
//! let json = r#"{
//!     "width": 3, "height": 3,
//!     "cells": [[0, 0, 0], [0, 1, 0], [0, 0, 0]],
//!     "players": {"1": {"x": 1, "y": 1, "direction": "up", "speed": 1}},
//!     "you": 1, "running": true
//! }"#;
//! let game: Game = serde_json::from_str(json).unwrap();
//!
//! let ai = Registry::with_defaults().create("BadRandomAI", Rules::default()).unwrap();
//! let (tx, mut rx) = tokio::sync::mpsc::channel(1);
//! ai.set_channel(tx);
//! ai.decide(&game);
//! println!("answer: {}", rx.try_recv().unwrap());
//! ```

pub mod bad_random;
pub mod crash;
pub mod game;
pub mod registry;
pub mod rules;
pub mod search;

use tokio::sync::{mpsc, oneshot};

pub use bad_random::BadRandomAi;
pub use crash::will_crash;
pub use game::{Action, Board, Direction, Game, Kinematics, Player, PlayerId};
pub use rules::Rules;
pub use search::{search, AiError, Decision, Trial, Verdict};

/// Where [`Ai::decide`] delivers its answer.
pub type AnswerSender = mpsc::Sender<Action>;

/// A spe_ed strategy. One instance plays for one player in one game.
pub trait Ai: Send + Sync {
    /// Display identifier, also the registry key.
    fn name(&self) -> &'static str;

    /// Replaces the channel used by later [`Ai::decide`] calls.
    fn set_channel(&self, answer: AnswerSender);

    /// Picks an action for `game` and tries to send it on the wired channel
    /// without blocking. Does nothing if no channel is wired or the game is
    /// not running; a full or closed channel drops the answer.
    fn decide(&self, game: &Game);

    /// Picks an action for `game` and sends the full decision into `reply`.
    /// Nothing is sent if the game is not running.
    fn answer(&self, game: &Game, reply: oneshot::Sender<Decision>);
}
