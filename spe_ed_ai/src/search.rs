use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::crash::will_crash;
use crate::game::{Action, Game, Kinematics, PlayerId};
use crate::rules::Rules;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AiError {
    #[error("no player state for own id {0}")]
    UnknownPlayer(PlayerId),
}

// =============================================================================
// Search Result
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Speed would leave `1..=max_speed`; never collision tested.
    Rejected,
    Crash,
    Safe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trial {
    pub action: Action,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// The action to answer with
    pub action: Action,
    /// False when every candidate failed and `action` is the fallback
    pub safe: bool,
    /// Candidates in the order they were tried
    pub trials: Vec<Trial>,
}

// =============================================================================
// Action Search
// =============================================================================

/// Tries every action in random order and picks the first one that does not
/// crash on the next tick.
///
/// When nothing is safe the first candidate of the shuffled order is
/// returned anyway, so a running game always gets an answer.
pub fn search<R: Rng + ?Sized>(
    game: &Game,
    rules: &Rules,
    rng: &mut R,
) -> Result<Decision, AiError> {
    let me = game.me().ok_or(AiError::UnknownPlayer(game.you))?;
    let start = Kinematics::from(me);

    let mut candidates = Action::ALL;
    candidates.shuffle(rng);

    let mut trials = Vec::with_capacity(candidates.len());
    for action in candidates {
        let verdict = match action.apply(start, rules) {
            None => Verdict::Rejected,
            Some(next) if will_crash(&next, &game.board, rules) => Verdict::Crash,
            Some(_) => Verdict::Safe,
        };
        trials.push(Trial { action, verdict });

        if verdict == Verdict::Safe {
            return Ok(Decision {
                action,
                safe: true,
                trials,
            });
        }
    }

    Ok(Decision {
        action: candidates[0],
        safe: false,
        trials,
    })
}
