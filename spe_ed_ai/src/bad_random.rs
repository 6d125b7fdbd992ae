use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::game::Game;
use crate::rules::Rules;
use crate::search::{search, Decision};
use crate::{Ai, AnswerSender};

pub const NAME: &str = "BadRandomAI";

struct Inner {
    answer: Option<AnswerSender>,
    rng: StdRng,
}

/// Performs random actions, only steering clear of cells that are already
/// filled. It makes no attempt to avoid crashing into other players' next
/// moves.
pub struct BadRandomAi {
    rules: Rules,
    inner: Mutex<Inner>,
}

impl BadRandomAi {
    pub fn new(rules: Rules) -> Self {
        Self::with_rng(rules, StdRng::from_os_rng())
    }

    /// Reproducible candidate order, for tests and replays.
    pub fn with_seed(rules: Rules, seed: u64) -> Self {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rules: Rules, rng: StdRng) -> Self {
        BadRandomAi {
            rules,
            inner: Mutex::new(Inner { answer: None, rng }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one search, or returns `None` when there is nothing to decide.
    fn decide_locked(&self, inner: &mut Inner, game: &Game) -> Option<Decision> {
        if !game.running {
            return None;
        }

        match search(game, &self.rules, &mut inner.rng) {
            Ok(decision) => {
                debug!(
                    action = %decision.action,
                    safe = decision.safe,
                    trials = ?decision.trials,
                    "bad random ai decided"
                );
                Some(decision)
            }
            Err(err) => {
                error!(%err, "bad random ai: cannot decide");
                None
            }
        }
    }
}

impl Ai for BadRandomAi {
    fn name(&self) -> &'static str {
        NAME
    }

    fn set_channel(&self, answer: AnswerSender) {
        self.lock().answer = Some(answer);
    }

    fn decide(&self, game: &Game) {
        let mut inner = self.lock();
        let Some(answer) = inner.answer.clone() else {
            return;
        };

        let Some(decision) = self.decide_locked(&mut inner, game) else {
            return;
        };

        if let Err(err) = answer.try_send(decision.action) {
            match err {
                mpsc::error::TrySendError::Full(action) => {
                    debug!(%action, "bad random ai: receiver not ready, answer dropped")
                }
                mpsc::error::TrySendError::Closed(action) => {
                    debug!(%action, "bad random ai: channel closed, answer dropped")
                }
            }
        }
    }

    fn answer(&self, game: &Game, reply: oneshot::Sender<Decision>) {
        let mut inner = self.lock();
        let Some(decision) = self.decide_locked(&mut inner, game) else {
            return;
        };

        if let Err(decision) = reply.send(decision) {
            warn!(action = %decision.action, "bad random ai: requester went away, answer dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, Board, Direction, Player};
    use std::collections::HashMap;
    use tokio::sync::mpsc::error::TryRecvError;

    fn no_holes() -> Rules {
        Rules::new(10, 100, 6).unwrap()
    }

    fn game_with(board: Board, x: i32, y: i32, direction: Direction, speed: u32) -> Game {
        let me = Player {
            x,
            y,
            direction,
            speed,
            active: true,
            name: String::new(),
            step_counter: 0,
        };
        Game {
            board,
            players: HashMap::from([(1, me)]),
            you: 1,
            running: true,
            deadline: None,
        }
    }

    fn corridor() -> Game {
        let mut board = Board::empty(4, 3);
        for x in 0..4 {
            board.set(x, 0, 2);
            board.set(x, 2, 2);
        }
        game_with(board, 2, 1, Direction::Right, 1)
    }

    fn dead_end() -> Game {
        let mut board = Board::empty(1, 1);
        board.set(0, 0, 1);
        game_with(board, 0, 0, Direction::Left, 1)
    }

    #[test]
    fn test_name() {
        assert_eq!(BadRandomAi::new(Rules::default()).name(), "BadRandomAI");
    }

    #[test]
    fn test_decide_delivers_noop_once() {
        for seed in 0..32 {
            let ai = BadRandomAi::with_seed(no_holes(), seed);
            let (tx, mut rx) = mpsc::channel(4);
            ai.set_channel(tx);

            ai.decide(&corridor());

            assert_eq!(rx.try_recv(), Ok(Action::NoOp));
            assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        }
    }

    #[test]
    fn test_decide_answers_even_when_doomed() {
        for seed in 0..32 {
            let ai = BadRandomAi::with_seed(no_holes(), seed);
            let (tx, mut rx) = mpsc::channel(4);
            ai.set_channel(tx);

            ai.decide(&dead_end());

            assert!(rx.try_recv().is_ok());
            assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        }
    }

    #[test]
    fn test_not_running_sends_nothing() {
        let ai = BadRandomAi::with_seed(no_holes(), 1);
        let (tx, mut rx) = mpsc::channel(4);
        ai.set_channel(tx);

        let mut game = corridor();
        game.running = false;
        ai.decide(&game);

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_without_channel_is_noop() {
        let ai = BadRandomAi::with_seed(no_holes(), 1);
        ai.decide(&corridor());
    }

    #[test]
    fn test_full_channel_does_not_block() {
        let ai = BadRandomAi::with_seed(no_holes(), 1);
        let (tx, mut rx) = mpsc::channel(1);
        tx.try_send(Action::Slower).unwrap();
        ai.set_channel(tx);

        ai.decide(&corridor());

        assert_eq!(rx.try_recv(), Ok(Action::Slower));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_closed_channel_does_not_fail() {
        let ai = BadRandomAi::with_seed(no_holes(), 1);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        ai.set_channel(tx);
        ai.decide(&corridor());
    }

    #[test]
    fn test_latest_channel_wins() {
        let ai = BadRandomAi::with_seed(no_holes(), 5);
        let (old_tx, mut old_rx) = mpsc::channel(1);
        let (new_tx, mut new_rx) = mpsc::channel(1);
        ai.set_channel(old_tx);
        ai.set_channel(new_tx);

        ai.decide(&corridor());

        assert_eq!(old_rx.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(new_rx.try_recv(), Ok(Action::NoOp));
    }

    #[test]
    fn test_unknown_player_sends_nothing() {
        let ai = BadRandomAi::with_seed(no_holes(), 1);
        let (tx, mut rx) = mpsc::channel(1);
        ai.set_channel(tx);

        let mut game = corridor();
        game.you = 42;
        ai.decide(&game);

        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_answer_rendezvous() {
        let ai = BadRandomAi::with_seed(no_holes(), 9);

        let (tx, mut rx) = oneshot::channel();
        ai.answer(&corridor(), tx);
        let decision = rx.try_recv().unwrap();
        assert_eq!(decision.action, Action::NoOp);
        assert!(decision.safe);

        let (tx, mut rx) = oneshot::channel();
        let mut game = corridor();
        game.running = false;
        ai.answer(&game, tx);
        assert!(rx.try_recv().is_err());

        let (tx, rx) = oneshot::channel();
        drop(rx);
        ai.answer(&corridor(), tx);
    }
}
