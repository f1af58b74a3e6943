//! Shared test helpers

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use titan_chess::core::Settings;
use titan_chess::game::ai::{AnalysisEngine, ParamUpdate};
use titan_chess::game::resources::GameMode;
use titan_chess::game::EngineError;

/// What the mock engine saw, readable after the engine is boxed
#[derive(Debug, Default)]
pub struct EngineLog {
    pub updates: Vec<ParamUpdate>,
    pub positions: Vec<String>,
    pub budgets: Vec<Option<Duration>>,
}

/// Scripted engine: answers `best_move` from a queue
pub struct MockEngine {
    pub log: Rc<RefCell<EngineLog>>,
    replies: VecDeque<Result<Option<String>, EngineError>>,
}

impl MockEngine {
    pub fn new() -> (Self, Rc<RefCell<EngineLog>>) {
        let log = Rc::new(RefCell::new(EngineLog::default()));
        let engine = Self {
            log: Rc::clone(&log),
            replies: VecDeque::new(),
        };
        (engine, log)
    }

    pub fn answering(moves: &[&str]) -> (Box<Self>, Rc<RefCell<EngineLog>>) {
        let (mut engine, log) = Self::new();
        for m in moves {
            engine.replies.push_back(Ok(Some(m.to_string())));
        }
        (Box::new(engine), log)
    }

    pub fn then(mut self: Box<Self>, reply: Result<Option<String>, EngineError>) -> Box<Self> {
        self.replies.push_back(reply);
        self
    }
}

impl AnalysisEngine for MockEngine {
    fn configure(&mut self, update: &ParamUpdate) -> Result<(), EngineError> {
        self.log.borrow_mut().updates.push(*update);
        Ok(())
    }

    fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.log.borrow_mut().positions.push(fen.to_string());
        Ok(())
    }

    fn best_move(&mut self, budget: Option<Duration>) -> Result<Option<String>, EngineError> {
        self.log.borrow_mut().budgets.push(budget);
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::Unavailable("no scripted reply".into())))
    }
}

pub fn settings_for(mode: GameMode) -> Settings {
    Settings {
        game_mode: mode,
        ..Settings::default()
    }
}
