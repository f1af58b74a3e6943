pub mod core;
pub mod game;
pub mod input;

pub use game::{Session, MoveError};
