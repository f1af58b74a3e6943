//! Input module - pointer and coordinate handling
//!
//! - `pointer` - pixel ↔ square mapping under a board orientation

pub mod pointer;

// Re-export commonly used items
pub use pointer::*;
