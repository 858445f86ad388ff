//! Sheet state and edit operations.

mod ops;
mod state;

pub use state::{Sheet, Size};
