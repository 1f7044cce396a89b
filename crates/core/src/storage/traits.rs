//! Storage repository traits
//!
//! The session controller only sees this interface, so it can run against
//! SQLite or any other durable key-value backend.

use crate::error::Result;
use crate::models::DrawResult;

/// Persistence for the session's single draw result
pub trait DrawRepository {
    /// Store the committed draw. Must refuse if one is already stored.
    fn save_draw(&self, result: &DrawResult) -> Result<()>;

    /// Load the committed draw, if any
    fn load_draw(&self) -> Result<Option<DrawResult>>;

    /// Remove the committed draw. Returns false if there was none.
    fn delete_draw(&self) -> Result<bool>;
}
