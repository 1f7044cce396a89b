//! Data models for giftdraw

mod assignment;
mod draw;
mod participant;

pub use assignment::*;
pub use draw::*;
pub use participant::*;
