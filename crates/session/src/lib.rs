//! Chess session controller.
//!
//! Owns one game at a time in either two-player or versus-computer mode:
//! turn sequencing, delegation of move legality to a [`RulesEngine`],
//! computer move scheduling, board orientation, move history and game-over
//! detection. Rendering and input capture live outside this crate and talk
//! to it through [`Session`] directly or through the [`SessionDriver`] event
//! loop.
//!
//! [`RulesEngine`]: chess_core::RulesEngine

mod computer;
mod config;
mod driver;
mod effects;
mod error;
mod history;
mod orientation;
mod session;
mod view;

pub use computer::*;
pub use config::*;
pub use driver::*;
pub use effects::*;
pub use error::*;
pub use history::*;
pub use orientation::*;
pub use session::*;
pub use view::*;
