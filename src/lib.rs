//! Party mini-games for the terminal.
//!
//! The [`games`] module holds the game catalog and the playable Stats
//! Challenge. [`picker::ExhaustiblePicker`] is the draw-without-replacement
//! pool the challenge uses for its questions.

pub mod error;
pub mod games;
pub mod picker;

pub use picker::ExhaustiblePicker;
