//! Protocol module - preamble parsing and directive encoding.
//!
//! This module implements the text protocol spoken with the server:
//! - Preamble: `key: value` lines closed by a blank line
//! - Directives: `SET VARIABLE <name> "<value>"` lines sent back

mod directive;
mod preamble;

pub use directive::{encode_batch, VariableDirective, SET_VARIABLE};
pub use preamble::{is_terminator, Preamble, CHANNEL_KEY, UNIQUE_ID_KEY};
