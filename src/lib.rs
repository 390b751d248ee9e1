//! # agi-session
//!
//! Asterisk Gateway Interface (AGI) worker.
//!
//! The server spawns the worker for a call, writes a preamble of
//! `agi_*: value` lines on its stdin and reads `SET VARIABLE` commands back
//! from its stdout.
//!
//! ## Architecture
//!
//! - **Protocol** ([`protocol`]): preamble parsing and directive encoding
//! - **Session** ([`ProtocolSession`]): read preamble, buffer directives, flush once
//! - **Audit log** ([`sink`], [`logging`]): injected sink backed by `tracing`
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use agi_session::{ProtocolSession, TracingSink};
//! use tokio::io::BufReader;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> agi_session::Result<()> {
//!     let stdin = BufReader::new(tokio::io::stdin());
//!     let mut session = ProtocolSession::new(stdin, tokio::io::stdout(), Arc::new(TracingSink));
//!
//!     let preamble = session.ingest_preamble().await?;
//!     session.set_variable("GREETING", "hello");
//!     session.flush(preamble.channel_id(), preamble.unique_id()).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod script;
pub mod sink;

mod session;

pub use error::{AgiError, Result};
pub use protocol::{Preamble, VariableDirective};
pub use session::{call_tag, ProtocolSession};
pub use sink::{LogSink, MemorySink, TracingSink};
