//! The AGI script: one full cycle with the default directive set.
//!
//! ```text
//! RESULTADO1   = "Resultado para <arg 1>"
//! RESULTADO2   = "Resultado para <arg 2>"
//! RESULTADO3   = "Resultado para <arg 3>"
//! nome_cliente = "RAFAEL RIZZO"
//! ```

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::config::ScriptArgs;
use crate::error::Result;
use crate::protocol::Preamble;
use crate::session::{call_tag, ProtocolSession};

/// Number of `RESULTADO<n>` variables derived from the arguments.
pub const RESULT_SLOTS: usize = 3;

/// Fixed customer name sent with every call.
pub const CUSTOMER_NAME: &str = "RAFAEL RIZZO";

/// Buffer the default directives, in order.
pub fn apply_default_variables<R, W>(session: &mut ProtocolSession<R, W>, args: &ScriptArgs)
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for slot in 1..=RESULT_SLOTS {
        session.set_variable(
            format!("RESULTADO{}", slot),
            format!("Resultado para {}", args.get_or_placeholder(slot)),
        );
    }
    session.set_variable("nome_cliente", CUSTOMER_NAME);
}

/// Run the whole cycle: read the preamble, log the arguments, buffer the
/// defaults and flush them tagged with the call's IDs.
pub async fn run<R, W>(session: &mut ProtocolSession<R, W>, args: &ScriptArgs) -> Result<Preamble>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let preamble = session.ingest_preamble().await?;
    let tag = call_tag(preamble.channel_id(), preamble.unique_id());

    session
        .sink()
        .info(&format!("{} Arguments received: {}", tag, args.joined()));

    apply_default_variables(session, args);
    session
        .flush(preamble.channel_id(), preamble.unique_id())
        .await?;

    Ok(preamble)
}
