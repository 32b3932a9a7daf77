//! Command dispatch: bridges CLI args -> resource adapters -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod groups;

use upsnap_api::{Session, Transport};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    transport: &Transport,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(transport, session, args, global).await,
        Command::Groups(args) => groups::handle(transport, session, args, global).await,
        // Config and Completions are handled before a session is opened
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
