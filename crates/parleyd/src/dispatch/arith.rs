//! Demonstration arithmetic command set.
//!
//! Illustrates the handler contract: integer and float argument parsing,
//! `FAIL syntax` on malformed input, and a multi-line `help` reply.

use std::io;

use tracing::debug;

use parley_protocol::ServerCommand;

use crate::server::ClientLink;

use super::{CommandHandler, DISPATCH_TARGET};

/// The demo command set: `add`, `sub`, `mul`, `help`.
#[derive(Debug, Default)]
pub struct ArithmeticCommands;

impl ArithmeticCommands {
    /// Builds the demo handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn handle_add(command: &mut ServerCommand, client: &ClientLink) -> io::Result<()> {
        let (Ok(Some(lhs)), Ok(Some(rhs))) = (command.next_i64(), command.next_i64()) else {
            return client.fail_syntax();
        };
        match lhs.checked_add(rhs) {
            Some(sum) => client.pass_with(sum),
            None => client.fail("range"),
        }
    }

    fn handle_sub(command: &mut ServerCommand, client: &ClientLink) -> io::Result<()> {
        let (Ok(Some(lhs)), Ok(Some(rhs))) = (command.next_i64(), command.next_i64()) else {
            return client.fail_syntax();
        };
        match lhs.checked_sub(rhs) {
            Some(difference) => client.pass_with(difference),
            None => client.fail("range"),
        }
    }

    fn handle_mul(command: &mut ServerCommand, client: &ClientLink) -> io::Result<()> {
        let (Ok(Some(lhs)), Ok(Some(rhs))) = (command.next_f64(), command.next_f64()) else {
            return client.fail_syntax();
        };
        client.pass_with(format_args!("{:.4}", lhs * rhs))
    }

    fn handle_help(client: &ClientLink) -> io::Result<()> {
        // List content leads with a space so clients can tell it apart from
        // the terminating OK.
        client.send_list_line("add <integer> <integer>")?;
        client.send_list_line("sub <integer> <integer>")?;
        client.send_list_line("mul <float> <float>")?;
        client.pass()
    }
}

impl CommandHandler for ArithmeticCommands {
    fn handle(&self, mut command: ServerCommand, client: &ClientLink) -> io::Result<()> {
        let name = command.command();
        match name.as_str() {
            "add" => Self::handle_add(&mut command, client),
            "sub" => Self::handle_sub(&mut command, client),
            "mul" => Self::handle_mul(&mut command, client),
            "help" => Self::handle_help(client),
            _ => {
                debug!(target: DISPATCH_TARGET, command = %name, "unknown command");
                client.fail_syntax()
            }
        }
    }
}
