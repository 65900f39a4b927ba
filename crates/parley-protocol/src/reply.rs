//! Builds the textual reply frames a command server sends back.
//!
//! Every frame is CRLF-terminated ASCII. A handler reports success with
//! `OK` (optionally followed by detail text) and failure with `FAIL <code>`.
//! Multi-line informational replies use [`list_line`]: each content line is
//! prefixed with a space so a client can tell list content apart from the
//! terminating `OK`. The daemon crate owns transmission; these builders are
//! pure text.

use std::fmt::Display;

/// Terminator appended to every frame.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Failure code for malformed or incomplete commands.
pub const SYNTAX: &str = "syntax";

/// A bare success frame: `OK\r\n`.
#[must_use]
pub fn ok() -> String {
    format!("OK{LINE_TERMINATOR}")
}

/// A success frame carrying detail text: `OK <detail>\r\n`.
#[must_use]
pub fn ok_with(detail: impl Display) -> String {
    format!("OK {detail}{LINE_TERMINATOR}")
}

/// A bare failure frame: `FAIL <code>\r\n`.
#[must_use]
pub fn fail(code: &str) -> String {
    format!("FAIL {code}{LINE_TERMINATOR}")
}

/// A failure frame carrying detail text: `FAIL <code> <detail>\r\n`.
#[must_use]
pub fn fail_with(code: &str, detail: impl Display) -> String {
    format!("FAIL {code} {detail}{LINE_TERMINATOR}")
}

/// One line of a multi-line informational reply.
#[must_use]
pub fn list_line(text: impl Display) -> String {
    format!(" {text}{LINE_TERMINATOR}")
}

/// The unsolicited watched-file event frame: `.stat 0\r\n` / `.stat 1\r\n`.
#[must_use]
pub fn stat_event(present: bool) -> String {
    format!(".stat {}{LINE_TERMINATOR}", u8::from(present))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_success_replies() {
        assert_eq!(ok(), "OK\r\n");
        assert_eq!(ok_with(7), "OK 7\r\n");
        assert_eq!(ok_with(format_args!("{:.4}", 6.0)), "OK 6.0000\r\n");
    }

    #[test]
    fn frames_failure_replies() {
        assert_eq!(fail(SYNTAX), "FAIL syntax\r\n");
        assert_eq!(fail_with("range", "value out of range"), "FAIL range value out of range\r\n");
    }

    #[test]
    fn list_lines_lead_with_a_space() {
        assert_eq!(list_line("add <integer> <integer>"), " add <integer> <integer>\r\n");
    }

    #[test]
    fn frames_stat_events() {
        assert_eq!(stat_event(true), ".stat 1\r\n");
        assert_eq!(stat_event(false), ".stat 0\r\n");
    }
}
