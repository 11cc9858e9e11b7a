//! Line-oriented keypad for the terminal.
//!
//! Every character of an input line is a keystroke and `=` commits. Lines
//! starting with `:` are actions:
//!
//! | command           | effect                               |
//! |-------------------|--------------------------------------|
//! | `:c`, `:clear`    | clear the expression                 |
//! | `:back`           | delete the last character            |
//! | `:%`, `:percent`  | turn the trailing number into a %    |
//! | `:history`        | list history, newest first           |
//! | `:use N`          | continue from the N-th listed result |
//! | `:clear-history`  | delete all history                   |
//! | `:q`, `:quit`     | leave                                |

use crate::calculator::format_number;
use crate::history::HistoryEntry;
use crate::session::{Key, Session};
use crate::storage::Storage;
use std::io::{self, BufRead, Write};

enum Command {
    Keys(String),
    Clear,
    Back,
    Percent,
    History,
    Use(usize),
    ClearHistory,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(action) = trimmed.strip_prefix(':') else {
        return Command::Keys(trimmed.to_string());
    };

    let mut parts = action.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("c" | "clear"), None) => Command::Clear,
        (Some("back"), None) => Command::Back,
        (Some("%" | "percent"), None) => Command::Percent,
        (Some("history"), None) => Command::History,
        (Some("use"), Some(n)) => match n.parse() {
            Ok(n) if n > 0 => Command::Use(n),
            _ => Command::Unknown(trimmed.to_string()),
        },
        (Some("clear-history"), None) => Command::ClearHistory,
        (Some("q" | "quit"), None) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Newest first, as the history panel lists them.
fn newest_first(entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    entries.into_iter().rev().collect()
}

fn write_screen<S: Storage, W: Write>(session: &Session<S>, out: &mut W) -> io::Result<()> {
    let display = session.display();
    let expression = if display.expression.is_empty() {
        " "
    } else {
        display.expression.as_str()
    };
    writeln!(out, "{}", expression)?;
    writeln!(out, "= {}", display.result)
}

/// Write history entries, newest first and numbered from 1.
pub fn write_history<W: Write>(entries: Vec<HistoryEntry>, out: &mut W) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No history yet");
    }
    for (i, entry) in newest_first(entries).iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} = {}",
            i + 1,
            entry.expression,
            format_number(entry.result)
        )?;
    }
    Ok(())
}

/// Drive `session` from `input` until end of input or `:q`.
pub fn run<S, R, W>(session: &mut Session<S>, input: R, mut out: W) -> io::Result<()>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    write_screen(session, &mut out)?;

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Command::Keys(keys) => {
                for c in keys.chars() {
                    if c == '=' {
                        if let Err(e) = session.press(Key::Equals) {
                            writeln!(out, "Invalid expression: {}", e)?;
                        }
                    } else {
                        session.input(c);
                    }
                }
            }
            Command::Clear => session.clear(),
            Command::Back => session.backspace(),
            Command::Percent => session.apply_percent(),
            Command::History => {
                write_history(session.history(), &mut out)?;
                continue;
            }
            Command::Use(n) => match newest_first(session.history()).get(n - 1) {
                Some(entry) => session.recall(entry),
                None => writeln!(out, "No history entry {}", n)?,
            },
            Command::ClearHistory => {
                session.clear_history();
                writeln!(out, "History cleared")?;
                continue;
            }
            Command::Quit => break,
            Command::Unknown(cmd) => {
                writeln!(out, "Unknown command {}", cmd)?;
                continue;
            }
        }
        write_screen(session, &mut out)?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStore;
    use crate::storage::MemoryStorage;
    use std::io::Cursor;

    fn run_script(script: &str) -> (String, Session<MemoryStorage>) {
        let mut session = Session::new(HistoryStore::new(MemoryStorage::new()));
        let mut out = Vec::new();
        run(&mut session, Cursor::new(script.as_bytes()), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), session)
    }

    #[test]
    fn test_typing_shows_preview() {
        let (out, session) = run_script("2+3\n*4\n");
        assert!(out.contains("2+3\n= 5\n"));
        assert!(out.contains("2+3*4\n= 14\n"));
        assert_eq!(session.expression(), "2+3*4");
    }

    #[test]
    fn test_commit_and_history() {
        let (out, session) = run_script("2+2=\n:history\n");
        assert!(out.contains("4\n= 4\n"));
        assert!(out.contains("  1. 2+2 = 4\n"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_failed_commit_reports_error() {
        let (out, session) = run_script("1/0=\n");
        assert!(out.contains("Invalid expression: result is not a finite number"));
        assert!(out.contains("1/0\n= Error\n"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_use_recalls_entry() {
        let (_, session) = run_script("1+1=\n:c\n3*3=\n:c\n:use 2\n");
        assert_eq!(session.expression(), "2");
    }

    #[test]
    fn test_actions() {
        let (out, session) = run_script("50\n:%\n:back\n:bogus\n:clear-history\n:history\n");
        assert!(out.contains("0.5\n= 0.5\n"));
        assert!(out.contains("Unknown command :bogus"));
        assert!(out.contains("History cleared"));
        assert!(out.contains("No history yet"));
        assert_eq!(session.expression(), "0.");
    }

    #[test]
    fn test_quit_stops_reading() {
        let (_, session) = run_script("1\n:q\n2\n");
        assert_eq!(session.expression(), "1");
    }
}
