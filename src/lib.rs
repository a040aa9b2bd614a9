#![allow(clippy::module_inception)]

use std::{rc::Rc, sync::Once};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod context;
pub mod conversion;
pub mod elaborator;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    pub fn join(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the `tracing` subscriber used by the binary.
///
/// Only initializes when `RUST_LOG` is set, e.g. `RUST_LOG=elaborator=trace`.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Finds the line containing the byte offset `position`.
///
/// Returns the 1-based line number, the line's text and the offset of
/// `position` within that line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // The end-of-file position sits just past the last line.
    content
        .split_inclusive('\n')
        .last()
        .map(|line| (line_number - 1, line.to_string(), line.len()))
}


pub fn display_error(error: &Error, file_name: &str, content: &str) {
    /*
        error: message
        -> final.bj
           |
        20 | var a: # = 1;
           | -------^
    */

    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {} in {}", error.get_error_name(), error.get_construct());
    } else {
        println!(
            "Error: {} in {} ({})",
            error.get_error_name(),
            error.get_construct(),
            error.get_tip()
        );
    }
    println!("-> {}", file_name);

    let Some((line, line_text, line_pos)) = get_line_at_position(content, position.0) else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
