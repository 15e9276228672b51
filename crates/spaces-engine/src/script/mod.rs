//! Scripts: parse, run and generate
//!
//! - [`parser`]: line syntax and [`ParseError`]
//! - [`executor`]: running scripts through the engine
//! - [`writer`]: generating a script from session history

pub mod executor;
pub mod parser;
pub mod writer;

pub use executor::{check_command_names, check_script, ScriptError, ScriptReport, ScriptStep};
pub use parser::{parse_line, parse_script, resolve_command, ParseError, ScriptLine};
pub use writer::{format_line, generate};
