//! Interactive prompt and stdin script runner over one [`ShellContext`].

use std::collections::BTreeMap;
use std::io::{self, BufRead};

use rustyline::{
    completion::Completer, error::ReadlineError, hint::Hinter, history::DefaultHistory, Cmd,
    Context, Editor, Helper, Highlighter, KeyEvent, Validator,
};
use tracing::debug;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;

/// Set to run commands from stdin without prompts.
pub const SCRIPT_ENV: &str = "SPENDBOOK_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

/// Runs one command per line until `exit` or end of input. Failed commands
/// are reported and the script carries on.
pub(crate) fn run_script<R: BufRead>(context: &mut ShellContext, input: R) -> Result<(), CliError> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let Some(command) = command_text(&line) else {
            continue;
        };
        debug!(line = index + 1, command, "script command");
        if execute(context, command)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ShellHelper::new(context.command_usages())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::info("Type `help` for commands, Tab or `?` to complete.");

    loop {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let Some(command) = command_text(&line) else {
                    continue;
                };
                editor.add_history_entry(command).ok();
                if execute(context, command)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// The command on `line`, or `None` for blank lines and `#` comments.
fn command_text(line: &str) -> Option<&str> {
    let line = line.trim();
    (!line.is_empty() && !line.starts_with('#')).then_some(line)
}

/// Splits `line` shell-style and dispatches it. Only failures of the shell
/// itself are returned; command errors are printed.
fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read `{line}`: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((name, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    match context.dispatch(&name.to_lowercase(), name, &args) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

/// Completes command names and subcommands, and hints a command's
/// arguments once its name has been typed.
#[derive(Helper, Highlighter, Validator)]
struct ShellHelper {
    usages: BTreeMap<&'static str, &'static str>,
}

impl ShellHelper {
    fn new(usages: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            usages: usages.into_iter().collect(),
        }
    }
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let typed = &line[..pos];
        let start = typed.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        let needle = typed[start..].to_ascii_lowercase();
        let words: Vec<&str> = typed[..start].split_whitespace().collect();
        let pool: Vec<&str> = match words.as_slice() {
            [] => self.usages.keys().copied().collect(),
            [command] => subcommands(command).to_vec(),
            _ => Vec::new(),
        };
        let candidates = pool
            .into_iter()
            .filter(|word| word.starts_with(&needle))
            .map(str::to_string)
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let typed = line.strip_suffix(' ')?;
        if typed.is_empty() || typed.contains(char::is_whitespace) {
            return None;
        }
        let name = typed.to_ascii_lowercase();
        let arguments = self.usages.get(name.as_str())?.strip_prefix(name.as_str())?;
        Some(arguments.trim_start().to_string()).filter(|hint| !hint.is_empty())
    }
}

fn subcommands(command: &str) -> &'static [&'static str] {
    match command.to_ascii_lowercase().as_str() {
        "category" => &["add", "edit", "delete", "switch", "list", "next", "prev"],
        "config" => &["show", "set", "backup", "backups", "restore"],
        "view" => &["daily", "monthly", "yearly", "custom", "all"],
        "add" => &["expense", "income"],
        _ => &[],
    }
}
