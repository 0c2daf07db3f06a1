//! Line sources and the read/dispatch loop shared by both shell modes.

use std::{
    collections::BTreeMap,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::CommandRegistry;
use crate::config::Config;

/// Set to any value to read commands from stdin without a line editor.
pub const SCRIPT_ENV: &str = "ROSTER_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::info!(?mode, roster = %context.manager().current_name(), "shell started");

    match mode {
        CliMode::Interactive => {
            let mut source = EditorSource::new(&context.registry)?;
            cli_io::print_info("Type `help` to see available commands.");
            drive(&mut context, &mut source)
        }
        CliMode::Script => {
            let mut source = ScriptSource::new(io::stdin().lock());
            drive(&mut context, &mut source)
        }
    }
}

/// Somewhere command lines come from.
trait LineSource {
    /// The next line to run, or `None` once the session should end.
    fn next_line(&mut self, context: &ShellContext) -> Result<Option<String>, CliError>;
}

/// Interactive input through rustyline, with history and completion.
struct EditorSource {
    editor: Editor<RosterHelper, DefaultHistory>,
}

impl EditorSource {
    fn new(registry: &CommandRegistry) -> Result<Self, CliError> {
        let mut editor = Editor::<RosterHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(RosterHelper::from_registry(registry)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self, context: &ShellContext) -> Result<Option<String>, CliError> {
        loop {
            match self.editor.readline(&context.prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(trimmed).ok();
                    return Ok(Some(trimmed.to_string()));
                }
                Err(ReadlineError::Interrupted) => {
                    if context.confirm_exit()? {
                        return Ok(None);
                    }
                }
                Err(ReadlineError::Eof) => {
                    cli_io::print_info("Exiting shell.");
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Piped input, one command per line.
struct ScriptSource<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ScriptSource<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self, _context: &ShellContext) -> Result<Option<String>, CliError> {
        Ok(self.lines.next().transpose()?)
    }
}

fn drive(context: &mut ShellContext, source: &mut impl LineSource) -> Result<(), CliError> {
    while context.running {
        let Some(line) = source.next_line(context)? else {
            break;
        };
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// Splits a line into words, honouring shell quoting.
pub(crate) fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(line)
        .map_err(|err| CommandError::Message(format!("Could not parse command: {}", err)))
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = tokenize(line)?;

    // Blank lines and `#` comments are skipped so scripts can be annotated.
    let Some(raw) = tokens.first().filter(|token| !token.starts_with('#')) else {
        return Ok(LoopControl::Continue);
    };

    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    match context.dispatch(raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completion and argument hints for the interactive editor.
struct RosterHelper {
    words: Vec<&'static str>,
    names: Vec<&'static str>,
    /// Argument usage keyed by every name and alias.
    arguments: BTreeMap<&'static str, &'static str>,
}

impl RosterHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut arguments = BTreeMap::new();
        let mut names = Vec::new();
        for entry in registry.entries() {
            names.push(entry.name);
            for word in std::iter::once(entry.name).chain(entry.aliases.iter().copied()) {
                arguments.insert(word, entry.argument_usage());
            }
        }
        names.sort_unstable();
        Self {
            words: registry.words().collect(),
            names,
            arguments,
        }
    }

    /// Candidates for the word being typed, given the words before it.
    fn pool(&self, before: &[String]) -> &[&'static str] {
        let before: Vec<&str> = before.iter().map(String::as_str).collect();
        match before.as_slice() {
            [] => &self.words,
            ["help"] => &self.names,
            ["config"] => &["show", "set"],
            ["config", "set"] => &Config::KEYS,
            _ => &[],
        }
    }
}

impl Helper for RosterHelper {}

impl Completer for RosterHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |index| index + 1);
        let before: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let needle = prefix[start..].to_ascii_lowercase();

        let candidates = self
            .pool(&before)
            .iter()
            .filter(|word| word.starts_with(&needle))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for RosterHelper {
    type Hint = String;

    /// After `<command> ` shows the arguments the command expects.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let command = line.trim_start().strip_suffix(' ')?;
        if command.contains(char::is_whitespace) {
            return None;
        }
        self.arguments
            .get(command.to_ascii_lowercase().as_str())
            .filter(|usage| !usage.is_empty())
            .map(|usage| usage.to_string())
    }
}

impl Highlighter for RosterHelper {}

impl Validator for RosterHelper {}
