//! Command-line layer using clap.
//!
//! The option table is fixed. Parsing never aborts the process: unknown
//! options and switches given a value (`--fullscreen=yes`) are stripped one
//! at a time and the remaining arguments are parsed again. Any other parse
//! failure discards the whole argument list.

use std::collections::BTreeMap;
use std::ffi::OsStr;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use super::diagnostics::{Diagnostic, Notifier};
use super::lookup::Lookup;
use super::setting::Setting;

/// Whether an option is a switch or takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Present or absent.
    Flag,
    /// Requires a value.
    Value,
}

/// One entry of the option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Short flag character.
    pub short: char,
    /// Long option name.
    pub long: &'static str,
    /// The setting this option overrides.
    pub setting: Setting,
    /// Switch or value option.
    pub kind: OptionKind,
    /// Text for the help table.
    pub description: &'static str,
}

const fn flag_option(
    short: char,
    long: &'static str,
    setting: Setting,
    description: &'static str,
) -> OptionSpec {
    OptionSpec {
        short,
        long,
        setting,
        kind: OptionKind::Flag,
        description,
    }
}

const fn value_option(
    short: char,
    long: &'static str,
    setting: Setting,
    description: &'static str,
) -> OptionSpec {
    OptionSpec {
        short,
        long,
        setting,
        kind: OptionKind::Value,
        description,
    }
}

/// The option table, in declaration order.
#[rustfmt::skip]
pub const OPTIONS: [OptionSpec; 18] = [
    flag_option('?', "help", Setting::Help, "list of options incl. description to log and information frame, then exit the application"),
    flag_option('d', "debug", Setting::Debug, "turn on enhanced debug output"),
    value_option('v', "version", Setting::VersionOverride, "override the application version. Some functions will break if the version is not set correct!"),
    flag_option('f', "fullscreen", Setting::Fullscreen, "set to maximize window"),
    value_option('g', "monitor", Setting::Monitor, "sets which monitor (graphical device) to use"),
    value_option('w', "width", Setting::WindowWidth, "override window width. Only usable together with monitor and height"),
    value_option('h', "height", Setting::WindowHeight, "override window height. Only usable together with monitor and width"),
    value_option('x', "xpos", Setting::WindowXpos, "override window starting x coordinate. Only usable together with monitor and ypos"),
    value_option('y', "ypos", Setting::WindowYpos, "override window starting y coordinate. Only usable together with monitor and xpos"),
    flag_option('m', "macros", Setting::ListMacros, "display defined list of macro functions"),
    flag_option('r', "reset", Setting::Reset, "reset startup options to defaults"),
    value_option('F', "file", Setting::DeprecatedLoadCampaign, "load campaign on startup. Deprecated: Please use C or campaign"),
    value_option('C', "campaign", Setting::LoadCampaign, "load campaign on startup. Arg.: Full file path and name of the campaign"),
    flag_option('S', "server", Setting::LoadServer, "start server on startup. Using server parameters from user preferences"),
    value_option('s', "server-delay", Setting::LoadServerDelay, "delay the start of the server for x seconds. e.g. network needs more time to be ready"),
    value_option('A', "autosave", Setting::LoadAutosave, "if there is a newer autosave file than the campaign to load, should the app load it (yes), not load it (no) or ask (ask) for the decision (default is ask)"),
    value_option('D', "datadir", Setting::DataDir, "override the data directory"),
    value_option('P', "props-file", Setting::StartupFile, "override name (& path) of the startup properties file"),
];

const POSITIONALS: &str = "positionals";

/// Successful parse of an argument list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommandLine {
    options: BTreeMap<&'static str, Option<String>>,
    positionals: Vec<String>,
}

impl ParsedCommandLine {
    /// Recognized options: `None` for switches, `Some(value)` for value options.
    #[must_use]
    pub const fn options(&self) -> &BTreeMap<&'static str, Option<String>> {
        &self.options
    }

    /// Arguments that are not options.
    #[must_use]
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let mut options = BTreeMap::new();
        for spec in &OPTIONS {
            match spec.kind {
                OptionKind::Flag => {
                    if matches.get_flag(spec.long) {
                        options.insert(spec.long, None);
                    }
                }
                OptionKind::Value => {
                    if let Some(value) = matches.get_one::<String>(spec.long) {
                        options.insert(spec.long, Some(value.clone()));
                    }
                }
            }
        }

        let positionals = matches
            .get_many::<String>(POSITIONALS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Self {
            options,
            positionals,
        }
    }
}

/// Why a single parse attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// An option is not in the table, or a switch was given a value.
    Unrecognized {
        /// The unknown option, e.g. `--foo` or `-q`, or the whole `--switch=value` token
        option: String,
        /// Parser message
        message: String,
    },
    /// Anything else, e.g. a value option without a value.
    Malformed {
        /// Parser message
        message: String,
    },
}

impl ParseFailure {
    fn message(&self) -> &str {
        match self {
            Self::Unrecognized { message, .. } | Self::Malformed { message } => message,
        }
    }
}

/// Result of [`parse_with_recovery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// The successful parse, possibly of an empty list.
    pub parsed: ParsedCommandLine,
    /// Arguments that took part in the successful parse.
    pub surviving: Vec<String>,
    /// Arguments removed along the way, in removal order.
    pub dropped: Vec<String>,
    /// Every failed attempt, in order.
    pub failures: Vec<ParseFailure>,
}

fn command() -> Command {
    let mut command = Command::new("maptool")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new(POSITIONALS)
                .action(ArgAction::Append)
                .num_args(1..)
                .value_parser(value_parser!(String)),
        );

    for spec in &OPTIONS {
        let arg = Arg::new(spec.long)
            .long(spec.long)
            .short(spec.short)
            .help(spec.description);
        let arg = match spec.kind {
            OptionKind::Flag => arg.action(ArgAction::SetTrue),
            OptionKind::Value => arg
                .action(ArgAction::Set)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(String)),
        };
        command = command.arg(arg);
    }

    command
}

/// A single parse attempt.
fn try_parse(args: &[String]) -> Result<ParsedCommandLine, ParseFailure> {
    match command().try_get_matches_from(args) {
        Ok(matches) => Ok(ParsedCommandLine::from_matches(&matches)),
        Err(error) => {
            let message = error.to_string().trim_end().to_string();
            let reported = match error.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(option)) => Some(option.as_str()),
                _ => None,
            };
            let unrecognized = match error.kind() {
                ErrorKind::UnknownArgument => reported.map(str::to_owned),
                ErrorKind::TooManyValues => {
                    reported.and_then(|option| switch_with_value(args, option))
                }
                _ => None,
            };
            Err(match unrecognized {
                Some(option) => ParseFailure::Unrecognized { option, message },
                None => ParseFailure::Malformed { message },
            })
        }
    }
}

/// Finds a switch written with an attached value, e.g. `--fullscreen=yes`.
///
/// `reported` is the option as the parser names it. Returns the whole token.
fn switch_with_value(args: &[String], reported: &str) -> Option<String> {
    let name = reported.split_whitespace().next()?;
    let spec = OPTIONS.iter().find(|spec| {
        spec.kind == OptionKind::Flag
            && (name.strip_prefix("--") == Some(spec.long) || name == format!("-{}", spec.short))
    })?;
    let long = format!("--{}=", spec.long);
    let short = format!("-{}=", spec.short);
    args.iter()
        .find(|arg| arg.starts_with(&long) || arg.starts_with(&short))
        .cloned()
}

/// Finds the argument the parser complained about.
///
/// Matches `--name`, `--name=value`, and for a short option any single-dash
/// cluster containing its character.
fn offending_index(args: &[String], option: &str) -> Option<usize> {
    let exact = args.iter().position(|arg| {
        arg == option
            || arg
                .strip_prefix(option)
                .is_some_and(|rest| rest.starts_with('='))
    });
    if exact.is_some() {
        return exact;
    }

    let short = option.strip_prefix('-').filter(|s| !s.starts_with('-'))?;
    let mut chars = short.chars();
    let c = chars.next().filter(|_| chars.next().is_none())?;
    args.iter()
        .position(|arg| arg.starts_with('-') && !arg.starts_with("--") && arg[1..].contains(c))
}

/// Parses `args` against [`OPTIONS`], repairing the list until a parse succeeds.
///
/// An unrecognized option removes exactly the offending argument; any other
/// failure discards every remaining argument. Each retry works on a strictly
/// shorter list and the empty list always parses, so the loop terminates.
#[must_use]
pub fn parse_with_recovery(args: &[String]) -> ParseOutcome {
    let mut working = args.to_vec();
    let mut dropped = Vec::new();
    let mut failures = Vec::new();

    loop {
        match try_parse(&working) {
            Ok(parsed) => {
                return ParseOutcome {
                    parsed,
                    surviving: working,
                    dropped,
                    failures,
                };
            }
            Err(failure) => {
                let index = match &failure {
                    ParseFailure::Unrecognized { option, .. } => offending_index(&working, option),
                    ParseFailure::Malformed { .. } => None,
                };
                match index {
                    Some(index) => dropped.push(working.remove(index)),
                    None => dropped.append(&mut working),
                }
                failures.push(failure);
            }
        }
    }
}

/// Converts OS arguments to strings, replacing invalid UTF-8 with U+FFFD.
pub fn lossy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<OsStr>,
{
    args.into_iter()
        .map(|arg| arg.as_ref().to_string_lossy().into_owned())
        .collect()
}

/// The command-line layer.
#[derive(Debug, Clone)]
pub struct CommandLineSource {
    args: Vec<String>,
    outcome: ParseOutcome,
}

impl CommandLineSource {
    /// Records the raw arguments (without the program name) and parses them.
    pub fn new<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let outcome = parse_with_recovery(&args);
        Self { args, outcome }
    }

    /// A source with no arguments.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Parses the recorded arguments again. The result is always the same.
    pub fn reparse(&mut self) {
        self.outcome = parse_with_recovery(&self.args);
    }

    /// The full parse outcome.
    #[must_use]
    pub const fn outcome(&self) -> &ParseOutcome {
        &self.outcome
    }

    /// The successful parse.
    #[must_use]
    pub const fn parsed(&self) -> &ParsedCommandLine {
        &self.outcome.parsed
    }

    /// Messages describing the parse, ready for the log.
    ///
    /// Parse failures are user-visible warnings; then one line per surviving
    /// argument, or a single line if none survived.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .outcome
            .failures
            .iter()
            .map(|failure| {
                Diagnostic::warn(format!("Error parsing the command line: {}", failure.message()))
                    .notify_user()
            })
            .collect();

        if self.outcome.surviving.is_empty() {
            diagnostics.push(Diagnostic::info("no argument passed via command line"));
        } else {
            diagnostics.extend(
                self.outcome
                    .surviving
                    .iter()
                    .map(|arg| Diagnostic::info(format!("argument passed via command line: {arg}"))),
            );
        }

        diagnostics
    }

    /// Renders the option table: short flag, padded long flag, description.
    #[must_use]
    pub fn help_text() -> String {
        const TITLE: &str = "Long Option";

        let width = OPTIONS
            .iter()
            .map(|spec| spec.long.len())
            .chain(std::iter::once(TITLE.len()))
            .max()
            .unwrap_or(TITLE.len());

        let mut lines = vec![
            "List of available command line options:".to_string(),
            format!("X | {TITLE:<width$} | Description"),
        ];
        lines.extend(OPTIONS.iter().map(|spec| {
            format!("{} | {:<width$} | {}", spec.short, spec.long, spec.description)
        }));
        lines.push("Application will stop now!".to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Logs the option table, shows it to the user and exits with code 0.
    pub fn print_help(notifier: &dyn Notifier) -> ! {
        let text = Self::help_text();
        tracing::info!("{text}");
        notifier.show_information(&text.replace('\n', "<br>"));
        std::process::exit(0)
    }
}

impl Lookup for CommandLineSource {
    fn is_set(&self, key: &str) -> bool {
        self.outcome.parsed.options.contains_key(key)
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.outcome.parsed.options.get(key)?.as_deref()
    }
}
