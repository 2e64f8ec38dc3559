//! Command-line viewer for serialized object graphs.
//!
//! Reads a document from a file or stdin, prints the lazily expanded tree,
//! and optionally drops into a prompt where each command is one expand
//! action.

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use seth::{
    to_tree_string, DecodeConfig, ExpandOutcome, RenderConfig, Session, SlotPath, ViewConfig,
    ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "seth", version, about = "Inspect a serialized object graph as a lazily expanded tree")]
struct Args {
    /// Document to load; `-` reads stdin
    #[arg(default_value = "-")]
    input: String,

    /// Fail on the first malformed node instead of marking it inline
    #[arg(long)]
    strict: bool,

    /// Top-level field holding the reference table
    #[arg(long, default_value = "dict")]
    table_field: String,

    /// Expand the stub at PATH (repeatable, applied in order)
    #[arg(short, long = "expand", value_name = "PATH")]
    expand: Vec<SlotPath>,

    /// Expand everything N levels below the root
    #[arg(short, long, value_name = "N")]
    depth: Option<usize>,

    /// Upper bound on levels a single depth expansion may open
    #[arg(long, default_value_t = 32)]
    max_depth: usize,

    /// Truncate literals longer than this
    #[arg(long, default_value_t = 60)]
    max_width: usize,

    /// Do not print the reference ids slots were reached through
    #[arg(long)]
    hide_refs: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Start an interactive prompt after loading
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Args {
    fn config(&self) -> ViewerConfig {
        ViewerConfig::new()
            .with_decode(
                DecodeConfig::new()
                    .with_table_field(self.table_field.as_str())
                    .with_strict(self.strict),
            )
            .with_render(RenderConfig::default().with_max_depth(self.max_depth))
            .with_view(
                ViewConfig::default()
                    .with_max_literal_width(self.max_width)
                    .with_show_references(!self.hide_refs),
            )
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let text = read_input(&args.input)?;
    let mut session = Session::from_json_str(&text, args.config())
        .with_context(|| format!("failed to load '{}'", args.input))?;

    for path in &args.expand {
        session
            .expand(path)
            .with_context(|| format!("cannot expand '{}'", path))?;
    }
    if let Some(depth) = args.depth {
        session.expand_to_depth(&SlotPath::root(), depth)?;
    }

    if args.interactive {
        return run_prompt(&mut session);
    }

    match args.format {
        Format::Text => print!("{}", to_tree_string(session.root(), &session.config().view)),
        Format::Json => println!("{}", serde_json::to_string_pretty(session.root())?),
    }
    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read '{}'", input))
}

/// One prompt command.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Show(SlotPath),
    Expand(SlotPath),
    Deep(SlotPath, usize),
    Stats,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        let path = |word: Option<&str>| -> anyhow::Result<SlotPath> {
            Ok(word.unwrap_or("/").parse::<SlotPath>()?)
        };

        let command = match verb {
            "show" | "s" => Command::Show(path(words.next())?),
            "expand" | "e" => match words.next() {
                Some(word) => Command::Expand(path(Some(word))?),
                None => bail!("usage: expand <path>"),
            },
            "deep" | "d" => {
                let target = path(words.next())?;
                let depth = match words.next() {
                    Some(n) => n.parse().with_context(|| format!("bad depth '{}'", n))?,
                    None => 1,
                };
                Command::Deep(target, depth)
            }
            "stats" => Command::Stats,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };
        if words.next().is_some() {
            bail!("too many arguments for '{}'", verb);
        }
        Ok(command)
    }
}

const HELP: &str = "\
commands:
  show [path]          print the tree at path (default: root)
  expand <path>        expand one stub
  deep [path] [n]      expand n levels below path (default: 1)
  stats                count stubs and expanded stubs
  help                 this text
  quit                 leave

paths are '/'-separated field names; write ~1 for '/', ~0 for '~',
~2 for '#', ~e for an empty name, and #N for the Nth child";

fn run_prompt(session: &mut Session) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    print!("{}", to_tree_string(session.root(), &session.config().view));

    loop {
        let line = match editor.readline("seth> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{:#}", err);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(err) = run_command(session, command) {
            eprintln!("{}", err);
        }
    }
    Ok(())
}

fn run_command(session: &mut Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Show(path) => {
            let slot = session.slot(&path)?;
            print!("{}", to_tree_string(slot, &session.config().view));
        }
        Command::Expand(path) => {
            if session.expand(&path)? == ExpandOutcome::AlreadyExpanded {
                println!("'{}' is already expanded", path);
            }
            let slot = session.slot(&path)?;
            print!("{}", to_tree_string(slot, &session.config().view));
        }
        Command::Deep(path, depth) => {
            let expanded = session.expand_to_depth(&path, depth)?;
            println!("expanded {} stubs", expanded);
        }
        Command::Stats => {
            println!(
                "{} references, {} stubs, {} expanded",
                session.table().len(),
                session.stub_count(),
                session.expanded_count()
            );
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}
