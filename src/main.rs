use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::interpreter::Interpreter;
use rox::lox::{Lox, RunStatus};
use rox::parser::Parser;
use rox::reporter::Reporter;
use rox::scanner::{scan_tokens, Scanner};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    /// Without a subcommand an interactive prompt is started
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its syntax tree
    Parse {
        filename: PathBuf,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },
}

/// Loads a source file through a read‑only memory map.
fn read_source(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;

    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {:?}", filename))?
        .len();

    // Zero‑length mappings are rejected by some platforms.
    if len == 0 {
        return Ok(String::new());
    }

    // SAFETY: the mapping is read‑only and dropped before this function returns;
    // the text is copied out first.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {:?}", filename))?;

    let text = std::str::from_utf8(&map)
        .with_context(|| format!("File {:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", text.len(), filename);

    Ok(text)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Records look like `[parser:212] - message`.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(source: &str, json: bool) -> Result<i32> {
    if json {
        let (tokens, errors) = scan_tokens(source);
        Reporter::default().report_all(&errors);

        println!("{}", serde_json::to_string_pretty(&tokens)?);

        return Ok(if errors.is_empty() { 0 } else { 65 });
    }

    let mut reporter = Reporter::default();

    for item in Scanner::new(source) {
        match item {
            Ok(token) => println!("{}", token),
            Err(e) => reporter.report(&e),
        }
    }

    Ok(if reporter.had_error() { 65 } else { 0 })
}

fn parse(source: &str, json: bool) -> Result<i32> {
    let (tokens, mut errors) = scan_tokens(source);
    let mut parser = Parser::new(&tokens);
    let statements = parser.parse();
    errors.extend(parser.take_errors());

    if !errors.is_empty() {
        Reporter::default().report_all(&errors);
        return Ok(65);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&statements)?);
    } else {
        for stmt in &statements {
            println!("{}", AstPrinter::print_stmt(stmt));
        }
    }

    Ok(0)
}

fn evaluate(source: &str) -> Result<i32> {
    let (tokens, errors) = scan_tokens(source);
    let mut reporter = Reporter::default();

    if !errors.is_empty() {
        reporter.report_all(&errors);
        return Ok(65);
    }

    let mut parser = Parser::new(&tokens);
    let parsed = parser.parse_expression();
    let mut errors = parser.take_errors();

    let expr = match parsed {
        Ok(expr) if errors.is_empty() => expr,
        Ok(_) => {
            reporter.report_all(&errors);
            return Ok(65);
        }
        Err(e) => {
            errors.push(e);
            reporter.report_all(&errors);
            return Ok(65);
        }
    };

    debug!("AST: {}", AstPrinter::print(&expr));

    match Interpreter::new().evaluate(&expr) {
        Ok(value) => {
            println!("{}", value);
            Ok(0)
        }
        Err(e) => {
            reporter.report(&e);
            Ok(70)
        }
    }
}

fn run_prompt() -> Result<i32> {
    info!("Starting interactive prompt");

    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };

        lox.run(&line.context("Failed to read from stdin")?);
        lox.reset_errors();
    }

    println!();
    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // A logger that drops everything, so `log` macros stay cheap
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(&read_source(&filename)?, json)?,

        Some(Commands::Parse { filename, json }) => parse(&read_source(&filename)?, json)?,

        Some(Commands::Evaluate { filename }) => evaluate(&read_source(&filename)?)?,

        Some(Commands::Run { filename }) => {
            let source = read_source(&filename)?;
            info!("Provided input:\n {}", source);

            let status = Lox::new().run(&source);
            debug!("Run finished with {:?}", status);

            status.exit_code()
        }

        None => run_prompt()?,
    };

    if code != RunStatus::Success.exit_code() {
        std::process::exit(code);
    }

    Ok(())
}
