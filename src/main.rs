use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::{builder::FalseyValueParser, Parser, Subcommand};
use colored::Colorize;
use miette::{bail, IntoDiagnostic, Result};

use lmc::device::{TerminalInput, TerminalOutput};
use lmc::output::Output;
use lmc::{loader, Air, AsmParser, RunState};

/// lmc is an assembler and interpreter toolchain for the Little Man Computer.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.lmc` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run text `.lmc` or numeric `.lmcc` file directly and output to terminal
    Run {
        /// `.lmc` or `.lmcc` file to run
        name: PathBuf,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Print every executed instruction to stderr
        #[arg(short, long, env = "LMC_TRACE", value_parser = FalseyValueParser::new())]
        trace: bool,
    },
    /// Create numeric `.lmcc` image to run later or view compiled data
    Compile {
        /// `.lmc` file to compile
        name: PathBuf,
        /// Destination to output .lmcc file
        dest: Option<PathBuf>,
    },
    /// Check a `.lmc` file without running or outputting an image
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(lmc::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    match (args.command, args.path) {
        (Some(Command::Run { name, minimal, trace }), _) => run(&name, minimal, trace),
        (Some(Command::Compile { name, dest }), _) => {
            file_message(Green, "Assembling", &name);
            let contents = read_source(&name)?;
            let image = assemble(&contents)?.emit()?;

            let out_file_name = dest.unwrap_or_else(|| name.with_extension("lmcc"));
            fs::write(&out_file_name, loader::format_image(&image)).into_diagnostic()?;

            message(Green, "Finished", "emit image");
            file_message(Green, "Saved", &out_file_name);
            Ok(())
        }
        (Some(Command::Check { name }), _) => {
            file_message(Green, "Checking", &name);
            let contents = read_source(&name)?;
            let air = assemble(&contents)?;
            let image = air.emit()?;
            for label in air.symbols().iter() {
                message(Cyan, "Label", &format!("{} -> {:02}", label.name, label.addr));
            }
            let summary = format!("{} words, {} labels", image.len(), air.symbols().len());
            message(Cyan, "Summary", &summary);
            message(Green, "Success", "no errors found!");
            Ok(())
        }
        (None, Some(path)) => run(&path, false, false),
        (None, None) => {
            println!("\n~ lmc v{VERSION} ~");
            println!("{}", LOGO.truecolor(255, 183, 197).bold());
            println!("{SHORT_INFO}");
            Ok(())
        }
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    if Output::is_minimal() {
        return;
    }
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn run(name: &Path, minimal: bool, trace: bool) -> Result<()> {
    Output::set_minimal(minimal);
    let mut program = match name.extension().and_then(|ext| ext.to_str()) {
        Some("lmc") => {
            file_message(MsgColor::Green, "Assembling", name);
            let contents = read_source(name)?;
            RunState::try_from(assemble(&contents)?)?
        }
        Some("lmcc") => {
            file_message(MsgColor::Green, "Loading", name);
            let contents = read_source(name)?;
            RunState::from_memory(loader::load(&contents)?)
        }
        Some(_) => bail!("File has unknown extension. Exiting..."),
        None => bail!("File has no extension. Exiting..."),
    };
    program.set_trace(trace);

    message(MsgColor::Green, "Running", "loaded program");
    let cycles = program.run(&mut TerminalInput::stdin(), &mut TerminalOutput)?;

    message(MsgColor::Cyan, "Halted", &format!("after {cycles} cycles"));
    file_message(MsgColor::Green, "Completed", name);
    Ok(())
}

fn read_source(name: &Path) -> Result<String> {
    match fs::read_to_string(name) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(lmc::error::file_not_found(name)),
        Err(e) => Err(e).into_diagnostic(),
    }
}

/// Return assembly intermediate representation of source file for further processing
fn assemble(contents: &str) -> Result<Air> {
    AsmParser::new(contents)?.parse()
}

const LOGO: &str = r#"
 ___      __   __  _______
|   |    |  |_|  ||       |
|   |    |       ||       |
|   |    |       ||       |
|   |___ |       ||      _|
|       || ||_|| ||     |_
|_______||_|   |_||_______|"#;

const SHORT_INFO: &str = r"
Welcome to lmc, an all-in-one toolchain for working with
Little Man Computer assembly code.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
