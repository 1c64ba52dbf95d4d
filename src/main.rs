//! tblcalc - Apply table formulas to CSV/TSV tables from the command line

mod error;
mod logger;
mod storage;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use storage::Format;
use tblcalc_engine::builtins::BUILTINS;
use tblcalc_engine::{Options, split_formulas};

fn print_usage() {
    eprintln!("Usage: tblcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Table to read (.csv, .tsv); stdin if omitted or -");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --formula <TBLFM>     Formula to apply (can be repeated, or joined with ::)");
    eprintln!("  -s, --script <FILE>       Read formulas from a file, one per line");
    eprintln!("  --no-header               Treat the first row as data");
    eprintln!("  --csv                     Force CSV input/output");
    eprintln!("  --tsv                     Force TSV input/output");
    eprintln!("  --markdown                Write the result as a markdown table");
    eprintln!("  -o, --output <FILE>       Write the result to a file instead of stdout");
    eprintln!("  -d, --debug               Log formula evaluation to stderr");
    eprintln!("  --functions               List built-in functions");
    eprintln!("  -h, --help                Print help");
}

fn print_functions() {
    for builtin in BUILTINS {
        println!("{:<10} {}", builtin.name, builtin.description);
    }
}

#[derive(Default)]
struct Cli {
    file_path: Option<PathBuf>,
    formulas: Vec<String>,
    script_files: Vec<PathBuf>,
    no_header: bool,
    format: Option<Format>,
    markdown: bool,
    output_file: Option<PathBuf>,
    debug: bool,
}

fn run(cli: Cli) -> Result<()> {
    logger::init(cli.debug);

    let mut formulas = Vec::new();
    for path in &cli.script_files {
        let script = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        formulas.extend(split_formulas(&script));
    }
    for formula in &cli.formulas {
        formulas.extend(split_formulas(formula));
    }

    let input_path = cli.file_path.filter(|p| p.as_os_str() != "-");
    let input = storage::read_input(input_path.as_deref()).with_context(|| match &input_path {
        Some(path) => format!("failed to read {}", path.display()),
        None => "failed to read stdin".to_string(),
    })?;

    let format = cli
        .format
        .or_else(|| input_path.as_deref().map(Format::from_path))
        .unwrap_or(Format::Csv);
    let mut table = storage::parse_table(&input, format)?;
    log::debug!("read {} rows, {} formulas", table.len(), formulas.len());

    let options = Options::default().with_header(!cli.no_header);
    tblcalc_engine::apply_with_options(&mut table, &formulas, options)?;

    let rendered = if cli.markdown {
        storage::write_markdown(&table, options.has_header)
    } else {
        storage::write_table(&table, format)
    };

    match &cli.output_file {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("failed to write stdout")?,
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut cli = Cli::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--functions" => {
                print_functions();
                return;
            }
            "-e" | "--formula" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --formula requires a value");
                    std::process::exit(1);
                }
                cli.formulas.push(args[i].to_string());
            }
            "-s" | "--script" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --script requires a file path");
                    std::process::exit(1);
                }
                cli.script_files.push(PathBuf::from(&args[i]));
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                cli.output_file = Some(PathBuf::from(&args[i]));
            }
            "--no-header" => cli.no_header = true,
            "--csv" => cli.format = Some(Format::Csv),
            "--tsv" => cli.format = Some(Format::Tsv),
            "--markdown" => cli.markdown = true,
            "-d" | "--debug" => cli.debug = true,
            "-" => {
                if cli.file_path.is_none() {
                    cli.file_path = Some(PathBuf::from("-"));
                }
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if cli.file_path.is_none() {
                    cli.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
