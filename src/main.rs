//! rowcraft - run table transform pipelines over CSV/JSON files.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use rowcraft_core::storage::{import_json, parse_csv, to_aligned_string, write_csv};
use rowcraft_core::table::{run_pipeline, Step, Table};

/// On-disk pipeline: an ordered list of `[[step]]` tables.
#[derive(Debug, Deserialize)]
struct PipelineFile {
    step: Vec<Step>,
}

fn print_usage() {
    eprintln!("Usage: rowcraft [OPTIONS] <FILE>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <FILE>                    Input table (.csv or .json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --pipeline <FILE>     Apply a TOML pipeline of steps");
    eprintln!("  --header-row              Treat the first row as labels");
    eprintln!("  --header-col              Treat the first column as labels");
    eprintln!("  --json-keys               Turn outer JSON keys into a label column");
    eprintln!("  -o, --output <FILE>       Write the result as CSV instead of printing");
    eprintln!("  -h, --help                Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut pipeline_file: Option<PathBuf> = None;
    let mut output_file: Option<PathBuf> = None;
    let mut header_row = false;
    let mut header_col = false;
    let mut json_keys = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-p" | "--pipeline" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --pipeline requires a file path");
                    std::process::exit(1);
                }
                pipeline_file = Some(PathBuf::from(&args[i]));
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                output_file = Some(PathBuf::from(&args[i]));
            }
            "--header-row" => header_row = true,
            "--header-col" => header_col = true,
            "--json-keys" => json_keys = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let Some(file_path) = file_path else {
        print_usage();
        std::process::exit(1);
    };

    if let Err(e) = run(
        &file_path,
        pipeline_file.as_deref(),
        output_file.as_deref(),
        header_row,
        header_col,
        json_keys,
    ) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(
    file_path: &Path,
    pipeline_file: Option<&Path>,
    output_file: Option<&Path>,
    header_row: bool,
    header_col: bool,
    json_keys: bool,
) -> Result<()> {
    let table = load_table(file_path, header_row, header_col, json_keys)?;

    let table = match pipeline_file {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("reading pipeline {}", path.display()))?;
            let pipeline: PipelineFile = toml::from_str(&src)
                .with_context(|| format!("parsing pipeline {}", path.display()))?;
            run_pipeline(table, &pipeline.step)?
        }
        None => table,
    };

    match output_file {
        Some(path) => {
            std::fs::write(path, write_csv(&table))
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", to_aligned_string(&table)),
    }
    Ok(())
}

fn load_table(path: &Path, header_row: bool, header_col: bool, json_keys: bool) -> Result<Table> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let table = match extension {
        "csv" => parse_csv(&content, header_row, header_col)?,
        "json" => import_json(&content, json_keys)?,
        _ => bail!("unsupported input {}: expected .csv or .json", path.display()),
    };
    Ok(table)
}
