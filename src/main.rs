//! Tabula - apply cell edits and print the resulting sheet.

mod input;

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use tabula_core::{RenderOptions, Sheet};

use input::{Edit, parse_line};

fn print_usage() {
    eprintln!("Usage: tabula [OPTIONS]");
    eprintln!();
    eprintln!("Reads edits of the form CELL=TEXT (e.g. A1=5, A2==A1+1, A1= to clear)");
    eprintln!("from stdin, or from -c arguments, and prints the sheet.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <EDIT>      Apply an edit (can be repeated; stdin is not read)");
    eprintln!("  --texts                   Print cell texts instead of values");
    eprintln!("  -d, --delimiter <CHAR>    Field delimiter (default: tab)");
    eprintln!("  -h, --help                Print help");
}

/// Apply one line to the sheet, reporting rejected edits on stderr.
/// Returns false if the line was rejected.
fn apply(sheet: &mut Sheet, line: &str) -> bool {
    let result = match parse_line(line) {
        Ok(None) => return true,
        Ok(Some(Edit::Set(pos, text))) => sheet.set_cell(pos, &text).map_err(|e| e.to_string()),
        Ok(Some(Edit::Clear(pos))) => sheet.clear_cell(pos).map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut commands: Vec<String> = Vec::new();
    let mut texts = false;
    let mut options = RenderOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires an edit");
                    std::process::exit(1);
                }
                commands.push(args[i].to_string());
            }
            "-d" | "--delimiter" => {
                i += 1;
                let mut chars = args.get(i).map(|s| s.chars()).into_iter().flatten();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => options.delimiter = c,
                    _ => {
                        eprintln!("Error: --delimiter requires a single character");
                        std::process::exit(1);
                    }
                }
            }
            "--texts" => texts = true,
            arg => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut sheet = Sheet::new();
    let mut rejected = 0usize;

    if commands.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            if !apply(&mut sheet, &line) {
                rejected += 1;
            }
        }
    } else {
        for command in &commands {
            if !apply(&mut sheet, command) {
                rejected += 1;
            }
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if texts {
        sheet.write_texts(&mut out, &options)?;
    } else {
        sheet.write_values(&mut out, &options)?;
    }
    out.flush()?;

    if rejected > 0 {
        std::process::exit(1);
    }
    Ok(())
}
