//! Branch Ledger CLI
//!
//! Runs a ledger script against a fresh bank and prints lookup results and
//! customer reports. Without arguments it runs the bundled Arizona demo.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                  # bundled demo
//! cargo run -- script.csv "Arizona"          # custom script and bank name
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` to see every ledger mutation, `warn` for rejections

use branch_ledger::{Result, ScriptRunner};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Cursor};
use std::process;

const DEMO_SCRIPT: &str = include_str!("../demos/arizona.csv");
const DEMO_BANK: &str = "Arizona";
const DEFAULT_BANK: &str = "Main Bank";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let stdout = io::stdout();
    let handle = stdout.lock();

    let summary = match args.get(1) {
        Some(path) => {
            let bank_name = args.get(2).map(String::as_str).unwrap_or(DEFAULT_BANK);
            let reader = BufReader::new(File::open(path)?);
            ScriptRunner::new(bank_name).run(reader, handle)?
        }
        None => ScriptRunner::new(DEMO_BANK).run(Cursor::new(DEMO_SCRIPT), handle)?,
    };

    info!(
        "Script finished: {} applied, {} rejected",
        summary.applied, summary.rejected
    );
    Ok(())
}
