use std::env;

use anyhow::{bail, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use btreeidx::commands::{cmd_create, cmd_extract, cmd_insert, cmd_load, cmd_print, cmd_search};

//-------------------------------------------------------------------------

const USAGE: &str = "\
Usage:
    btreeidx create <file>
    btreeidx insert <file> <key> <value>
    btreeidx search <file> <key>
    btreeidx load <file> <records-file>
    btreeidx print <file>
    btreeidx extract <file> <out-file>";

fn dispatch(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    match (command.to_ascii_lowercase().as_str(), &args[1..]) {
        ("create", [path]) => cmd_create(path),
        ("insert", [path, key, value]) => cmd_insert(path, key, value),
        ("search", [path, key]) => cmd_search(path, key),
        ("load", [path, records]) => cmd_load(path, records),
        ("print", [path]) => cmd_print(path),
        ("extract", [path, out]) => cmd_extract(path, out),
        _ => bail!(USAGE),
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = dispatch(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

//-------------------------------------------------------------------------
