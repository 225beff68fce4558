//! Command-line interface for dokuscan
//! Scans a DokuWiki markup file and prints the semantic event stream.
//!
//! Usage:
//!   dokuscan scan `<path>` [--format `<format>`]  - Scan a wiki file and print its events

use clap::{Arg, Command};

use dokuscan::doku::scanning::scan_to_events;

fn main() {
    let matches = Command::new("dokuscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("An event-based scanner for DokuWiki markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("scan")
                .about("Scan a wiki file and print its event stream")
                .arg(
                    Arg::new("path")
                        .help("Path to the wiki markup file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('tag', 'json', 'yaml')")
                        .default_value("tag"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("scan", scan_matches)) => {
            let path = scan_matches.get_one::<String>("path").expect("required arg");
            let format = scan_matches.get_one::<String>("format").expect("has default");
            handle_scan_command(path, format);
        }
        _ => unreachable!(),
    }
}

/// Handle the scan command
fn handle_scan_command(path: &str, format: &str) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let events = scan_to_events(&source);
    match format {
        "tag" => {
            for event in &events {
                println!("{}", event.tag());
            }
        }
        "json" => {
            let output = serde_json::to_string_pretty(&events).unwrap_or_else(|e| {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            });
            println!("{}", output);
        }
        "yaml" => {
            let output = serde_yaml::to_string(&events).unwrap_or_else(|e| {
                eprintln!("Serialization error: {}", e);
                std::process::exit(1);
            });
            print!("{}", output);
        }
        other => {
            eprintln!("Unknown format '{}': expected 'tag', 'json' or 'yaml'", other);
            std::process::exit(1);
        }
    }
}
