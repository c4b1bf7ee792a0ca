//! sizewatch — reports when the total size of a file or directory changes.
//!
//! Thin binary entry point. All monitoring logic lives in the
//! `sizewatch-core` crate; this file only parses the one argument, wires
//! the termination signal, and prints events.

use anyhow::Context;
use sizewatch_core::format::{format_count, format_size};
use sizewatch_core::monitor::{start_monitor, MonitorConfig, MonitorEvent};
use std::path::PathBuf;

const ANSI_YELLOW: &str = "\u{1b}[33m";
const ANSI_RESET: &str = "\u{1b}[0m";

/// Exit code for command-line usage errors (EX_USAGE from sysexits.h).
const EXIT_USAGE: i32 = 64;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let target = parse_target();

    tracing::info!("sizewatch starting on {}", target.display());

    let handle = start_monitor(MonitorConfig::new(target.clone()))?;

    // SIGINT and SIGTERM route through the same idempotent stop trigger as
    // a programmatic stop, so a repeated signal cannot double-stop anything.
    let shutdown = handle.shutdown_signal();
    ctrlc::set_handler(move || {
        println!("Watch stopped! Termination signal received.");
        shutdown.trigger();
    })
    .context("failed to install termination handler")?;

    println!(
        "Watch task running. Listening for size changes on '{}'",
        target.display()
    );

    for event in handle.receiver.iter() {
        match event {
            MonitorEvent::SizeChanged { size } => {
                println!(
                    "Size is now {} bytes ({}).",
                    format_count(size),
                    format_size(size)
                );
            }
            MonitorEvent::TargetMissing { path } => {
                println!(
                    "Skipping '{}'! {ANSI_YELLOW}There is no such file or directory.{ANSI_RESET}",
                    path.display()
                );
            }
            MonitorEvent::EntrySkipped { path, message } => match path {
                Some(p) => println!("Skipping entry '{}' ({message})", p.display()),
                None => println!("Skipping unreadable entry ({message})"),
            },
            MonitorEvent::Stopped => break,
        }
    }

    handle.join();
    println!("Watcher of dir/file stopped! Shutting down...");
    Ok(())
}

/// Read the single positional path argument, or exit with the usage code.
fn parse_target() -> PathBuf {
    let mut args = std::env::args_os().skip(1);
    match (args.next(), args.next()) {
        (Some(path), None) if !path.is_empty() => PathBuf::from(path),
        _ => {
            println!("Cannot have less or more than 1 arg. First arg should be the path to be monitored.");
            println!("Usage: sizewatch <PATH>   (a file or a directory)");
            std::process::exit(EXIT_USAGE);
        }
    }
}
