//! fseqed: command-line editor for Fseq bulk dumps.
//!
//! Usage:
//!   fseqed [--config FILE] info FILE
//!   fseqed [--config FILE] smooth IN OUT
//!   fseqed [--config FILE] normalize IN OUT [--track N|all] [--from A] [--to B] [--unvoiced|--both]
//!   fseqed [--config FILE] pitch IN OUT HZ [--from A] [--to B]
//!   fseqed [--config FILE] request
//!   fseqed [--config FILE] dump FILE

mod commands;
mod config;

use std::env;
use std::path::PathBuf;

use config::Config;

const USAGE: &str = "Usage: fseqed [--config FILE] <info|smooth|normalize|pitch|request|dump> ...";

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = take_option(&mut args, "--config").map(PathBuf::from);
    let config = Config::load(config_path.as_deref());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level()))
        .init();
    config.report();

    let Some(command) = args.first().cloned() else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    let result = match command.as_str() {
        "info" => commands::info(&config, &args[1..]),
        "smooth" => commands::smooth(&config, &args[1..]),
        "normalize" => commands::normalize(&config, &args[1..]),
        "pitch" => commands::pitch(&config, &args[1..]),
        "request" => commands::request(&config),
        "dump" => commands::dump(&config, &args[1..]),
        other => Err(format!("unknown command '{}'\n{}", other, USAGE)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Remove `name VALUE` from `args`, returning VALUE.
pub(crate) fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let i = args.iter().position(|a| a == name)?;
    let value = args.get(i + 1).cloned();
    let end = (i + 2).min(args.len());
    args.drain(i..end);
    value
}

/// Remove a bare `name` flag from `args`, returning whether it was present.
pub(crate) fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|a| a == name) {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    }
}
