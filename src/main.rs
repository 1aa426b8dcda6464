// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! route-plugin-cli entry point.
//!
//! Offline tooling around the weight-reconciliation core: plan weights,
//! preview Route updates and inspect plugin settings.

mod cli_parser;
mod commands;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let rest = args.get(2..).unwrap_or_default();

    match command {
        "plan" => commands::run_plan(rest),
        "preview" => commands::run_preview(rest).await,
        "config" => run_config_cmd(rest),
        "help" | "--help" | "-h" => {
            if let Some(sub) = rest.first() {
                cli_parser::print_command_help(sub);
            } else {
                cli_parser::print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("route-plugin-cli {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            cli_parser::print_usage();
            commands::EXIT_USAGE.into()
        }
    }
}

fn run_config_cmd(args: &[String]) -> ExitCode {
    let sub = args.first().map(|s| s.as_str()).unwrap_or("show");
    match sub {
        "show" => commands::run_config_show(),
        "validate" => commands::run_config_validate(),
        _ => {
            eprintln!("Unknown config subcommand: {}", sub);
            cli_parser::print_command_help("config");
            commands::EXIT_USAGE.into()
        }
    }
}
