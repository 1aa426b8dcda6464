// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing and help text for route-plugin-cli.

use std::path::PathBuf;

use openshift_route_plugin::WeightDestination;

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "route-plugin-cli - OpenShift Route traffic router tooling v{}

USAGE:
    route-plugin-cli [COMMAND] [OPTIONS]

COMMANDS:
    plan         Compute the backend weights for a desired canary weight
    preview      Apply a weight change to a Route file and print the result
    config       Inspect plugin settings (show, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    -h, --help     Show help for command
    -V, --version  Show version information

EXAMPLES:
    route-plugin-cli plan --weight 30
    route-plugin-cli plan --weight 40 --destination preview-svc=10@6f8d9c
    route-plugin-cli preview --route route.json --stable stable-svc --canary canary-svc --weight 30
    route-plugin-cli config show

ENVIRONMENT:
    ROUTE_PLUGIN_CONFIG             TOML settings file
    ROUTE_PLUGIN_LOG_LEVEL          Log level (trace, debug, info, warn, error)
    ROUTE_PLUGIN_LOG_FORMAT         Log format (text, json)
    ROUTE_PLUGIN_FAILURE_POLICY     Multi-route failure policy (fail-fast, continue)
    ROUTE_PLUGIN_DEFAULT_NAMESPACE  Namespace for rollouts that carry none
    RUST_LOG                        Log filter, overrides the configured level

EXIT CODES:
    0  Success
    1  Failure
    2  Configuration or usage error
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    match command {
        "plan" => print_plan_help(),
        "preview" => print_preview_help(),
        "config" => print_config_help(),
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'route-plugin-cli help' for general usage.",
                command
            );
        }
    }
}

fn print_plan_help() {
    eprintln!(
        "route-plugin-cli plan - Compute backend weights

USAGE:
    route-plugin-cli plan --weight <N> [--destination <SVC=W[@HASH]>]...

OPTIONS:
    --weight <N>                 Desired canary weight (0-100)
    --destination <SVC=W[@HASH]> Additional destination taking W out of the canary share

EXIT CODES:
    0  Plan computed
    1  Weights rejected
    2  Usage error
"
    );
}

fn print_preview_help() {
    eprintln!(
        "route-plugin-cli preview - Preview a Route update

USAGE:
    route-plugin-cli preview --route <FILE> --stable <SVC> --canary <SVC> --weight <N> [OPTIONS]

OPTIONS:
    --route <FILE>               Route object as JSON
    --stable <SVC>               Stable service name
    --canary <SVC>               Canary service name
    --weight <N>                 Desired canary weight (0-100)
    --destination <SVC=W[@HASH]> Additional destination (repeatable)

DESCRIPTION:
    Runs the full reconciliation against an in-memory copy of the Route and
    prints the Route as it would be written. The cluster is never contacted.
"
    );
}

fn print_config_help() {
    eprintln!(
        "route-plugin-cli config - Inspect plugin settings

USAGE:
    route-plugin-cli config <SUBCOMMAND>

SUBCOMMANDS:
    show           Show effective settings as JSON
    validate       Validate settings (exit 2 if invalid)
"
    );
}

/// Weight inputs shared by `plan` and `preview`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightArgs {
    pub weight: i32,
    pub destinations: Vec<WeightDestination>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArgs {
    pub route: PathBuf,
    pub stable: String,
    pub canary: String,
    pub weights: WeightArgs,
}

/// Parse `SVC=W` or `SVC=W@HASH`.
pub fn parse_destination(raw: &str) -> Result<WeightDestination, String> {
    let (service, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid destination '{}', expected SVC=W[@HASH]", raw))?;
    let (weight, hash) = match rest.split_once('@') {
        Some((w, h)) => (w, Some(h)),
        None => (rest, None),
    };
    let weight: i32 = weight
        .trim()
        .parse()
        .map_err(|_| format!("Invalid weight '{}' in destination '{}'", weight, raw))?;

    let destination = WeightDestination::new(service.trim(), weight);
    Ok(match hash.map(str::trim).filter(|h| !h.is_empty()) {
        Some(h) => destination.with_pod_template_hash(h),
        None => destination,
    })
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn parse_weight(raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Invalid value for --weight: {}", raw))
}

/// Parse `plan` arguments (`args` excludes the program and command names).
pub fn parse_plan_args(args: &[String]) -> Result<WeightArgs, String> {
    let mut weight = None;
    let mut destinations = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--weight" => {
                weight = Some(parse_weight(value_of(args, i, "--weight")?)?);
                i += 2;
            }
            "--destination" => {
                destinations.push(parse_destination(value_of(args, i, "--destination")?)?);
                i += 2;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    let weight = weight.ok_or_else(|| "Missing required --weight".to_string())?;
    Ok(WeightArgs {
        weight,
        destinations,
    })
}

/// Parse `preview` arguments (`args` excludes the program and command names).
pub fn parse_preview_args(args: &[String]) -> Result<PreviewArgs, String> {
    let mut route = None;
    let mut stable = None;
    let mut canary = None;
    let mut weight_args = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--route" => route = Some(PathBuf::from(value_of(args, i, "--route")?)),
            "--stable" => stable = Some(value_of(args, i, "--stable")?.to_string()),
            "--canary" => canary = Some(value_of(args, i, "--canary")?.to_string()),
            flag @ ("--weight" | "--destination") => {
                weight_args.push(flag.to_string());
                weight_args.push(value_of(args, i, flag)?.to_string());
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 2;
    }

    Ok(PreviewArgs {
        route: route.ok_or_else(|| "Missing required --route".to_string())?,
        stable: stable.ok_or_else(|| "Missing required --stable".to_string())?,
        canary: canary.ok_or_else(|| "Missing required --canary".to_string())?,
        weights: parse_plan_args(&weight_args)?,
    })
}
