use std::{env, env::VarError};

const README: &str = include_str!("./cli-help.txt");

/// Settings that are safe to echo back to the operator.
const PLAIN_ENVS: [&str; 12] = [
    "RUST_LOG",
    "RELAY_HOST",
    "RELAY_PORT",
    "RELAY_PROCESSED_FILE",
    "RELAY_AUTOSTART",
    "VTEX_ACCOUNT",
    "VTEX_ENVIRONMENT",
    "VTEX_BASE_URL",
    "VTEX_DATA_ENTITY",
    "VTEX_ORDER_STATUS",
    "VTEX_TARGET_SALES_CHANNEL",
    "VTEX_SLEEP_TIME_SECONDS",
];

/// Only reported as set or not set.
const SECRET_ENVS: [&str; 2] = ["VTEX_APP_KEY", "VTEX_APP_TOKEN"];

/// The server takes no arguments. If any are given, print the help text and the current environment and return true,
/// so that `main` can exit without starting the relay.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        println!("\n{README}\n");
        println!("{}", describe_environment());
    }
    has_cli_args
}

fn describe_environment() -> String {
    let mut lines = vec!["Current environment values:".to_string()];
    for name in PLAIN_ENVS {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        lines.push(format!("  {name:<35} {val:<15}"));
    }
    for name in SECRET_ENVS {
        let val = match env::var(name) {
            Ok(s) if !s.trim().is_empty() => "Set (hidden)",
            _ => "Not set",
        };
        lines.push(format!("  {name:<35} {val:<15}"));
    }
    lines.join("\n")
}
