use std::path::PathBuf;
use std::process;
use std::str::SplitWhitespace;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use beacon_core::{
    BeaconError, Color, Level, LineId, Mode, OutputPort, PortError, SignalConfig, SignalRegistry,
};

/// Interactive driver for the beacon signal board.
///
/// Reads one command per line from stdin:
///   start <color> [blink|solid]
///   change <color> [blink|solid]
///   stop <color> [blink|solid]
///   stopall
///   on <color> | off <color>
///   status [json]
///   quit
#[derive(Debug, Parser)]
#[command(name = "beacon", about = "Signal board driver", long_about = None)]
struct Cli {
    /// Path to a JSON signal table (defaults to the built-in four-color board).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Real seconds per time-unit; scales every period.
    #[arg(short, long)]
    time_unit: Option<f64>,
}

/// Output port that narrates line transitions instead of driving hardware.
struct ConsolePort;

#[async_trait]
impl OutputPort for ConsolePort {
    async fn configure_output(&self, line: LineId) -> Result<(), PortError> {
        info!(%line, "line configured as output");
        Ok(())
    }

    async fn set_level(&self, line: LineId, level: Level) -> Result<(), PortError> {
        info!(%line, %level, wire = level.as_u8(), "line driven");
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Start(Color, Mode),
    Change(Color, Mode),
    Stop(Color, Mode),
    StopAll,
    PowerOn(Color),
    PowerOff(Color),
    Status { json: bool },
    Quit,
}

fn parse_color(parts: &mut SplitWhitespace<'_>, usage: &str) -> Result<Color, String> {
    let token = parts.next().ok_or_else(|| usage.to_string())?;
    token.parse::<Color>().map_err(|e| e.to_string())
}

/// An omitted mode addresses the blink variant.
fn parse_mode(parts: &mut SplitWhitespace<'_>) -> Result<Mode, String> {
    match parts.next() {
        Some(token) => token.parse::<Mode>().map_err(|e| e.to_string()),
        None => Ok(Mode::Blink),
    }
}

fn parse_command(input: &str) -> Result<Command, String> {
    let mut parts = input.split_whitespace();
    match parts.next() {
        Some("start") => {
            let color = parse_color(&mut parts, "usage: start <color> [blink|solid]")?;
            Ok(Command::Start(color, parse_mode(&mut parts)?))
        }
        Some("change") => {
            let color = parse_color(&mut parts, "usage: change <color> [blink|solid]")?;
            Ok(Command::Change(color, parse_mode(&mut parts)?))
        }
        Some("stop") => {
            let color = parse_color(&mut parts, "usage: stop <color> [blink|solid]")?;
            Ok(Command::Stop(color, parse_mode(&mut parts)?))
        }
        Some("stopall") => Ok(Command::StopAll),
        Some("on") => Ok(Command::PowerOn(parse_color(&mut parts, "usage: on <color>")?)),
        Some("off") => Ok(Command::PowerOff(parse_color(&mut parts, "usage: off <color>")?)),
        Some("status") => Ok(Command::Status {
            json: parts.next() == Some("json"),
        }),
        Some("quit") | Some("exit") => Ok(Command::Quit),
        Some(other) => Err(format!("unknown command: {other}")),
        None => Err("empty command".to_string()),
    }
}

async fn apply(registry: &SignalRegistry, command: Command) -> Result<(), BeaconError> {
    match command {
        Command::Start(color, mode) => registry.start(color, mode),
        Command::Change(color, mode) => registry.change(color, mode),
        Command::Stop(color, mode) => registry.stop(color, mode),
        Command::StopAll => {
            registry.stop_all();
            Ok(())
        }
        Command::PowerOn(color) => registry.power_on(color).await,
        Command::PowerOff(color) => registry.power_off(color).await,
        Command::Status { json } => {
            let status = registry.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status).unwrap_or_default());
            } else {
                for s in &status.signals {
                    println!(
                        "{:<6} {:<5}  armed={}  terminated={}",
                        s.color, s.mode, s.armed, s.terminated
                    );
                }
            }
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

fn load_config(cli: &Cli) -> SignalConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = match std::fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(e) => {
                    error!("failed to read {}: {e}", path.display());
                    process::exit(1);
                }
            };
            match SignalConfig::from_json(&raw) {
                Ok(config) => config,
                Err(e) => {
                    error!("failed to parse {}: {e}", path.display());
                    process::exit(1);
                }
            }
        }
        None => SignalConfig::default(),
    };
    if let Some(time_unit) = cli.time_unit {
        config.time_unit = time_unit;
    }
    config
}

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    let registry = SignalRegistry::new(Arc::new(ConsolePort), config);
    println!("beacon ready; try `start red blink` (quit to exit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = apply(&registry, command).await {
                    eprintln!("{e}");
                }
            }
            Err(usage) => eprintln!("{usage}"),
        }
    }

    // Blocking teardown: returns only once every task has exited.
    registry.shutdown().await;
    println!("all signals stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_full_surface() {
        assert_eq!(
            parse_command("start red blink").unwrap(),
            Command::Start(Color::Red, Mode::Blink)
        );
        assert_eq!(
            parse_command("change green solid").unwrap(),
            Command::Change(Color::Green, Mode::Solid)
        );
        assert_eq!(
            parse_command("stop yellow").unwrap(),
            Command::Stop(Color::Yellow, Mode::Blink)
        );
        assert_eq!(parse_command("stopall").unwrap(), Command::StopAll);
        assert_eq!(parse_command("on blue").unwrap(), Command::PowerOn(Color::Blue));
        assert_eq!(parse_command("off blue").unwrap(), Command::PowerOff(Color::Blue));
        assert_eq!(parse_command("status").unwrap(), Command::Status { json: false });
        assert_eq!(parse_command("status json").unwrap(), Command::Status { json: true });
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn omitted_mode_defaults_to_blink() {
        assert_eq!(
            parse_command("start red").unwrap(),
            Command::Start(Color::Red, Mode::Blink)
        );
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_command("start").is_err());
        assert!(parse_command("start purple").is_err());
        assert!(parse_command("start red flash").is_err());
        assert!(parse_command("blink red").is_err());
        assert!(parse_command("").is_err());
    }
}
