//! `tp25sim`: run the TP25 emulator or inspect protocol messages.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::watch;
use tp25_protocol::{Command, Notification, NotificationContent, ProbeIndex};
use tp25_runner::{Emulator, RunnerConfig, RunnerError};
use tracing_subscriber::EnvFilter;

/// TP25 BLE thermometer emulator
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the emulator until interrupted
    Run {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the transport port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the temperature report interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Log filter used when RUST_LOG is unset
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Serve Prometheus metrics on this address
        #[cfg(feature = "prometheus")]
        #[arg(long)]
        metrics_addr: Option<std::net::SocketAddr>,
    },

    /// Decode a 20-byte notification given as hex and print it as JSON
    Decode {
        /// Notification bytes, e.g. 300f5a0c00...
        hex: String,
    },

    /// Encode a host command and print it as hex
    Encode {
        #[command(subcommand)]
        command: EncodeCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EncodeCommand {
    /// Handshake
    Setup,
    /// Set a probe's alarm thresholds
    SetProfile {
        /// Probe index (1-6)
        #[arg(long)]
        probe: u8,
        /// Alarm index
        #[arg(long, default_value_t = 0)]
        alarm_index: u8,
        /// High threshold as BCD, e.g. 0x2500
        #[arg(long, value_parser = parse_u16, default_value = "0xffff")]
        high: u16,
        /// Low threshold as BCD
        #[arg(long, value_parser = parse_u16, default_value = "0xffff")]
        low: u16,
    },
    /// Request a probe's thresholds
    ReportProfile {
        /// Probe index (1-6)
        #[arg(long)]
        probe: u8,
    },
    /// Opcode 0x26
    UnknownA,
    /// Opcode 0x41
    UnknownB,
}

impl EncodeCommand {
    fn to_command(&self) -> Result<Command, RunnerError> {
        Ok(match *self {
            EncodeCommand::Setup => Command::Setup,
            EncodeCommand::SetProfile {
                probe,
                alarm_index,
                high,
                low,
            } => Command::SetProfile {
                probe: ProbeIndex::try_from(probe)?,
                alarm_index,
                high,
                low,
            },
            EncodeCommand::ReportProfile { probe } => Command::ReportProfile {
                probe: ProbeIndex::try_from(probe)?,
            },
            EncodeCommand::UnknownA => Command::UnknownA,
            EncodeCommand::UnknownB => Command::UnknownB,
        })
    }
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid value {s:?}: {e}"))
}

#[derive(Serialize)]
struct DecodedNotification<'a> {
    raw: String,
    #[serde(flatten)]
    content: &'a NotificationContent,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), RunnerError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            port,
            interval_ms,
            log_level,
            #[cfg(feature = "prometheus")]
            metrics_addr,
        } => {
            init_logging(&log_level);

            #[cfg(feature = "prometheus")]
            if let Some(addr) = metrics_addr {
                if let Err(e) = tp25_metrics::install_prometheus(addr) {
                    tracing::warn!("Failed to install Prometheus exporter: {}", e);
                }
            }
            tp25_metrics::describe_metrics();

            let mut runner_config = match config {
                Some(path) => RunnerConfig::load(&path)?,
                None => RunnerConfig::default(),
            };
            if let Some(port) = port {
                runner_config.transport.port = port;
            }
            if let Some(interval_ms) = interval_ms {
                runner_config.notify_interval_ms = interval_ms;
            }

            run(runner_config).await
        }
        Commands::Decode { hex } => {
            let bytes = hex::decode(hex.trim())?;
            let notification = Notification::decode(&bytes)?;
            let output = DecodedNotification {
                raw: hex::encode(notification.raw.as_bytes()),
                content: &notification.content,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Commands::Encode { command } => {
            println!("{}", hex::encode(command.to_command()?.encode()));
            Ok(())
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Route Ctrl-C into a watch channel that flips to `true` on interrupt.
fn install_interrupt_handler() -> Result<watch::Receiver<bool>, RunnerError> {
    let (stop_tx, stop_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })?;
    Ok(stop_rx)
}

async fn run(config: RunnerConfig) -> Result<(), RunnerError> {
    let mut stop_rx = install_interrupt_handler()?;

    let emulator = Emulator::start(&config).await?;
    eprintln!(
        "{} listening on {} (Ctrl-C to stop)",
        config.device.name,
        emulator.local_addr()
    );

    let _ = stop_rx.changed().await;

    emulator.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u16() {
        assert_eq!(parse_u16("0x2500"), Ok(0x2500));
        assert_eq!(parse_u16("0XFFFF"), Ok(0xFFFF));
        assert_eq!(parse_u16("1234"), Ok(1234));
        assert!(parse_u16("0x10000").is_err());
        assert!(parse_u16("warm").is_err());
        assert!(parse_u16("").is_err());
    }

    #[test]
    fn test_to_command_validates_probe() {
        let command = EncodeCommand::SetProfile {
            probe: 2,
            alarm_index: 1,
            high: 0x1234,
            low: 0x0567,
        };
        assert_eq!(
            command.to_command().unwrap(),
            Command::SetProfile {
                probe: ProbeIndex::new(2).unwrap(),
                alarm_index: 1,
                high: 0x1234,
                low: 0x0567,
            }
        );

        for probe in [0u8, 7] {
            assert!(matches!(
                EncodeCommand::ReportProfile { probe }.to_command(),
                Err(RunnerError::Protocol(tp25_protocol::ProtocolError::ProbeOutOfRange(p))) if p == probe
            ));
        }
    }

    #[test]
    fn test_interrupt_handler_install_failure_is_an_error() {
        let first = install_interrupt_handler().unwrap();
        assert!(!*first.borrow());
        assert!(matches!(
            install_interrupt_handler(),
            Err(RunnerError::Signal(_))
        ));
    }

    #[test]
    fn test_cli_parses_encode_arguments() {
        let cli = Cli::try_parse_from([
            "tp25sim", "encode", "set-profile", "--probe", "3", "--high", "0x0250",
        ])
        .unwrap();
        match cli.command {
            Commands::Encode {
                command: EncodeCommand::SetProfile { probe, alarm_index, high, low },
            } => {
                assert_eq!((probe, alarm_index, high, low), (3, 0, 0x0250, 0xFFFF));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["tp25sim", "encode", "set-profile", "--probe", "1", "--low", "cold"]).is_err());
    }
}
