//! CLI argument parsing and configuration tests

use boardsync::HostPlatform;
use boardsync::cli::{Cli, Commands};
use boardsync::config::AppConfig;
use boardsync::utils::logging::level_from_flags;
use clap::Parser;
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn test_parse_decorate_command() {
    let cli = Cli::try_parse_from([
        "boardsync",
        "decorate",
        "arduino:avr:uno",
        "cpu=atmega328",
        "baud=115200",
    ])
    .unwrap();

    match cli.command {
        Commands::Decorate {
            fqbn,
            options,
            no_validate,
        } => {
            assert_eq!(fqbn, "arduino:avr:uno");
            assert_eq!(options, vec!["cpu=atmega328", "baud=115200"]);
            assert!(!no_validate);
        }
        _ => panic!("expected decorate"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["boardsync", "ports", "--all", "-vv", "--config", "x.toml"])
        .unwrap();
    assert!(matches!(cli.command, Commands::Ports { all: true }));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
    assert_eq!(level_from_flags(cli.verbose, cli.quiet), LevelFilter::Trace);
}

#[test]
fn test_select_requires_board_name() {
    assert!(Cli::try_parse_from(["boardsync", "select"]).is_err());

    let cli = Cli::try_parse_from([
        "boardsync",
        "select",
        "Arduino Uno",
        "--fqbn",
        "arduino:avr:uno",
        "--port",
        "COM3",
    ])
    .unwrap();
    match cli.command {
        Commands::Select { board, fqbn, port } => {
            assert_eq!(board, "Arduino Uno");
            assert_eq!(fqbn.as_deref(), Some("arduino:avr:uno"));
            assert_eq!(port.as_deref(), Some("COM3"));
        }
        _ => panic!("expected select"),
    }
}

#[test]
fn test_quiet_wins_over_verbose() {
    assert_eq!(level_from_flags(3, true), LevelFilter::Error);
    assert_eq!(level_from_flags(0, false), LevelFilter::Info);
    assert_eq!(level_from_flags(1, false), LevelFilter::Debug);
}

#[tokio::test]
async fn test_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("boardsync.toml");
    let state = dir.path().join("state.ron");
    std::fs::write(
        &path,
        format!(
            "state_file = {:?}\nscan_interval_ms = 250\nplatform = \"windows\"\nlog_level = \"debug\"\n",
            state.display().to_string()
        ),
    )
    .unwrap();

    let config = AppConfig::load(&path).await.unwrap();
    assert_eq!(config.state_path(), state);
    assert_eq!(config.scan_interval().as_millis(), 250);
    assert_eq!(config.platform(), HostPlatform::Windows);
    assert_eq!(config.level_filter(), LevelFilter::Debug);
}

#[tokio::test]
async fn test_malformed_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("boardsync.toml");
    std::fs::write(&path, "scan_interval_ms = [").unwrap();
    assert!(AppConfig::load(&path).await.is_err());
}
