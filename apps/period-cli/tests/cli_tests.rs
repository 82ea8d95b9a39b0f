//! CLI parsing and error handling tests

use clap::Parser;
use period_cli::{run_command, Cli, Commands};
use serial_test::serial;
use std::path::PathBuf;

#[test]
fn test_invalid_command() {
    let result = Cli::try_parse_from(["period", "to-xml", "x"]);
    assert!(result.is_err(), "Should fail on invalid command");
}

#[test]
fn test_missing_required_arguments() {
    let result = Cli::try_parse_from(["period", "to-db"]);
    assert!(
        result.is_err(),
        "Should fail when required argument is missing"
    );
}

#[test]
fn test_help_flag() {
    let result = Cli::try_parse_from(["period", "--help"]);
    assert!(result.is_err(), "Help flag should cause early exit");
}

#[test]
fn test_parse_to_iso() {
    let literal = r#"["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]"#;
    let cli = Cli::try_parse_from(["period", "to-iso", literal]).unwrap();
    assert_eq!(
        cli.command,
        Commands::ToIso {
            period: literal.to_string()
        }
    );
    assert!(!cli.verbose);
}

#[test]
#[serial]
fn test_config_flag() {
    std::env::remove_var("PERIOD_CONFIG");
    let cli = Cli::try_parse_from(["period", "-c", "period.yaml", "check", "a/b"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("period.yaml")));
}

#[test]
#[serial]
fn test_config_from_env() {
    std::env::set_var("PERIOD_CONFIG", "/etc/period.json");
    let cli = Cli::try_parse_from(["period", "check", "a/b"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/etc/period.json")));
    std::env::remove_var("PERIOD_CONFIG");
}

#[test]
fn test_round_trip_through_commands() {
    let mut iso = Vec::new();
    run_command(
        &Commands::ToIso {
            period: r#"["2014-03-01 15:00:00+02","2015-05-11 15:30:00+00"]"#.to_string(),
        },
        &mut iso,
    )
    .unwrap();
    let iso = String::from_utf8(iso).unwrap();
    assert_eq!(iso.trim_end(), "2014-03-01T13:00:00.000Z/2015-05-11T15:30:00.000Z");

    let mut db = Vec::new();
    run_command(
        &Commands::ToDb {
            period: iso.trim_end().to_string(),
        },
        &mut db,
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(db).unwrap().trim_end(),
        r#"["2014-03-01 13:00:00+00","2015-05-11 15:30:00+00"]"#
    );
}

#[test]
fn test_errors_write_nothing() {
    let mut output = Vec::new();
    let result = run_command(
        &Commands::ToIso {
            period: r#"["2014-03-01 13:00:00+00"]"#.to_string(),
        },
        &mut output,
    );
    assert!(result.is_err());
    assert!(output.is_empty());
}
