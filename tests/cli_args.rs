use clap::Parser;
use preserve::cli::{Command, PartitionArgs, PreserveArgs};
use preserve::config::{Config, LogLevel, PARTITIONING_PATTERN};
use preserve::partition::PartitionMode;
use std::path::PathBuf;

#[test]
fn partition_defaults_to_dryrun() {
    let args = PartitionArgs::parse_from(["partition", "/src", "/dst"]);
    assert_eq!(args.mode, PartitionMode::DryRun);
    assert_eq!(args.source, PathBuf::from("/src"));
    assert_eq!(args.destination, PathBuf::from("/dst"));
    assert!(args.pattern.is_none());
}

#[test]
fn partition_rejects_unknown_mode() {
    assert!(PartitionArgs::try_parse_from(["partition", "/s", "/d", "-m", "link"]).is_err());
    assert!(PartitionArgs::try_parse_from(["partition", "/s"]).is_err());
}

#[test]
fn flags_override_config() {
    let args = PartitionArgs::parse_from([
        "partition", "/s", "/d", "--mode", "move", "--pattern", r"^(\w+)-(\d+)$", "--debug",
    ]);
    let mut cfg = Config::default();
    assert_eq!(cfg.pattern, PARTITIONING_PATTERN);
    args.apply_overrides(&mut cfg);
    assert_eq!(args.mode, PartitionMode::Move);
    assert_eq!(cfg.pattern, r"^(\w+)-(\d+)$");
    assert_eq!(cfg.log_level, LogLevel::Debug);
}

#[test]
fn debug_wins_over_log_level() {
    let args = PartitionArgs::parse_from(["partition", "/s", "/d", "-d", "--log-level", "quiet"]);
    assert_eq!(args.log.effective_log_level(), Some(LogLevel::Debug));
    let args = PartitionArgs::parse_from(["partition", "/s", "/d", "--log-level", "info"]);
    assert_eq!(args.log.effective_log_level(), Some(LogLevel::Info));
}

#[test]
fn invalid_log_level_is_rejected() {
    let err = PartitionArgs::try_parse_from(["partition", "/s", "/d", "--log-level", "loud"]).unwrap_err();
    assert!(err.to_string().contains("invalid log level"), "{err}");
    assert!(PreserveArgs::try_parse_from(["preserve", "compare", "a.csv", "--log-level", "loud"]).is_err());
    let args = PartitionArgs::parse_from(["partition", "/s", "/d", "--log-level", "VERBOSE"]);
    assert_eq!(args.log.log_level, Some(LogLevel::Info));
}

#[test]
fn compare_takes_one_or_more_manifests() {
    let args = PreserveArgs::parse_from(["preserve", "compare", "a.csv", "b.txt", "c.json"]);
    match args.command {
        Command::Compare { first, other } => {
            assert_eq!(first, PathBuf::from("a.csv"));
            assert_eq!(other, vec![PathBuf::from("b.txt"), PathBuf::from("c.json")]);
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(PreserveArgs::try_parse_from(["preserve", "compare"]).is_err());
}

#[test]
fn global_log_flags_after_subcommand() {
    let args = PreserveArgs::parse_from(["preserve", "inventory", "/t", "--json", "--log-level", "info"]);
    assert!(args.log.json);
    assert_eq!(args.log.effective_log_level(), Some(LogLevel::Info));
}
