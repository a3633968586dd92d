use super::*;

#[test]
fn parses_discover_command() {
    let cli = Cli::try_parse_from(["vktap", "discover", "--config", "tap.yaml"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Discover { ref config } if config == &PathBuf::from("tap.yaml")
    ));
}

#[test]
fn parses_sync_with_repeated_streams() {
    let cli = Cli::try_parse_from([
        "vktap",
        "sync",
        "--config",
        "tap.json",
        "--stream",
        "group",
        "--stream",
        "groupStat",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Sync { config, streams } => {
            assert_eq!(config, PathBuf::from("tap.json"));
            assert_eq!(streams, vec!["group", "groupStat"]);
        }
        other => panic!("expected sync, got {other:?}"),
    }
}

#[test]
fn sync_without_streams_selects_all() {
    let cli = Cli::try_parse_from(["vktap", "sync", "--config", "tap.json"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Sync { ref streams, .. } if streams.is_empty()));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["vktap"]).is_err());
}

#[test]
fn config_path_is_shared_by_both_commands() {
    let cli = Cli::try_parse_from(["vktap", "sync", "--config", "a.yaml"]).unwrap();
    assert_eq!(cli.command.config_path(), Path::new("a.yaml"));
}
