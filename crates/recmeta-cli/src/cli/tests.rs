#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::wildcard_enum_match_arm)]

use clap::CommandFactory;

use super::*;

/// The root help output must contain every subcommand name.
#[test]
fn test_root_help_lists_all_subcommands() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());
    for name in ["analyze", "distances", "config"] {
        assert!(
            help.contains(name),
            "root help should mention subcommand '{name}'"
        );
    }
}

/// The root help output must describe every global flag.
#[test]
fn test_root_help_lists_global_flags() {
    let mut cmd = Cli::command();
    let help = format!("{}", cmd.render_help());
    let expected_flags = [
        "--format",
        "--quiet",
        "--verbose",
        "--max-file-size",
        "--no-color",
        "--help",
        "--version",
    ];
    for flag in &expected_flags {
        assert!(
            help.contains(flag),
            "root help should mention flag '{flag}'"
        );
    }
}

/// `recmeta distances --help` must mention `--field` and its values.
#[test]
fn test_distances_help() {
    let mut cmd = Cli::command();
    let sub = cmd
        .find_subcommand_mut("distances")
        .expect("distances subcommand should exist");
    let help = format!("{}", sub.render_help());
    assert!(help.contains("--field"), "help: {help}");
    assert!(help.contains("composer"), "help: {help}");
}

#[test]
fn test_clap_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_analyze_parses_stdin_and_config() {
    let cli = Cli::try_parse_from(["recmeta", "analyze", "-", "--config", "strict.toml"])
        .expect("should parse analyze");
    match cli.command {
        Command::Analyze { file, config } => {
            assert!(matches!(file, PathOrStdin::Stdin), "expected stdin");
            assert_eq!(config, Some(PathBuf::from("strict.toml")));
        }
        _ => panic!("expected Analyze subcommand"),
    }
}

#[test]
fn test_analyze_config_is_optional() {
    let cli = Cli::try_parse_from(["recmeta", "analyze", "library.json"])
        .expect("should parse analyze without config");
    match cli.command {
        Command::Analyze { file, config } => {
            match file {
                PathOrStdin::Path(p) => assert_eq!(p, PathBuf::from("library.json")),
                PathOrStdin::Stdin => panic!("expected a path"),
            }
            assert!(config.is_none());
        }
        _ => panic!("expected Analyze subcommand"),
    }
}

#[test]
fn test_distances_requires_field() {
    let result = Cli::try_parse_from(["recmeta", "distances", "library.json"]);
    assert!(result.is_err(), "--field is required");
}

#[test]
fn test_distances_field_maps_to_core_field() {
    let cli = Cli::try_parse_from(["recmeta", "distances", "-", "--field", "genres"])
        .expect("should parse distances");
    match cli.command {
        Command::Distances { field, .. } => {
            assert_eq!(Field::from(field), Field::Genres);
        }
        _ => panic!("expected Distances subcommand"),
    }
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = Cli::try_parse_from(["recmeta", "distances", "-", "--field", "year"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["recmeta", "config", "--format", "json", "--verbose"])
        .expect("global flags should be accepted after the subcommand");
    assert!(matches!(cli.format, OutputFormat::Json));
    assert!(cli.verbose);
    assert!(!cli.quiet);
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["recmeta", "config", "--quiet", "--verbose"]);
    assert!(result.is_err(), "--quiet and --verbose are exclusive");
}

#[test]
fn test_max_file_size_flag() {
    let cli = Cli::try_parse_from(["recmeta", "config", "--max-file-size", "1024"])
        .expect("should parse --max-file-size");
    assert_eq!(cli.max_file_size, 1024);
}
