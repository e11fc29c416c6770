use g8gen::cli::{Args, Command};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("g8gen")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_new_defaults() {
    let parsed = Args::try_parse_from(make_args(&["new", "./template.g8"])).unwrap();

    assert!(!parsed.verbose);
    match parsed.command {
        Command::New { template, output_dir, force, no_inputs, stdin } => {
            assert_eq!(template, "./template.g8");
            assert_eq!(output_dir, PathBuf::from("."));
            assert!(!force);
            assert!(!no_inputs);
            assert!(!stdin);
        }
        other => panic!("Expected New, got {other:?}"),
    }
}

#[test]
fn test_new_all_flags() {
    let args = make_args(&[
        "n",
        "--force",
        "--verbose",
        "--no-inputs",
        "--stdin",
        "-o",
        "./out",
        "file:///tmp/template.g8",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Command::New { template, output_dir, force, no_inputs, stdin } => {
            assert_eq!(template, "file:///tmp/template.g8");
            assert_eq!(output_dir, PathBuf::from("./out"));
            assert!(force && no_inputs && stdin);
        }
        other => panic!("Expected New, got {other:?}"),
    }
}

#[test]
fn test_scaffold() {
    let parsed = Args::try_parse_from(make_args(&["sf", "model", "-C", "proj", "-v"])).unwrap();

    assert!(parsed.verbose);
    match parsed.command {
        Command::Scaffold { name, project_dir, no_inputs, stdin } => {
            assert_eq!(name, "model");
            assert_eq!(project_dir, PathBuf::from("proj"));
            assert!(!no_inputs);
            assert!(!stdin);
        }
        other => panic!("Expected Scaffold, got {other:?}"),
    }
}

#[test]
fn test_missing_args() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
    assert!(Args::try_parse_from(make_args(&["new"])).is_err());
    assert!(Args::try_parse_from(make_args(&["scaffold"])).is_err());
}

#[test]
fn test_too_many_args() {
    assert!(Args::try_parse_from(make_args(&["new", "./template", "extra"])).is_err());
}
