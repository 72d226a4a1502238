//! CLI argument parsing and snapshot-driven generation

use clap::Parser;
use schemagen_cli::{Cli, Commands};
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "database": "shop",
  "tables": {
    "orders": {
      "columns": [
        { "name": "id", "native_type": "int", "key_role": "primary", "extra": "auto_increment" },
        { "name": "status", "native_type": "enum", "full_type": "enum('new','paid')" },
        { "name": "archived", "native_type": "tinyint", "full_type": "tinyint(1)" }
      ],
      "samples": { "archived": ["0", "1", null] }
    }
  }
}"#;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("schemagen").chain(args.iter().copied()))
}

#[test]
fn test_generate_requires_table_or_all() {
    assert!(parse(&["generate", "--database", "shop"]).is_err());
    assert!(parse(&["generate", "--all", "--table", "users"]).is_err());
    assert!(parse(&["generate", "--all"]).is_ok());
}

#[test]
fn test_repeated_tables() {
    let cli = parse(&["generate", "-t", "users", "-t", "orders"]).unwrap();
    let Commands::Generate(cmd) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(cmd.tables, vec!["users".to_string(), "orders".to_string()]);
    assert!(!cmd.all);
}

#[test]
fn test_generate_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("schema.json");
    fs::write(&snapshot, SNAPSHOT).unwrap();
    let out = dir.path().join("out");

    let cli = parse(&[
        "generate",
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
        "--snapshot",
        snapshot.to_str().unwrap(),
        "--table",
        "orders",
        "--output",
        out.to_str().unwrap(),
        "--no-format",
    ])
    .unwrap();
    let Commands::Generate(cmd) = cli.command else {
        panic!("expected generate");
    };
    cmd.execute().unwrap();

    let crud = fs::read_to_string(out.join("src/models/orders/crud.rs")).unwrap();
    assert!(crud.contains("pub struct Orders {"));
    assert!(crud.contains("pub archived: bool,"));
    assert!(crud.contains("STATUS_VALUES"));
    assert!(out.join("src/utils.rs").is_file());
    let models = fs::read_to_string(out.join("src/models/mod.rs")).unwrap();
    assert!(models.contains("pub mod orders;"));
}

#[test]
fn test_generate_unknown_table_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("schema.json");
    fs::write(&snapshot, SNAPSHOT).unwrap();

    let cli = parse(&[
        "generate",
        "--config",
        dir.path().join("absent.toml").to_str().unwrap(),
        "--snapshot",
        snapshot.to_str().unwrap(),
        "--table",
        "ghost",
        "--output",
        dir.path().join("out").to_str().unwrap(),
        "--no-format",
    ])
    .unwrap();
    let Commands::Generate(cmd) = cli.command else {
        panic!("expected generate");
    };

    let err = cmd.execute().unwrap_err();
    assert!(format!("{err:#}").contains("no columns found for table 'ghost'"));
}
