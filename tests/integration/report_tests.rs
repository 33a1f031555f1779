use clap::Parser;
use filedupes::cli::Cli;
use filedupes::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(root: &Path, out: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "filedupes".to_string(),
        "-q".to_string(),
        "-s".to_string(),
        "0".to_string(),
        "-d".to_string(),
        root.display().to_string(),
        "-f".to_string(),
        out.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

fn populate(root: &Path) {
    fs::write(root.join("one.bin"), b"first duplicate payload").unwrap();
    fs::write(root.join("two.bin"), b"first duplicate payload").unwrap();
    fs::write(root.join("solo.bin"), b"no partner here").unwrap();
}

#[test]
fn test_csv_report() {
    let tree = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    populate(tree.path());
    let out = out_dir.path().join("dupes.csv");

    filedupes::run_app(cli(tree.path(), &out, &["--format", "csv"])).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "size,signature,identity,path");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("23,"));
    assert!(lines[1].ends_with("one.bin"));
    assert!(lines[2].ends_with("two.bin"));
}

#[test]
fn test_json_report() {
    let tree = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    populate(tree.path());
    let out = out_dir.path().join("dupes.json");

    filedupes::run_app(cli(tree.path(), &out, &["--format", "json"])).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let sets = parsed["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0]["size"], 23);
    assert_eq!(sets[0]["genuine"], true);
    assert_eq!(sets[0]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["summary"]["total_files"], 3);
    assert_eq!(parsed["summary"]["duplicate_sets"], 1);
    assert_eq!(parsed["summary"]["reclaimable_space"], 23);
}

#[test]
fn test_empty_report_still_written() {
    let tree = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let out = out_dir.path().join("dupes.out");

    let code = filedupes::run_app(cli(tree.path(), &out, &[])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(out.exists());
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[test]
fn test_unwritable_report_is_output_error() {
    let tree = tempdir().unwrap();
    populate(tree.path());
    let out = tree.path().join("no_such_dir").join("dupes.out");

    let err = filedupes::run_app(cli(tree.path(), &out, &[])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::OutputError);
    assert!(format!("{err:#}").contains("no_such_dir"));
}

#[test]
fn test_missing_root_is_config_error() {
    let out_dir = tempdir().unwrap();
    let missing = out_dir.path().join("does_not_exist");
    let out = out_dir.path().join("dupes.out");

    let err = filedupes::run_app(cli(&missing, &out, &[])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
    assert!(!out.exists());
}

#[test]
fn test_root_is_file_is_config_error() {
    let tree = tempdir().unwrap();
    let file = tree.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();
    let out = tree.path().join("dupes.out");

    let err = filedupes::run_app(cli(&file, &out, &[])).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
}

#[cfg(unix)]
#[test]
fn test_unreadable_root_is_config_error() {
    use std::os::unix::fs::PermissionsExt;

    let tree = tempdir().unwrap();
    let root = tree.path().join("sealed_root");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("inside.bin"), b"never listed").unwrap();
    fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();
    let out = tree.path().join("dupes.out");

    let enforced = fs::read_dir(&root).is_err();
    let result = filedupes::run_app(cli(&root, &out, &[]));
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    if !enforced {
        // Permission bits are not enforced for this user
        return;
    }
    let err = result.unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
    assert!(!out.exists());
}
