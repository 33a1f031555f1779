use clap::Parser;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use filedupes::cli::Cli;
use filedupes::config::{Config, ConfigError, ENV_PREFIX};
use filedupes::duplicates::HardlinkPolicy;
use filedupes::error::ExitCode;
use filedupes::report::ReportFormat;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

// Environment variables are process-wide
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.min_size, 250_000);
    assert_eq!(config.output, PathBuf::from("dupes.out"));
    assert_eq!(config.io_threads, 4);
}

#[test]
fn test_config_load_from_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    // Only thread count is set here: other tests run scans concurrently
    std::env::set_var("FILEDUPES_IO_THREADS", "16");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX));
    let result = figment.extract::<Config>();

    std::env::remove_var("FILEDUPES_IO_THREADS");

    let config = result.unwrap();
    assert_eq!(config.io_threads, 16);
    assert_eq!(config.format, ReportFormat::Text);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
min_size = "2KB"
output = "report.json"
exclude = ["node_modules", ".git"]
format = "json"
hardlinks = "report"
"#,
    )
    .unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.min_size, 2000);
    assert_eq!(config.output, PathBuf::from("report.json"));
    assert_eq!(config.exclude, vec!["node_modules", ".git"]);
    assert_eq!(config.format, ReportFormat::Json);
    assert_eq!(config.hardlinks, HardlinkPolicy::Report);
}

#[test]
fn test_env_overrides_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = 2\ncross_mount_points = true\n").unwrap();

    std::env::set_var("FILEDUPES_IO_THREADS", "6");
    let result = Config::load(Some(&config_path));
    std::env::remove_var("FILEDUPES_IO_THREADS");

    let config = result.unwrap();
    assert_eq!(config.io_threads, 6);
    assert!(config.cross_mount_points);
}

#[test]
fn test_cli_overrides_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "min_size = 100\nformat = \"csv\"\nexclude = [\"a\"]\n").unwrap();

    let cli = Cli::try_parse_from([
        "filedupes",
        "--config",
        config_path.to_str().unwrap(),
        "-s",
        "5",
        "-e",
        "b",
    ])
    .unwrap();

    let config = Config::load(cli.config.as_deref()).unwrap().merge_cli(&cli);
    assert_eq!(config.min_size, 5);
    assert_eq!(config.format, ReportFormat::Csv);
    assert_eq!(config.exclude, vec!["a", "b"]);
}

#[test]
fn test_config_file_drives_scan() {
    let _guard = ENV_LOCK.lock().unwrap();
    let tree = tempdir().unwrap();
    fs::write(tree.path().join("a.dat"), b"payload shared by both").unwrap();
    fs::write(tree.path().join("b.dat"), b"payload shared by both").unwrap();

    let out_dir = tempdir().unwrap();
    let out = out_dir.path().join("dupes.csv");
    let config_path = out_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "min_size = 0\nformat = \"csv\"\noutput = {:?}\n",
            out.display().to_string()
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "filedupes",
        "-q",
        "--config",
        config_path.to_str().unwrap(),
        "-d",
        tree.path().to_str().unwrap(),
    ])
    .unwrap();
    filedupes::run_app(cli).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("size,signature,identity,path\n"));
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("absent.toml");

    assert!(matches!(
        Config::load(Some(&missing)),
        Err(ConfigError::NotFound(_))
    ));

    let cli = Cli::try_parse_from([
        "filedupes",
        "-q",
        "--config",
        missing.to_str().unwrap(),
        "-d",
        temp_dir.path().to_str().unwrap(),
    ])
    .unwrap();
    let err = filedupes::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);
}

#[test]
fn test_invalid_config_value_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "format = \"xml\"\n").unwrap();

    assert!(matches!(
        Config::load(Some(&config_path)),
        Err(ConfigError::Invalid(_))
    ));
}
