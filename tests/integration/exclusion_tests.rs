use filedupes::duplicates::{DuplicateFinder, FinderConfig};
use filedupes::scanner::{WalkerConfig, DEFAULT_EXCLUDE};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan(root: &Path, excludes: &[&str]) -> Vec<String> {
    let walker_config = WalkerConfig::new(0, excludes.iter().map(|s| s.to_string()).collect(), false);
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (sets, _) = finder.find_duplicates(root).unwrap();
    sets.iter()
        .flat_map(|s| s.entries.iter())
        .map(|e| e.path.strip_prefix(root).unwrap().display().to_string())
        .collect()
}

#[test]
fn test_excluded_name_pruned_at_any_depth() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "keep/a.bin", b"shared content");
    write_file(dir.path(), "keep/b.bin", b"shared content");
    write_file(dir.path(), "node_modules/c.bin", b"shared content");
    write_file(dir.path(), "deep/er/node_modules/d.bin", b"shared content");
    write_file(dir.path(), "deep/er/node_modules/inner/e.bin", b"shared content");

    let paths = scan(dir.path(), &["node_modules"]);

    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| !p.contains("node_modules")));
}

#[test]
fn test_default_exclusion_always_applies() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"time machine");
    write_file(dir.path(), &format!("{DEFAULT_EXCLUDE}/b.bin"), b"time machine");

    // Extra exclusions are added, the built-in one stays
    assert!(scan(dir.path(), &["other"]).is_empty());
    assert!(scan(dir.path(), &[]).is_empty());
}

#[test]
fn test_exclusion_matches_names_not_paths() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "photos/a.bin", b"payload");
    write_file(dir.path(), "photos_old/b.bin", b"payload");

    // A partial name does not match
    assert_eq!(scan(dir.path(), &["photo"]).len(), 2);
    // A path is not a name
    assert_eq!(scan(dir.path(), &["photos/a.bin"]).len(), 2);
}

#[test]
fn test_excluded_file_name_is_not_pruned() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "cache", b"same bytes");
    write_file(dir.path(), "sub/cache", b"same bytes");

    // Exclusion applies to directories only
    assert_eq!(scan(dir.path(), &["cache"]).len(), 2);
}

#[test]
fn test_root_named_like_exclusion_is_scanned() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("node_modules");
    write_file(&root, "a.bin", b"root content");
    write_file(&root, "b.bin", b"root content");

    assert_eq!(scan(&root, &["node_modules"]).len(), 2);
}
