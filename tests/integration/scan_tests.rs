use filedupes::duplicates::{DuplicateFinder, FinderConfig};
use filedupes::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn finder_with_min_size(min_size: u64) -> DuplicateFinder {
    DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_min_size(min_size)),
    )
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_sets, 0);
    assert_eq!(summary.directories_visited, 1);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"content a");
    write_file(dir.path(), "b.txt", b"content b");
    write_file(dir.path(), "c.txt", b"content cc");

    let (sets, summary) = finder_with_min_size(0).find_duplicates(dir.path()).unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.eliminated_by_size, 1);
    assert_eq!(summary.eliminated_by_partial, 2);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"duplicate");
    write_file(dir.path(), "b.txt", b"duplicate");
    write_file(dir.path(), "c.txt", b"unique");

    let (sets, summary) = finder_with_min_size(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert_eq!(sets[0].signature, *blake3::hash(b"duplicate").as_bytes());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_sets, 1);
    assert_eq!(summary.duplicate_entries, 2);
    assert_eq!(summary.reclaimable_space, 9);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"nested duplicate");
    write_file(dir.path(), "one/b.txt", b"nested duplicate");
    write_file(dir.path(), "one/two/three/c.txt", b"nested duplicate");

    let (sets, summary) = finder_with_min_size(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 3);
    assert_eq!(summary.directories_visited, 4);
    assert_eq!(summary.reclaimable_space, 2 * 16);
}

#[test]
fn test_threshold_is_strict() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "at1.bin", &[1u8; 100]);
    write_file(dir.path(), "at2.bin", &[1u8; 100]);
    write_file(dir.path(), "above1.bin", &[2u8; 101]);
    write_file(dir.path(), "above2.bin", &[2u8; 101]);

    let (sets, summary) = finder_with_min_size(100).find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(sets.len(), 1);
    assert!(sets[0].entries.iter().all(|e| e.size == 101));
}

#[test]
fn test_same_prefix_different_tail() {
    let dir = tempdir().unwrap();
    let mut a = vec![0x5a; 200_000];
    let mut b = a.clone();
    a[199_999] = 1;
    b[199_999] = 2;
    write_file(dir.path(), "a.bin", &a);
    write_file(dir.path(), "b.bin", &b);

    let (sets, summary) = finder_with_min_size(0).find_duplicates(dir.path()).unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.eliminated_by_partial, 0);
    assert_eq!(summary.duplicate_sets, 0);
}

#[test]
fn test_scan_is_deterministic() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write_file(dir.path(), &format!("x/{i}.bin"), b"group one content");
        write_file(dir.path(), &format!("y/{i}.bin"), b"group two content!");
    }
    write_file(dir.path(), "z/solo.bin", b"something else entirely");

    let finder = finder_with_min_size(0);
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_every_size_group_member_confirmed() {
    let dir = tempdir().unwrap();
    // Three distinct contents of the same size, each duplicated
    for (tag, byte) in [("a", b'a'), ("b", b'b'), ("c", b'c')] {
        write_file(dir.path(), &format!("{tag}1"), &[byte; 64]);
        write_file(dir.path(), &format!("{tag}2"), &[byte; 64]);
    }

    let (sets, summary) = finder_with_min_size(0).find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 3);
    assert!(sets.iter().all(|s| s.len() == 2));
    assert_eq!(summary.duplicate_sets, 3);
    assert_eq!(summary.reclaimable_space, 3 * 64);
}
