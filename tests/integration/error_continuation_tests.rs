use filedupes::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use filedupes::scanner::{FileDescriptor, HashError, ScanError, WalkerConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    // Use files that don't exist to trigger hashing errors
    let file1 = FileDescriptor::new(PathBuf::from("nonexistent_1.txt"), 100, None);
    let file2 = FileDescriptor::new(PathBuf::from("nonexistent_2.txt"), 100, None);

    let (sets, summary) = finder.find_duplicates_from_files(vec![file1, file2]);

    assert!(sets.is_empty());
    // Both failures are recorded during the partial phase
    assert_eq!(summary.scan_errors.len(), 2);

    for err in &summary.scan_errors {
        match err {
            ScanError::Hash(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_missing_file_does_not_hide_real_duplicates() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    fs::write(&a, vec![3u8; 100]).unwrap();
    fs::write(&b, vec![3u8; 100]).unwrap();

    let files = vec![
        FileDescriptor::new(a, 100, None),
        FileDescriptor::new(b, 100, None),
        FileDescriptor::new(dir.path().join("vanished.bin"), 100, None),
    ];
    let (sets, summary) = DuplicateFinder::with_defaults().find_duplicates_from_files(files);

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(summary.scan_errors[0].to_string().contains("vanished.bin"));
}

#[test]
fn test_missing_root_is_rejected() {
    let dir = tempdir().unwrap();
    let result = DuplicateFinder::with_defaults().find_duplicates(&dir.path().join("gone"));
    assert!(matches!(result, Err(FinderError::PathNotFound(_))));
}

#[test]
fn test_file_root_is_rejected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();
    let result = DuplicateFinder::with_defaults().find_duplicates(&file);
    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), b"readable twin content").unwrap();
    fs::write(dir.path().join("b.bin"), b"readable twin content").unwrap();
    let locked = dir.path().join("locked.bin");
    fs::write(&locked, b"readable twin content").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&locked).is_ok() {
        // Running with privileges that bypass permission bits
        return;
    }

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_min_size(0)),
    );
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert_eq!(summary.total_files, 3);
    assert!(summary
        .scan_errors
        .iter()
        .any(|e| matches!(e, ScanError::Hash(HashError::PermissionDenied(_)))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), b"outside twin").unwrap();
    fs::write(dir.path().join("b.bin"), b"outside twin").unwrap();
    let sealed = dir.path().join("sealed");
    fs::create_dir(&sealed).unwrap();
    fs::write(sealed.join("c.bin"), b"outside twin").unwrap();
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&sealed).is_ok() {
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_min_size(0)),
    );
    let result = finder.find_duplicates(dir.path());

    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();

    let (sets, summary) = result.unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(matches!(
        &summary.scan_errors[0],
        ScanError::PermissionDenied(p) if p == &sealed
    ));
}
