//! Walk tests: both strategies against real trees in a temp dir.

use files::engine::progress::OnReceived;
use files::pipeline::{PipelineHandles, finish_pipeline, run_pipeline};
use files::sink::{drain, write_paths};
use files::utils::config::{DEFAULT_IGNORE_PATTERN, RESULT_CHANNEL_CAP};
use files::{FilesError, FilesOpts, Opts, WalkStatus, list_dir, listing};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}

/// `root/{.git/x, src/main.go, src/README, docs/a.md}`
fn scenario_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in [".git/x", "src/main.go", "src/README", "docs/a.md"] {
        touch(dir.path(), rel);
    }
    dir
}

/// A wider tree with nested ignored and hidden directories.
fn deep_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in [
        "a/b/c/d/deep.go",
        "a/b/c/d/deep.txt",
        "a/.git/objects/aa/bb",
        "a/b/.hg/store/data",
        "a/b/_darcs/patches/p1",
        "vendor/cache/blob.go",
        "vendor/lib/lib.go",
        ".config/settings.toml",
        "a/b/.hidden.go",
        "top.go",
        "README",
    ] {
        touch(dir.path(), rel);
    }
    for i in 0..30 {
        touch(dir.path(), &format!("wide/d{i}/f{i}.txt"));
    }
    dir
}

fn opts() -> FilesOpts {
    FilesOpts {
        ignore: Some(DEFAULT_IGNORE_PATTERN.to_string()),
        ..Default::default()
    }
}

/// Paths relative to `root` (strips the presenter's prefix).
fn rel_set(root: &Path, paths: &[PathBuf]) -> BTreeSet<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap_or(p).to_string_lossy().into_owned())
        .collect()
}

fn run(root: &Path, opts: &FilesOpts) -> (Vec<PathBuf>, WalkStatus) {
    let listing = list_dir(root, opts, None::<fn(&Path)>).unwrap();
    (listing.paths, listing.status)
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// --- scenario ---

#[test]
fn test_scenario_default() {
    let dir = scenario_tree();
    for parallel in [false, true] {
        let (paths, status) = run(dir.path(), &FilesOpts { parallel, ..opts() });
        assert_eq!(status, WalkStatus::Completed);
        assert_eq!(
            rel_set(dir.path(), &paths),
            set(&["src/main.go", "src/README", "docs/a.md"])
        );
    }
}

#[test]
fn test_scenario_match() {
    let dir = scenario_tree();
    for parallel in [false, true] {
        let o = FilesOpts {
            parallel,
            match_pattern: Some(r"\.go$".to_string()),
            ..opts()
        };
        let (paths, _) = run(dir.path(), &o);
        assert_eq!(rel_set(dir.path(), &paths), set(&["src/main.go"]));
    }
}

#[test]
fn test_scenario_directory_only() {
    let dir = scenario_tree();
    for parallel in [false, true] {
        let o = FilesOpts {
            parallel,
            directory_only: true,
            ..opts()
        };
        let (paths, _) = run(dir.path(), &o);
        assert_eq!(rel_set(dir.path(), &paths), set(&["src", "docs"]));
    }
}

// --- pruning ---

#[test]
fn test_nothing_below_ignored_directories() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let (paths, _) = run(dir.path(), &FilesOpts { parallel, ..opts() });
        let rels = rel_set(dir.path(), &paths);
        for p in &rels {
            assert!(
                !p.split('/').any(|c| matches!(c, ".git" | ".hg" | "_darcs")),
                "{p} is under an ignored directory"
            );
        }
        assert!(rels.contains("a/b/c/d/deep.go"));
    }
}

#[test]
fn test_hidden_subtrees_pruned_by_default() {
    let dir = deep_tree();
    let (paths, _) = run(dir.path(), &opts());
    let rels = rel_set(dir.path(), &paths);
    assert!(!rels.contains(".config/settings.toml"));
    assert!(!rels.contains("a/b/.hidden.go"));
}

#[test]
fn test_hidden_off_lists_dot_entries_but_still_ignores_vcs() {
    let dir = deep_tree();
    let (paths, _) = run(dir.path(), &FilesOpts { hidden: false, ..opts() });
    let rels = rel_set(dir.path(), &paths);
    assert!(rels.contains(".config/settings.toml"));
    assert!(rels.contains("a/b/.hidden.go"));
    assert!(!rels.iter().any(|p| p.contains(".git/")));
}

#[test]
fn test_ignore_by_relative_path_prunes_only_that_directory() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let o = FilesOpts {
            parallel,
            ignore: Some("^vendor/cache$".to_string()),
            ..opts()
        };
        let (paths, _) = run(dir.path(), &o);
        let rels = rel_set(dir.path(), &paths);
        assert!(!rels.contains("vendor/cache/blob.go"));
        assert!(rels.contains("vendor/lib/lib.go"));
        // Custom pattern replaces the default.
        assert!(rels.contains("a/b/_darcs/patches/p1"));
    }
}

#[test]
fn test_ignore_applies_to_files_too() {
    let dir = deep_tree();
    let o = FilesOpts {
        ignore: Some(r"\.txt$".to_string()),
        ..opts()
    };
    let (paths, _) = run(dir.path(), &o);
    assert!(!paths.iter().any(|p| p.to_string_lossy().ends_with(".txt")));
    assert!(paths.iter().any(|p| p.ends_with("deep.go")));
}

// --- strategies ---

#[test]
fn test_sequential_and_concurrent_emit_same_set() {
    let dir = deep_tree();
    for directory_only in [false, true] {
        let (seq, _) = run(dir.path(), &FilesOpts { directory_only, ..opts() });
        let (par, _) = run(
            dir.path(),
            &FilesOpts {
                directory_only,
                parallel: true,
                num_threads: Some(4),
                ..opts()
            },
        );
        assert_eq!(seq.len(), par.len());
        assert_eq!(rel_set(dir.path(), &seq), rel_set(dir.path(), &par));
    }
}

#[test]
fn test_sorted_is_bytewise_permutation_of_streaming() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let (streamed, _) = run(dir.path(), &FilesOpts { parallel, ..opts() });
        let (sorted, _) = run(
            dir.path(),
            &FilesOpts {
                parallel,
                sort: true,
                ..opts()
            },
        );
        let mut expected = streamed.clone();
        expected.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        assert_eq!(sorted, expected);
        assert!(
            sorted
                .windows(2)
                .all(|w| w[0].as_os_str().as_encoded_bytes() <= w[1].as_os_str().as_encoded_bytes())
        );
    }
}

#[test]
fn test_match_still_explores_non_matching_directories() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let o = FilesOpts {
            parallel,
            match_pattern: Some(r"\.go$".to_string()),
            ..opts()
        };
        let (paths, _) = run(dir.path(), &o);
        let rels = rel_set(dir.path(), &paths);
        assert!(rels.iter().all(|p| p.ends_with(".go")));
        assert!(rels.contains("a/b/c/d/deep.go"));
        assert!(rels.contains("vendor/cache/blob.go"));
        assert!(rels.contains("top.go"));
    }
}

#[test]
fn test_directory_only_emits_only_directories() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let o = FilesOpts {
            parallel,
            directory_only: true,
            ..opts()
        };
        let (paths, _) = run(dir.path(), &o);
        assert!(!paths.is_empty());
        for rel in rel_set(dir.path(), &paths) {
            assert!(dir.path().join(&rel).is_dir(), "{rel} is not a directory");
        }
    }
}

// --- ceiling ---

#[test]
fn test_max_results_sequential_is_exact() {
    let dir = deep_tree();
    let o = FilesOpts {
        max_results: Some(5),
        ..opts()
    };
    let (paths, status) = run(dir.path(), &o);
    assert_eq!(paths.len(), 5);
    assert_eq!(status, WalkStatus::Overflow);
    assert!(status.is_success());
    assert_eq!(status.exit_code(), 0);
}

#[test]
fn test_max_results_concurrent_is_roughly_bounded() {
    let dir = deep_tree();
    let o = FilesOpts {
        max_results: Some(5),
        parallel: true,
        num_threads: Some(4),
        ..opts()
    };
    let (paths, status) = run(dir.path(), &o);
    // Best-effort ceiling: allow one extra per worker.
    assert!((1..=5 + 4).contains(&paths.len()), "{} results", paths.len());
    assert_eq!(status, WalkStatus::Overflow);
}

#[test]
fn test_max_results_above_total_completes() {
    let dir = scenario_tree();
    let o = FilesOpts {
        max_results: Some(3),
        ..opts()
    };
    let (paths, status) = run(dir.path(), &o);
    assert_eq!(paths.len(), 3);
    assert_eq!(status, WalkStatus::Completed);
}

// --- cancellation / disconnect / errors ---

#[test]
fn test_cancelled_walk_closes_channel_and_reports_interrupted() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let o = Opts {
            parallel,
            ..Opts::from(&opts())
        };
        let cancel = Arc::new(AtomicBool::new(true));
        let (paths, status) = listing::list_dir_with_opts(dir.path(), &o, cancel).unwrap();
        assert!(paths.is_empty());
        assert_eq!(status, WalkStatus::Interrupted);
        assert!(!status.is_success());
        assert_eq!(status.exit_code(), 130);
    }
}

#[test]
fn test_cancel_mid_walk_closes_channel_and_stops_emitting() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..400 {
        touch(dir.path(), &format!("d{}/f{i}.txt", i % 20));
    }
    let threads = 4;
    for parallel in [false, true] {
        let o = Opts {
            parallel,
            num_threads: Some(threads),
            ..Opts::from(&opts())
        };
        let cancel = Arc::new(AtomicBool::new(false));
        let PipelineHandles {
            result_rx,
            walk_handle,
            ctx,
        } = run_pipeline(dir.path(), &o, Arc::clone(&cancel)).unwrap();

        for _ in 0..3 {
            result_rx.recv().unwrap();
        }
        // Give the walk time to fill the channel and block on send.
        thread::sleep(Duration::from_millis(50));
        cancel.store(true, Ordering::Relaxed);

        // Terminates only once the walk has dropped its sender.
        let after = result_rx.iter().count();
        let status = finish_pipeline(walk_handle, &ctx).unwrap();
        assert_eq!(status, WalkStatus::Interrupted);
        // What was queued, plus at most one in-flight send per producer.
        assert!(
            after <= RESULT_CHANNEL_CAP + threads + 1,
            "{after} results after cancel"
        );
        assert!(3 + after < 400);
    }
}

#[test]
fn test_dropped_receiver_stops_walk() {
    let dir = deep_tree();
    for parallel in [false, true] {
        let o = Opts {
            parallel,
            ..Opts::from(&opts())
        };
        let PipelineHandles {
            result_rx,
            walk_handle,
            ctx,
        } = run_pipeline(dir.path(), &o, Arc::new(AtomicBool::new(false))).unwrap();
        drop(result_rx);
        let status = finish_pipeline(walk_handle, &ctx).unwrap();
        assert_eq!(status, WalkStatus::Disconnected);
    }
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = list_dir(&dir.path().join("missing"), &opts(), None::<fn(&Path)>).unwrap_err();
    let files_err = err.downcast_ref::<FilesError>().unwrap();
    assert_eq!(files_err.exit_code(), 1);
}

#[test]
fn test_bad_pattern_is_fatal_before_walking() {
    let dir = scenario_tree();
    let o = FilesOpts {
        match_pattern: Some("(".to_string()),
        ..opts()
    };
    let err = list_dir(dir.path(), &o, None::<fn(&Path)>).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FilesError>(),
        Some(FilesError::InvalidPattern { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_root_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    // Root reads everything; nothing to test.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    touch(dir.path(), "locked/a.go");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    for parallel in [false, true] {
        let res = list_dir(&locked, &FilesOpts { parallel, ..opts() }, None::<fn(&Path)>);
        let err = res.unwrap_err();
        let files_err = err.downcast_ref::<FilesError>().unwrap();
        assert!(matches!(files_err, FilesError::Root { .. }));
        assert_eq!(files_err.exit_code(), 1);
    }
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    // Root reads everything; nothing to test.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }
    let dir = scenario_tree();
    touch(dir.path(), "locked/secret.go");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    for parallel in [false, true] {
        let (paths, status) = run(dir.path(), &FilesOpts { parallel, ..opts() });
        assert_eq!(status, WalkStatus::Completed);
        assert_eq!(
            rel_set(dir.path(), &paths),
            set(&["src/main.go", "src/README", "docs/a.md"])
        );
    }
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_listed_not_entered() {
    let dir = scenario_tree();
    std::os::unix::fs::symlink(dir.path().join("src"), dir.path().join("link")).unwrap();
    for parallel in [false, true] {
        let (paths, _) = run(dir.path(), &FilesOpts { parallel, ..opts() });
        let rels = rel_set(dir.path(), &paths);
        assert!(rels.contains("link"));
        assert!(!rels.contains("link/main.go"));
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_round_trip() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = scenario_tree();
    let name = OsStr::from_bytes(b"bad\xffname.txt");
    fs::write(dir.path().join("src").join(name), b"x").unwrap();
    let txt = FilesOpts {
        match_pattern: Some(r"\.txt$".to_string()),
        ..opts()
    };

    for parallel in [false, true] {
        for absolute in [false, true] {
            let (paths, _) = run(
                dir.path(),
                &FilesOpts {
                    parallel,
                    absolute,
                    ..txt.clone()
                },
            );
            assert_eq!(paths.len(), 1);
            assert_eq!(paths[0].file_name(), Some(name));
            assert!(paths[0].exists(), "{}", paths[0].display());
        }
    }

    let mut out = Vec::new();
    listing::list_dir_to_writer(
        dir.path(),
        &Opts::from(&txt),
        Arc::new(AtomicBool::new(false)),
        &mut out,
    )
    .unwrap();
    let expected = [dir.path().as_os_str().as_bytes(), &b"/src/bad\xffname.txt\n"[..]].concat();
    assert_eq!(out, expected);
}

// --- sink ---

#[test]
fn test_callback_receives_every_path() {
    let dir = scenario_tree();
    let mut seen = Vec::new();
    let listing = list_dir(dir.path(), &opts(), Some(|p: &Path| seen.push(p.to_path_buf()))).unwrap();
    assert!(listing.paths.is_empty());
    assert_eq!(listing.status, WalkStatus::Completed);
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_absolute_output() {
    let dir = scenario_tree();
    let (paths, _) = run(dir.path(), &FilesOpts { absolute: true, ..opts() });
    for p in &paths {
        assert!(p.is_absolute(), "{}", p.display());
        assert!(p.exists(), "{}", p.display());
    }
}

#[test]
fn test_drain_sorted_and_streaming() {
    let (tx, rx) = crossbeam_channel::unbounded::<OsString>();
    for p in ["b/x", "a/z", "B", "a/y"] {
        tx.send(OsString::from(p)).unwrap();
    }
    drop(tx);
    let sorted: Vec<OsString> = drain(rx, true, None).collect();
    assert_eq!(sorted, vec!["B", "a/y", "a/z", "b/x"]);

    let (tx, rx) = crossbeam_channel::unbounded::<OsString>();
    for p in ["b/x", "a/z"] {
        tx.send(OsString::from(p)).unwrap();
    }
    drop(tx);
    let streamed: Vec<OsString> = drain(rx, false, None).collect();
    assert_eq!(streamed, vec!["b/x", "a/z"]);
}

#[test]
fn test_drain_reports_progress_for_every_item() {
    use std::sync::atomic::AtomicUsize;

    let (tx, rx) = crossbeam_channel::unbounded::<OsString>();
    for i in 0..250 {
        tx.send(OsString::from(format!("f{i}"))).unwrap();
    }
    drop(tx);
    let counted = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counted);
    let cb: OnReceived = Box::new(move |n: usize| {
        c.fetch_add(n, Ordering::Relaxed);
    });
    assert_eq!(drain(rx, false, Some(cb)).count(), 250);
    assert_eq!(counted.load(Ordering::Relaxed), 250);
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_is_output_error() {
    let presenter = files::present::Presenter::new(Path::new("."), false).unwrap();
    let err = write_paths(vec![OsString::from("a")], &presenter, &mut ClosedPipe).unwrap_err();
    assert!(matches!(err, FilesError::Output(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_write_paths_one_line_each() {
    let presenter = files::present::Presenter::new(Path::new("proj"), false).unwrap();
    let mut out = Vec::new();
    let n = write_paths(
        vec![OsString::from("src/main.go"), OsString::from("docs/a.md")],
        &presenter,
        &mut out,
    )
    .unwrap();
    assert_eq!(n, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "proj/src/main.go\nproj/docs/a.md\n");
}

#[test]
fn test_writer_failure_winds_down_walk() {
    let dir = deep_tree();
    let o = Opts::from(&opts());
    let err = listing::list_dir_to_writer(
        dir.path(),
        &o,
        Arc::new(AtomicBool::new(false)),
        &mut ClosedPipe,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FilesError>(),
        Some(FilesError::Output(_))
    ));
}
