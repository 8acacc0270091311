use cadc_core::{
    ArchiveCryptoEngine, CadcError, Config, Event, Exponent, FsRecordStore, Job, ParameterRecord,
    Phase, TaskRunner, codec,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

fn record() -> ParameterRecord {
    ParameterRecord::new("12345.6789", "0.001", 50, 20).unwrap()
}

fn engine() -> ArchiveCryptoEngine {
    ArchiveCryptoEngine::new(Config::default())
}

fn exp(s: &str) -> Exponent {
    s.parse().unwrap()
}

/// Relative path -> contents for every file below `root`.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().into_owned();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

fn sample_tree(parent: &Path) -> std::path::PathBuf {
    let root = parent.join("project");
    fs::create_dir_all(root.join("src/deep")).unwrap();
    fs::write(root.join("readme.md"), b"# project\n").unwrap();
    fs::write(root.join("src/main.txt"), vec![7u8; 70_000]).unwrap();
    fs::write(root.join("src/deep/notes.txt"), b"nested").unwrap();
    root
}

#[test]
fn directory_roundtrip_restores_identical_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let root = sample_tree(tmp.path());
    let before = snapshot(&root);

    let mut events = Vec::new();
    let report = engine()
        .encrypt(&root, &record(), Some(exp("123.45678")), &mut events)
        .unwrap();
    assert_eq!(report.entries, 3);
    assert_eq!(
        report.archive.file_name().unwrap().to_string_lossy(),
        engine().archive_name(&exp("123.45678"))
    );
    assert!(events.contains(&Event::Phase(Phase::Encrypting)));

    let out = tmp.path().join("restore");
    fs::create_dir(&out).unwrap();
    let moved = out.join(report.archive.file_name().unwrap());
    fs::rename(&report.archive, &moved).unwrap();

    let mut events = Vec::new();
    let decrypted = engine().decrypt(&moved, &record(), &mut events).unwrap();
    assert!(decrypted.created_dir);
    assert_eq!(decrypted.exponent, exp("123.45678"));
    let stem = moved.file_stem().unwrap().to_string_lossy();
    assert_eq!(
        decrypted.target.file_name().unwrap().to_string_lossy(),
        format!("CADC_{stem}")
    );
    assert_eq!(snapshot(&decrypted.target.join("project")), before);

    let progress: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Progress { processed, total } => Some((*processed, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, [(1, 3), (2, 3), (3, 3)]);
    assert_eq!(events.last(), Some(&Event::Phase(Phase::Done)));
}

#[test]
fn wrong_parameters_do_not_open_the_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let root = sample_tree(tmp.path());
    let report = engine()
        .encrypt(&root, &record(), Some(exp("55.5")), &mut Vec::new())
        .unwrap();

    for wrong in [
        ParameterRecord::new("12345.6788", "0.001", 50, 20).unwrap(),
        ParameterRecord::new("12345.6789", "0.002", 50, 20).unwrap(),
    ] {
        let mut events = Vec::new();
        let err = engine()
            .decrypt(&report.archive, &wrong, &mut events)
            .unwrap_err();
        assert!(matches!(err, CadcError::Crypto(_)), "{err:?}");
        assert_eq!(events.last(), Some(&Event::Phase(Phase::Failed)));
    }
    // nothing was extracted
    let entries: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries.len(), 2);
}

#[test]
fn single_file_lands_next_to_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("letter.txt");
    fs::write(&src, b"dear reader").unwrap();
    let report = engine()
        .encrypt(&src, &record(), None, &mut Vec::new())
        .unwrap();
    assert_eq!(report.entries, 1);

    fs::remove_file(&src).unwrap();
    let decrypted = engine()
        .decrypt(&report.archive, &record(), &mut Vec::new())
        .unwrap();
    assert!(!decrypted.created_dir);
    assert_eq!(fs::read(&src).unwrap(), b"dear reader");
}

#[test]
fn empty_directories_survive() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("shell");
    fs::create_dir_all(root.join("a/empty")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("b/file"), b"x").unwrap();

    let report = engine()
        .encrypt(&root, &record(), Some(exp("9.00001")), &mut Vec::new())
        .unwrap();
    let decrypted = engine()
        .decrypt(&report.archive, &record(), &mut Vec::new())
        .unwrap();
    assert!(decrypted.target.join("shell/a/empty").is_dir());
    assert_eq!(
        fs::read(decrypted.target.join("shell/b/file")).unwrap(),
        b"x"
    );
}

#[test]
fn second_extraction_gets_numbered_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let root = sample_tree(tmp.path());
    let report = engine()
        .encrypt(&root, &record(), Some(exp("300")), &mut Vec::new())
        .unwrap();

    let first = engine()
        .decrypt(&report.archive, &record(), &mut Vec::new())
        .unwrap();
    let second = engine()
        .decrypt(&report.archive, &record(), &mut Vec::new())
        .unwrap();
    assert_ne!(first.target, second.target);
    let first_name = first.target.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        second.target.file_name().unwrap().to_string_lossy(),
        format!("{first_name}_1")
    );
}

#[test]
fn foreign_archive_names_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["plain.zip", "????.cp"] {
        let path = tmp.path().join(name);
        fs::write(&path, b"whatever").unwrap();
        let err = engine()
            .decrypt(&path, &record(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, CadcError::Format(_)), "{name}: {err:?}");
    }
    let err = engine()
        .decrypt(&tmp.path().join("absent.cp"), &record(), &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, CadcError::NotFound(_)));
}

#[test]
fn huge_exponent_in_name_fails_without_exhausting_memory() {
    let tmp = tempfile::tempdir().unwrap();
    // decodes to exponent 1000000000000.00000
    let name = format!("{}.cp", codec().encode("100000000000000000"));
    let path = tmp.path().join(name);
    fs::write(&path, b"not an archive").unwrap();

    let mut events = Vec::new();
    let err = engine()
        .decrypt(&path, &record(), &mut events)
        .unwrap_err();
    assert!(matches!(err, CadcError::Crypto(_)), "{err:?}");
    assert_eq!(events.last(), Some(&Event::Phase(Phase::Failed)));
}

#[test]
fn existing_archive_is_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("v.txt");
    fs::write(&src, b"version one").unwrap();
    let first = engine()
        .encrypt(&src, &record(), Some(exp("42")), &mut Vec::new())
        .unwrap();
    fs::write(&src, b"version two").unwrap();
    let second = engine()
        .encrypt(&src, &record(), Some(exp("42")), &mut Vec::new())
        .unwrap();
    assert_eq!(first.archive, second.archive);

    fs::remove_file(&src).unwrap();
    engine()
        .decrypt(&second.archive, &record(), &mut Vec::new())
        .unwrap();
    assert_eq!(fs::read(&src).unwrap(), b"version two");
}

#[tokio::test]
async fn task_runner_streams_events_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_root(tmp.path());
    let store = FsRecordStore::new(&config);
    store.create("main", &record()).unwrap();
    let root = sample_tree(tmp.path());
    let runner = TaskRunner::new(Arc::new(ArchiveCryptoEngine::new(config)), Arc::new(store));

    let mut handle = runner.spawn(Job::Encrypt {
        source: root,
        record: "main".into(),
        exponent: Some(exp("77.77777")),
    });
    let mut events = Vec::new();
    while let Some(e) = handle.recv().await {
        events.push(e);
    }
    let phases: Vec<Phase> = events
        .iter()
        .filter_map(|e| match e {
            Event::Phase(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(phases, [Phase::Preparing, Phase::Encrypting, Phase::Done]);
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    match events.last() {
        Some(Event::Finished { success, message }) => {
            assert!(*success, "{message}");
        }
        other => panic!("unexpected last event {other:?}"),
    }
    let outcome = handle.finish().await;
    assert!(outcome.success);
}
