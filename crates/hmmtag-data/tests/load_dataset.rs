use std::fs::File;
use std::io::Write;
use std::path::Path;

use hmmtag_data::{DataError, Dataset, load_dataset, unzip_data, unzip_file};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const TRAIN: &str = r#"{"text": [["John", "lives", "in", "Rome"], ["Hi"]],
                       "NER": [["B-PER", "O", "O", "B-LOC"], ["O"]],
                       "index": [[0, 1, 2, 3], [4]]}"#;
const VAL: &str = r#"{"text": [["Mary", "left"]], "NER": [["B-PER", "O"]]}"#;
const TEST: &str = r#"{"text": [["Rome", "sleeps"]]}"#;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, body) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn student_zip(dir: &Path) -> std::path::PathBuf {
    let zip_path = dir.join("student_dataset.zip");
    write_zip(
        &zip_path,
        &[
            ("student_dataset/train.json", TRAIN),
            ("student_dataset/val.json", VAL),
            ("student_dataset/test.json", TEST),
        ],
    );
    zip_path
}

#[test]
fn loads_all_splits_from_wrapped_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let zip_path = student_zip(tmp.path());
    let dest = tmp.path().join("data");

    let dataset = load_dataset(&zip_path, &dest).unwrap();

    assert_eq!(dataset.train.len(), 2);
    assert_eq!(dataset.train.ner[0], vec!["B-PER", "O", "O", "B-LOC"]);
    assert_eq!(dataset.validation.text[0], vec!["Mary", "left"]);
    assert!(!dataset.test.is_labeled());

    // wrapper directory was flattened away
    assert!(dest.join("train.json").is_file());
    assert!(!dest.join("student_dataset").exists());
}

#[test]
fn unzip_data_replaces_existing_destination() {
    let tmp = tempfile::tempdir().unwrap();
    let zip_path = student_zip(tmp.path());
    let dest = tmp.path().join("data");

    std::fs::create_dir_all(&dest).unwrap();
    std::fs::write(dest.join("stale.txt"), "old").unwrap();

    unzip_data(&zip_path, &dest).unwrap();
    assert!(!dest.join("stale.txt").exists());
    assert!(dest.join("val.json").is_file());

    let dataset = Dataset::from_dir(&dest).unwrap();
    assert_eq!(dataset.validation.len(), 1);
}

#[test]
fn flat_archive_is_left_as_extracted() {
    let tmp = tempfile::tempdir().unwrap();
    let zip_path = tmp.path().join("flat.zip");
    write_zip(
        &zip_path,
        &[("train.json", TRAIN), ("val.json", VAL), ("test.json", TEST)],
    );
    let dest = tmp.path().join("out");

    assert!(unzip_file(&zip_path, &dest));
    let dataset = load_dataset(&zip_path, &dest).unwrap();
    assert_eq!(dataset.train.len(), 2);
}

#[test]
fn missing_split_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let zip_path = tmp.path().join("partial.zip");
    write_zip(&zip_path, &[("partial/train.json", TRAIN)]);

    let err = load_dataset(&zip_path, tmp.path().join("data")).unwrap_err();
    match err {
        DataError::Io { path, .. } => assert!(path.ends_with("val.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn misaligned_split_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let zip_path = tmp.path().join("bad.zip");
    let bad_train = r#"{"text": [["a", "b"]], "NER": [["O"]]}"#;
    write_zip(
        &zip_path,
        &[("bad/train.json", bad_train), ("bad/val.json", VAL), ("bad/test.json", TEST)],
    );

    let err = load_dataset(&zip_path, tmp.path().join("data")).unwrap_err();
    assert!(matches!(err, DataError::MalformedSplit(_)));
}
