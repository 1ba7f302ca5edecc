use std::fs;

use postdown_cli::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_nested_output_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("blog").join("images").join("2024-01-05");
    assert!(!nested.exists());
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("blog"));

    let first = writer.write("2024-01-05-post.md", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "2024-01-05-post.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("2024-01-05-post.md", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn binary_content_is_written_verbatim() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let bytes = [0x00, 0x66, 0x74, 0x79, 0x70, 0xff];
    let path = writer.write_bytes("cover.avif", &bytes).unwrap();
    assert_eq!(fs::read(path).unwrap(), bytes);
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("doc.md", "data").is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}
