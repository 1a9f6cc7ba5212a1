//! Integration tests for ffuntar-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use ffuntar_core::test_utils::TarTestBuilder;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;
use tempfile::TempDir;

fn ffuntar_cmd() -> Command {
    cargo_bin_cmd!("ffuntar")
}

/// Temp layout with an archive file, a reference tree and an output dir.
struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::create_dir(temp.path().join("reference")).unwrap();
        fs::create_dir(temp.path().join("output")).unwrap();
        Self { temp }
    }

    fn reference(&self) -> PathBuf {
        self.temp.path().join("reference")
    }

    fn output(&self) -> PathBuf {
        self.temp.path().join("output")
    }

    fn write_archive(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    fn write_reference(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.reference().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }
}

/// Archive under a `rootfs/` prefix, as produced by image builds.
fn update_archive() -> Vec<u8> {
    TarTestBuilder::new()
        .add_directory("rootfs/")
        .add_directory("rootfs/bin/")
        .add_file("rootfs/bin/tool", b"unchanged tool binary")
        .add_file("rootfs/bin/new", b"brand new file")
        .build()
}

fn traversal_archive() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut header = tar::Header::new_gnu();
    let name = b"../escape.txt";
    header.as_old_mut().name[..name.len()].copy_from_slice(name);
    header.set_size(1);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, &b"x"[..]).unwrap();

    let mut header = tar::Header::new_gnu();
    header.set_size(1);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "after.txt", &b"y"[..])
        .unwrap();

    builder.into_inner().unwrap()
}

#[test]
fn test_version_flag() {
    ffuntar_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffuntar"));
}

#[test]
fn test_help_flag() {
    ffuntar_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--reference-directory"))
        .stdout(predicate::str::contains("--strip-prefix"))
        .stdout(predicate::str::contains("FFUNTAR_LOG"));
}

#[test]
fn test_extract_links_identical_files() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("update.tar", &update_archive());
    let reference = fixture.write_reference("bin/tool", b"unchanged tool binary");

    ffuntar_cmd()
        .arg("-f")
        .arg(&archive)
        .arg("-r")
        .arg(fixture.reference())
        .arg("-s")
        .arg("1")
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction complete"))
        .stdout(predicate::str::contains("Linked files:     1"))
        .stdout(predicate::str::contains("Copied files:     1"));

    let linked = fixture.output().join("rootfs/bin/tool");
    assert_eq!(
        fs::metadata(&linked).unwrap().ino(),
        fs::metadata(&reference).unwrap().ino()
    );
    assert_eq!(
        fs::read(fixture.output().join("rootfs/bin/new")).unwrap(),
        b"brand new file"
    );
}

#[test]
fn test_extract_without_strip_finds_no_candidates() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("update.tar", &update_archive());
    fixture.write_reference("bin/tool", b"unchanged tool binary");

    ffuntar_cmd()
        .arg("-f")
        .arg(&archive)
        .arg("-r")
        .arg(fixture.reference())
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked files:     0"))
        .stdout(predicate::str::contains("Copied files:     2"));
}

#[test]
fn test_verbose_prints_actions() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("update.tar", &update_archive());
    fixture.write_reference("bin/tool", b"unchanged tool binary");

    ffuntar_cmd()
        .args(["-d", "-s", "1", "-f"])
        .arg(&archive)
        .arg("-r")
        .arg(fixture.reference())
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .success()
        .stderr(predicate::str::contains("link     rootfs/bin/tool"))
        .stderr(predicate::str::contains("copy     rootfs/bin/new"));
}

#[test]
fn test_extract_from_stdin() {
    let fixture = Fixture::new();
    let archive = TarTestBuilder::new()
        .add_file("piped.txt", b"from a pipe")
        .build_gz();

    ffuntar_cmd()
        .args(["-f", "-", "-q", "-C"])
        .arg(fixture.output())
        .write_stdin(archive)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        fs::read(fixture.output().join("piped.txt")).unwrap(),
        b"from a pipe"
    );
}

#[test]
fn test_list_writes_nothing() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("update.tar", &update_archive());

    ffuntar_cmd()
        .arg("-t")
        .arg("-f")
        .arg(&archive)
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .success()
        .stdout(predicate::str::contains("rootfs/bin/tool"))
        .stdout(predicate::str::contains("rootfs/bin/new"));

    assert_eq!(fs::read_dir(fixture.output()).unwrap().count(), 0);
}

#[test]
fn test_extract_json_output() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("update.tar", &update_archive());
    fixture.write_reference("bin/tool", b"unchanged tool binary");

    let output = ffuntar_cmd()
        .arg("--json")
        .arg("-f")
        .arg(&archive)
        .arg("-r")
        .arg(fixture.reference())
        .args(["-s", "1", "-C"])
        .arg(fixture.output())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["operation"], "extract");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["entries"], 4);
    assert_eq!(json["data"]["linked_files"], 1);
    assert_eq!(json["data"]["copied_files"], 1);
    assert_eq!(json["data"]["saved_write_bytes"], 21);
}

#[test]
fn test_list_json_output() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("update.tar", &update_archive());

    let output = ffuntar_cmd()
        .args(["-t", "--json", "-f"])
        .arg(&archive)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["operation"], "list");
    assert_eq!(json["data"]["total_entries"], 4);
    assert_eq!(json["data"]["entries"][0]["type"], "directory");
    assert_eq!(json["data"]["entries"][2]["path"], "rootfs/bin/tool");
}

#[test]
fn test_missing_archive_fails() {
    let fixture = Fixture::new();

    ffuntar_cmd()
        .arg("-f")
        .arg(fixture.temp.path().join("nope.tar"))
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive not found"));
}

#[test]
fn test_traversal_stops_extraction() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("evil.tar", &traversal_archive());

    ffuntar_cmd()
        .arg("-f")
        .arg(&archive)
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the output directory"));

    assert!(!fixture.output().join("after.txt").exists());
    assert!(!fixture.temp.path().join("escape.txt").exists());
}

#[test]
fn test_failing_run_still_prints_summary() {
    let fixture = Fixture::new();
    fixture.write_reference("bin/tool", b"unchanged tool binary");
    let outside = fixture.temp.path().join("outside");
    fs::create_dir(&outside).unwrap();
    let data = TarTestBuilder::new()
        .add_file("rootfs/bin/tool", b"unchanged tool binary")
        .add_symlink("rootfs/escape", outside.to_str().unwrap())
        .add_file("rootfs/escape/pwned.txt", b"owned")
        .build();
    let archive = fixture.write_archive("evil.tar", &data);

    ffuntar_cmd()
        .arg("-f")
        .arg(&archive)
        .arg("-r")
        .arg(fixture.reference())
        .args(["-s", "1", "-C"])
        .arg(fixture.output())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Extraction finished with errors"))
        .stdout(predicate::str::contains("Linked files:     1"))
        .stdout(predicate::str::contains("rootfs/escape/pwned.txt"))
        .stderr(predicate::str::contains("outside the output directory"));

    assert!(!outside.join("pwned.txt").exists());
}

#[test]
fn test_keep_going_extracts_rest_and_fails() {
    let fixture = Fixture::new();
    let archive = fixture.write_archive("evil.tar", &traversal_archive());

    ffuntar_cmd()
        .arg("--keep-going")
        .arg("-f")
        .arg(&archive)
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Extraction finished with errors"))
        .stdout(predicate::str::contains("../escape.txt"))
        .stderr(predicate::str::contains("1 of 2 entries could not be extracted"));

    assert_eq!(fs::read(fixture.output().join("after.txt")).unwrap(), b"y");
}

#[test]
fn test_truncated_archive_fails() {
    let fixture = Fixture::new();
    let mut data = TarTestBuilder::new()
        .add_file("big.bin", &[7u8; 4096])
        .build();
    data.truncate(1024);
    let archive = fixture.write_archive("short.tar", &data);

    ffuntar_cmd()
        .arg("-f")
        .arg(&archive)
        .arg("-C")
        .arg(fixture.output())
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    ffuntar_cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ffuntar"));
}
