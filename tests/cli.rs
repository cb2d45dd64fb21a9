use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn setup_test_directory() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let t1 = dir.path().join("t1");
    let t2 = dir.path().join("t2");
    let ro = dir.path().join("ro");
    fs::create_dir_all(t1.join("nested")).unwrap();
    fs::create_dir_all(&t2).unwrap();
    fs::create_dir_all(&ro).unwrap();

    fs::write(t1.join("song.mp3"), "la la la").unwrap();
    fs::write(t1.join("nested").join("notes.txt"), "remember").unwrap();
    fs::write(t2.join("song copy.mp3"), "la la la").unwrap();
    fs::write(t2.join("unique.txt"), "only here").unwrap();
    fs::write(ro.join("archived.txt"), "remember").unwrap();
    dir
}

fn dedup() -> Command {
    let mut cmd = Command::cargo_bin("dedup").unwrap();
    // Keep the developer's environment out of the run.
    cmd.env_remove("DEDUP_TARGET_DIRS")
        .env_remove("DEDUP_READ_ONLY_DIRS")
        .env_remove("LOG_FILE_PATH")
        .env("TRACING_LEVEL", "warn");
    cmd
}

#[test]
fn test_yes_deletes_duplicates() {
    let dir = setup_test_directory();
    let t1 = dir.path().join("t1");
    let t2 = dir.path().join("t2");

    dedup()
        .current_dir(dir.path())
        .arg("--yes")
        .arg(&t1)
        .arg(&t2)
        .arg("-r")
        .arg(dir.path().join("ro"))
        .assert()
        .success();

    assert!(t1.join("song.mp3").exists());
    assert!(!t2.join("song copy.mp3").exists());
    assert!(t2.join("unique.txt").exists());
    assert!(!t1.join("nested").join("notes.txt").exists());
    assert!(dir.path().join("ro").join("archived.txt").exists());
}

#[test]
fn test_remove_empty_dirs_flag() {
    let dir = setup_test_directory();
    let t1 = dir.path().join("t1");

    dedup()
        .current_dir(dir.path())
        .args(["-y", "-e"])
        .arg(&t1)
        .arg("-r")
        .arg(dir.path().join("ro"))
        .assert()
        .success();

    assert!(!t1.join("nested").exists());
    assert!(t1.join("song.mp3").exists());
}

#[test]
fn test_missing_directory_fails() {
    let dir = setup_test_directory();
    let missing = dir.path().join("missing");

    let assert = dedup()
        .current_dir(dir.path())
        .arg("-y")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not exist."));

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert_eq!(stderr.matches("does not exist.").count(), 1, "{}", stderr);
}

#[test]
fn test_no_targets_fails() {
    let dir = tempfile::tempdir().unwrap();

    dedup()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("At least one target directory is required."));
}

#[test]
fn test_overlapping_targets_fail() {
    let dir = setup_test_directory();
    let t1 = dir.path().join("t1");

    dedup()
        .current_dir(dir.path())
        .arg("-y")
        .arg(&t1)
        .arg(t1.join("nested"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is a subdirectory of"));

    assert!(t1.join("nested").join("notes.txt").exists());
}

#[test]
fn test_quit_at_prompt_exits_cleanly() {
    let dir = setup_test_directory();
    let t1 = dir.path().join("t1");
    let t2 = dir.path().join("t2");

    dedup()
        .current_dir(dir.path())
        .arg("--print-report")
        .arg(&t1)
        .arg(&t2)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete duplicate file"))
        .stdout(predicate::str::contains("(y/n/q/s)"))
        .stdout(predicate::str::contains("Duplicates").not());

    assert!(t2.join("song copy.mp3").exists());
}

#[test]
fn test_report_and_verbose_output() {
    let dir = setup_test_directory();
    let t1 = dir.path().join("t1");
    let t2 = dir.path().join("t2");

    dedup()
        .current_dir(dir.path())
        .args(["-y", "-v", "-p"])
        .arg(&t1)
        .arg(&t2)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scanning target directory"))
        .stdout(predicate::str::contains("song copy.mp3 duplicates"))
        .stdout(predicate::str::contains("    Duplicates      Directory"))
        .stdout(predicate::str::contains("     1       (8 B)  Total"))
        .stdout(predicate::str::contains("Scanned 4 files in 3 directories"))
        .stdout(predicate::str::contains("Completed in 0:00:"));
}

#[test]
fn test_targets_from_config_file() {
    let dir = setup_test_directory();
    let t2 = dir.path().join("t2");
    let config_path = dir.path().join("settings.toml");
    fs::write(
        &config_path,
        format!(
            "target_dirs = [{:?}, {:?}]\nyes = true\n",
            dir.path().join("t1").to_string_lossy(),
            t2.to_string_lossy()
        ),
    )
    .unwrap();

    dedup()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    assert!(!t2.join("song copy.mp3").exists());
}
