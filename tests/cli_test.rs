use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::{Command,Stdio}; // Run programs
use std::path::Path;
use std::fs::File;

#[test]
fn verify_sample_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("ca65kit")?;
    if let Ok(fd) = File::open(Path::new("tests").join("ca65").join("hello.s")) {
        cmd.arg("verify")
            .stdin(Stdio::from(fd))
            .assert()
            .success()
            .stderr(predicate::str::contains("Passing"))
            .stdout(predicate::str::contains(".proc main"));
    }
    Ok(())
}

#[test]
fn verify_errors() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("ca65kit")?;
    if let Ok(fd) = File::open(Path::new("tests").join("ca65").join("errors.s")) {
        cmd.arg("verify")
            .stdin(Stdio::from(fd))
            .assert()
            .failure()
            .stderr(predicate::str::contains("row 2")
                .and(predicate::str::contains("does not support implied"))
                .and(predicate::str::contains("row 4")))
            .stdout(predicate::str::is_empty());
    }
    Ok(())
}

#[test]
fn verify_with_config() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("verify")
        .arg("-c").arg("{\"flag\":{\"keywordAlias\":\"warn\"}}")
        .write_stdin(" .byt 1\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("is an alias of `.byte`")
            .and(predicate::str::contains("warnings")));
    Ok(())
}

#[test]
fn verify_sexpr() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("verify")
        .arg("--sexpr")
        .write_stdin("L: lda #$10\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("(line L: (lda (imm 16)))"));
    Ok(())
}

#[test]
fn verify_empty() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("verify")
        .write_stdin("")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn verify_rejects_binary_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("verify")
        .write_stdin(vec![b' ',b'n',b'o',b'p',0xff,0xfe,b'\n'])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid UTF-8")
            .and(predicate::str::contains("panicked").not()));
    Ok(())
}

#[test]
fn parse_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("parse")
        .write_stdin("L: lda #1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\":\"immediate\"")
            .and(predicate::str::contains("\"errors\":[]")));
    Ok(())
}

#[test]
fn parse_errors_are_output() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("parse")
        .arg("--indent").arg("2")
        .write_stdin(" lda #\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("expected expression before end of line")
            .and(predicate::str::contains("\n  \"errors\": [")));
    Ok(())
}

#[test]
fn format_columns() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("format")
        .write_stdin("L: lda #$10 ; load\n  sta $2000,x\n")
        .assert()
        .success()
        .stdout("L:       lda   #$10       ; load\n         sta   $2000,x\n");
    Ok(())
}

#[test]
fn format_with_config() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("ca65kit")?;
    cmd.arg("format")
        .arg("-c").arg("{\"columns\":{\"c1\":4,\"c2\":4}}")
        .write_stdin("L: lda #$10\n")
        .assert()
        .success()
        .stdout("L:  lda #$10\n");
    Ok(())
}

#[test]
fn completions() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("ca65kit")?;
    cmd.arg("completions")
        .arg("-s").arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("ca65kit"));
    Ok(())
}

#[test]
fn no_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("ca65kit")?;
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No subcommand"));
    Ok(())
}
