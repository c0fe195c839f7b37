use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn source(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn toylex() -> Command {
    Command::cargo_bin("toylex").unwrap()
}

#[test]
fn test_dump_tokens() {
    let file = source("int x;\nx = 0x1F; // set\n");

    toylex()
        .arg("-f")
        .arg(file.path())
        .arg("-l")
        .assert()
        .success()
        .stdout("int id semicolon\nid assignop intconstant semicolon\n");
}

#[test]
fn test_tokens_by_default() {
    let file = source("while (true) break;");

    toylex()
        .arg("--file")
        .arg(file.path())
        .assert()
        .success()
        .stdout("while leftparen booleanconstant rightparen break semicolon\n");
}

#[test]
fn test_dump_symbols() {
    let file = source("count = count + total;");

    toylex()
        .arg("-f")
        .arg(file.path())
        .arg("-s")
        .assert()
        .success()
        .stdout(predicate::str::contains("switch:"))
        .stdout(predicate::str::contains("identifier  count"))
        .stdout(predicate::str::contains("identifier  total"))
        .stdout(predicate::str::contains("keyword     while"))
        .stdout(predicate::str::contains("assignop").not());
}

#[test]
fn test_lexical_errors_reported() {
    let file = source("a & b");

    toylex()
        .arg("-f")
        .arg(file.path())
        .assert()
        .success()
        .stdout("id error id\n")
        .stderr(predicate::str::contains("1 lexical error(s)"));
}

#[test]
fn test_trie_capacity_exhausted() {
    let file = source("x");

    toylex()
        .arg("-f")
        .arg(file.path())
        .arg("--trie_capacity")
        .arg("8")
        .assert()
        .failure()
        .stderr(predicate::str::contains("symbol table full"));
}

#[test]
fn test_missing_file() {
    toylex()
        .arg("-f")
        .arg("does/not/exist.toy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}
