#![cfg(feature = "cli")]

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_z85").to_string()
}

#[test]
fn cli_encode_decode_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let text = dir.path().join("input.z85");
    let output = dir.path().join("output.bin");

    std::fs::write(&input, b"HelloWorld").unwrap();

    let st = Command::new(bin())
        .args(["encode", "--pad"])
        .arg(&input)
        .arg(&text)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&text).unwrap().len(), 16);

    let st = Command::new(bin())
        .args(["decode", "--strict"])
        .arg(&text)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"HelloWorld");
}

#[test]
fn cli_stdin_to_stdout() {
    let mut child = Command::new(bin())
        .arg("decode")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"HelloWorld\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B]);
}

#[test]
fn cli_unaligned_without_pad_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("odd.bin");
    let text = dir.path().join("odd.z85");
    std::fs::write(&input, b"abc").unwrap();

    let out = Command::new(bin())
        .arg("encode")
        .arg(&input)
        .arg(&text)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("multiple of 4"));
    assert!(!text.exists());
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let text = dir.path().join("out.z85");
    std::fs::write(&input, b"1234").unwrap();
    std::fs::write(&text, b"keep").unwrap();

    let st = Command::new(bin())
        .arg("encode")
        .arg(&input)
        .arg(&text)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&text).unwrap(), b"keep");

    let st = Command::new(bin())
        .arg("--force")
        .arg("encode")
        .arg(&input)
        .arg(&text)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&text).unwrap(), b"f!$Kw");
}

#[test]
fn cli_strict_rejects_foreign_symbols() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("bad.z85");
    std::fs::write(&text, "Hell_World").unwrap();

    let out = Command::new(bin())
        .args(["decode", "--strict", "--stdout"])
        .arg(&text)
        .output()
        .unwrap();
    assert!(!out.status.success());

    let out = Command::new(bin())
        .args(["decode", "--stdout"])
        .arg(&text)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout.len(), 8);
}

#[test]
fn cli_json_stats() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, b"12345").unwrap();

    let out = Command::new(bin())
        .args(["--json", "encode", "--pad", "--stdout"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(stats["command"], "encode");
    assert_eq!(stats["input_size"], 5);
    assert_eq!(stats["padding"], 3);
    assert_eq!(out.stdout.len(), 11);
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
}
