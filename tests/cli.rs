//! Command-line behaviour of the `nibble-emu` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn write_rom(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("nibble-cli-{}-{}.bin", std::process::id(), name));
    std::fs::write(&path, bytes).unwrap();
    path
}

fn emu(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nibble-emu"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn test_no_arguments_prints_usage_and_exits_1() {
    let out = emu(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_extra_argument_exits_1() {
    let out = emu(&["a.bin", "b.bin"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
}

#[test]
fn test_help_exits_0() {
    let out = emu(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_missing_rom_exits_1_before_running() {
    let out = emu(&["/nonexistent/nibble/rom.bin"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("cannot read ROM image"), "{err}");
    assert!(!err.contains("illegal instruction"), "{err}");
}

#[test]
fn test_illegal_instruction_exits_1() {
    // LDI 7, then opcode 7 at address 2
    let rom = write_rom("illegal", &[0x17, 0x70]);
    let out = emu(&[rom.to_str().unwrap()]);
    std::fs::remove_file(&rom).unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("illegal instruction 7 at 002"), "{}", stderr(&out));
}

#[test]
fn test_debug_port_write_reported_on_stderr() {
    // ADDR := 0x100, A := 0xA, STR, then opcode 7
    let rom = write_rom("dbgout", &[0x11, 0x51, 0x06, 0x14, 0x1A, 0x37]);
    let out = emu(&[rom.to_str().unwrap()]);
    std::fs::remove_file(&rom).unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("wrote A to DBGOUT"), "{}", stderr(&out));
}

#[test]
fn test_cycle_limit_exits_0() {
    // JMP 000 forever
    let rom = write_rom("limit", &[0x80, 0x00]);
    let out = emu(&[rom.to_str().unwrap(), "--max-cycles", "5"]);
    std::fs::remove_file(&rom).unwrap();

    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
}

#[test]
fn test_dump_state_prints_json() {
    // LDI 2, then JMP 000
    let rom = write_rom("dump", &[0x12, 0x80, 0x00]);
    let out = emu(&[rom.to_str().unwrap(), "--max-cycles", "1", "--dump-state"]);
    std::fs::remove_file(&rom).unwrap();

    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let state: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(state["state"], "Running");
    assert_eq!(state["cycles"], 1);
    assert_eq!(state["registers"]["a"], 2);
    assert_eq!(state["debug_output"], 0);
}

#[test]
fn test_bad_config_exits_1() {
    let rom = write_rom("badcfg", &[0x12]);
    let config = std::env::temp_dir().join(format!("nibble-cli-{}-layout.json", std::process::id()));
    std::fs::write(&config, r#"{ "ram": [{ "base": 512, "length": 99999 }] }"#).unwrap();

    let out = emu(&[rom.to_str().unwrap(), "--config", config.to_str().unwrap()]);
    std::fs::remove_file(&rom).unwrap();
    std::fs::remove_file(&config).unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("invalid layout"), "{}", stderr(&out));
}
