//! Tests of the `tp25sim` decode and encode subcommands.

use std::process::{Command, Output};

use serde_json::Value;

fn tp25sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tp25sim"))
        .args(args)
        .output()
        .expect("failed to run tp25sim")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "tp25sim failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_decode_setup_ack() {
    let hex = "01010a0c445566778899aabbccddeeff17181920";
    let json: Value = serde_json::from_str(&stdout(&tp25sim(&["decode", hex]))).unwrap();
    assert_eq!(json["type"], "setup_ack");
    assert_eq!(json["raw"], hex);
}

#[test]
fn test_decode_temperatures() {
    let output = tp25sim(&["decode", "300f5a0c00ffffffffffff0281ffffffff1e0140"]);
    let json: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["type"], "temperatures");
    assert_eq!(json["unit"], "celsius");
    assert_eq!(json["alarms"], 0);
    assert_eq!(
        json["temps"],
        serde_json::json!([null, null, null, 281])
    );
}

#[test]
fn test_decode_rejects_bad_input() {
    // Wrong checksum
    assert!(!tp25sim(&["decode", "300f5a0c00ffffffffffff0281ffffffff1f0140"]).status.success());
    // Not hex
    assert!(!tp25sim(&["decode", "zz"]).status.success());
    // Short
    assert!(!tp25sim(&["decode", "0101"]).status.success());
}

#[test]
fn test_encode_setup_matches_stock_app() {
    let output = tp25sim(&["encode", "setup"]);
    assert_eq!(stdout(&output).trim(), "01097032e2c1799db4d1c7b1");
}

#[test]
fn test_encode_profiles() {
    let output = tp25sim(&[
        "encode", "set-profile", "--probe", "2", "--alarm-index", "1", "--high", "0x1234", "--low", "0x0567",
    ]);
    assert_eq!(stdout(&output).trim(), "2306020112340567de");

    let output = tp25sim(&["encode", "report-profile", "--probe", "1"]);
    assert_eq!(stdout(&output).trim(), "24010126");

    assert_eq!(stdout(&tp25sim(&["encode", "unknown-a"])).trim(), "260026");
    assert_eq!(stdout(&tp25sim(&["encode", "unknown-b"])).trim(), "410041");
}

#[test]
fn test_encode_probe_out_of_range_fails() {
    let output = tp25sim(&["encode", "set-profile", "--probe", "7"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    assert!(!tp25sim(&["encode", "report-profile", "--probe", "0"]).status.success());
}
