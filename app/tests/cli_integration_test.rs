//! End-to-end runs of the `recordctl` binary.

use std::io::Write;
use std::process::{Command, Output};

const AAPL_JSON: &str = r#"{"_type":"Trade","symbol":"AAPL","timestamp":"2018-11-22T10:30:05","order":"sell","price":"177.01","volume":20,"commission":"9.99"}"#;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn recordctl(settings: &str, args: &[&str]) -> Output {
    let config = write_temp(settings);
    Command::new(env!("CARGO_BIN_EXE_recordctl"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn demo_round_trips_the_sample_activity() {
    let output = recordctl("", &["demo"]);
    assert!(output.status.success(), "{output:?}");
    let out = stdout(&output);
    assert!(out.contains(r#""low":"337.60""#));
    assert!(out.contains(r#""_type":"Trade""#));
}

#[test]
fn decode_prints_the_canonical_encoding() {
    let input = write_temp(AAPL_JSON.replace(",\"", ", \"").as_str());
    let output = recordctl("", &["decode", "--input", input.path().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim_end(), AAPL_JSON);
}

#[test]
fn decode_passes_unknown_objects_through() {
    let input = write_temp(r#"{"_type":"Unknown","x":1}"#);
    let output = recordctl("", &["decode", "-i", input.path().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim_end(), r#"{"_type":"Unknown","x":1}"#);
}

#[test]
fn decode_keeps_foreign_key_order_and_offsets() {
    let trade = AAPL_JSON.replace("2018-11-22T10:30:05", "2018-11-22T10:30:05-05:00");
    let json = format!(r#"{{"venue":"XNAS","fills":[{trade}],"as_of":"2018-11-22"}}"#);
    let input = write_temp(&json);
    let output = recordctl("", &["decode", "-i", input.path().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim_end(), json);
}

#[test]
fn decode_fails_on_a_malformed_record() {
    let input = write_temp(&AAPL_JSON.replace("2018-11-22T10:30:05", "yesterday"));
    let output = recordctl("", &["decode", "-i", input.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed"));
}

#[test]
fn strict_setting_requires_a_kind() {
    let input = write_temp(AAPL_JSON);
    let path = input.path().to_str().unwrap();

    let output = recordctl("[codec]\nstrict = true\n", &["decode", "-i", path]);
    assert!(!output.status.success());

    let output = recordctl("[codec]\nstrict = true\n", &["decode", "-i", path, "--kind", "trade"]);
    assert!(output.status.success(), "{output:?}");
}

#[test]
fn validate_names_the_offending_fields() {
    let input = write_temp(&AAPL_JSON.replace(r#""volume":20"#, r#""volume":"twenty""#));
    let output = recordctl("", &["validate", "--kind", "trade", "-i", input.path().to_str().unwrap()]);
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["volume"][0], "Not a valid integer.");
}

#[test]
fn validate_accepts_a_good_record() {
    let input = write_temp(AAPL_JSON);
    let output = recordctl("", &["validate", "-k", "Trade", "-i", input.path().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim_end(), "ok");
}
