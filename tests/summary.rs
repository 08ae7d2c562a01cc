//! E2E tests for the summary, inspect and schema commands

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn gstr3b(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gstr3b"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("valid JSON output")
}

/// Detected columns, dirty cells ignored, net liability
#[test]
fn summary_detects_columns() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales.csv",
        "-p",
        "tests/data/purchases.csv",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);

    assert!(stdout.contains("COLUMN MAPPING"));
    assert!(stdout.contains("Taxable Amount"));
    assert!(stdout.contains("Central GST"));
    assert!(stdout.contains("₹300.00"));
    assert!(stdout.contains("₹27.00"));
    assert!(stdout.contains("Total GST Payable"));
    assert!(stdout.contains("Net GST Liability"));
    assert!(stdout.contains("₹18.00"));
}

#[test]
fn summary_json_totals() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales.csv",
        "-p",
        "tests/data/purchases.csv",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let data = json(&output);
    assert_eq!(data["outward"]["taxable_value"], "300.00");
    assert_eq!(data["outward"]["cgst"], "27.00");
    assert_eq!(data["outward"]["igst"], "0.00");
    assert_eq!(data["inward"]["taxable_value"], "200.00");
    assert_eq!(data["inward"]["sgst"], "18.00");
    assert_eq!(data["gst_payable"], "54.00");
    assert_eq!(data["input_tax_credit"], "36.00");
    assert_eq!(data["net_gst"], "18.00");
    assert_eq!(data["position"], "liability");
    assert_eq!(data["columns"]["purchases"]["igst"], "Integrated GST");
}

/// Notes with commas and semicolons leave tab as the only separator that parses
#[test]
fn summary_tab_separated_purchases() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales.csv",
        "-p",
        "tests/data/purchases_tab.tsv",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let data = json(&output);
    assert_eq!(data["columns"]["purchases"]["taxable_value"], "Taxable Amount");
    assert_eq!(data["columns"]["purchases"]["igst"], serde_json::Value::Null);
    assert_eq!(data["inward"]["taxable_value"], "150.00");
    assert_eq!(data["inward"]["cgst"], "13.50");
    assert_eq!(data["input_tax_credit"], "27.00");
    assert_eq!(data["net_gst"], "27.00");
}

#[test]
fn summary_refund_due() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/refund_sales.csv",
        "-p",
        "tests/data/refund_purchases.csv",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("₹1,000.00"));
    assert!(stdout.contains("₹1,200.00"));
    assert!(stdout.contains("GST Refund Due"));
    assert!(stdout.contains("₹200.00"));
    assert!(!stdout.contains("Net GST Liability"));
}

#[test]
fn summary_csv_output() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/refund_sales.csv",
        "-p",
        "tests/data/refund_purchases.csv",
        "--csv",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next().unwrap(),
        "outward_taxable_value,outward_cgst,outward_sgst,outward_igst,\
         inward_taxable_value,inward_cgst,inward_sgst,inward_igst,\
         gst_payable,input_tax_credit,net_gst"
    );
    assert_eq!(
        lines.next().unwrap(),
        "5000.00,400.00,400.00,200.00,6000.00,500.00,500.00,200.00,1000.00,1200.00,-200.00"
    );
}

/// Undetectable taxable column without overrides is reported with the available columns
#[test]
fn summary_requires_selection() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales.csv",
        "-p",
        "tests/data/purchases_custom.csv",
    ]);
    let stderr = stderr(&output);

    assert!(!output.status.success());
    assert!(stderr.contains("could not detect the purchases taxable value column"));
    assert!(stderr.contains("Bill, Item, Cost"));
    assert!(stderr.contains("--purchases-taxable-value"));
}

#[test]
fn summary_with_column_overrides() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales.csv",
        "-p",
        "tests/data/purchases_custom.csv",
        "--purchases-taxable-value",
        "cost",
        "--purchases-cgst",
        "none",
        "--purchases-sgst",
        "none",
        "--purchases-igst",
        "None",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let data = json(&output);
    assert_eq!(data["inward"]["taxable_value"], "200.50");
    assert_eq!(data["inward"]["cgst"], "0.00");
    assert_eq!(data["inward"]["sgst"], "0.00");
    assert_eq!(data["inward"]["igst"], "0.00");
    assert_eq!(data["columns"]["purchases"]["taxable_value"], "Cost");
    assert_eq!(data["columns"]["purchases"]["cgst"], serde_json::Value::Null);
    assert_eq!(data["net_gst"], "54.00");
}

#[test]
fn summary_unknown_override_column() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales.csv",
        "-p",
        "tests/data/purchases.csv",
        "--sales-igst",
        "Cess",
    ]);
    let stderr = stderr(&output);

    assert!(!output.status.success());
    assert!(stderr.contains("no column named 'Cess'"));
}

/// Semicolon file picked up by the fallback, columns taken from a mapping file
#[test]
fn summary_semicolon_file_with_mapping() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales_semicolon.csv",
        "-p",
        "tests/data/purchases.csv",
        "-m",
        "tests/data/mapping.json",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let data = json(&output);
    // "1000,50" is not a number and counts as zero
    assert_eq!(data["outward"]["taxable_value"], "500.00");
    assert_eq!(data["outward"]["cgst"], "135.00");
    assert_eq!(data["outward"]["sgst"], "135.00");
    assert_eq!(data["outward"]["igst"], "0.00");
    assert_eq!(data["gst_payable"], "270.00");
}

#[test]
fn summary_flag_overrides_mapping_file() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/sales_semicolon.csv",
        "-p",
        "tests/data/purchases.csv",
        "-m",
        "tests/data/mapping.json",
        "--sales-sgst",
        "none",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let data = json(&output);
    assert_eq!(data["outward"]["cgst"], "135.00");
    assert_eq!(data["outward"]["sgst"], "0.00");
}

#[test]
fn summary_interactive_selection() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gstr3b"))
        .args([
            "summary",
            "-s",
            "tests/data/sales.csv",
            "-p",
            "tests/data/purchases_custom.csv",
            "--interactive",
            "--json",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"3\n0\nnone\n0\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stderr = stderr(&output);
    assert!(stderr.contains("Select PURCHASES Taxable Value column:"));
    assert!(stderr.contains("  3) Cost"));

    let data = json(&output);
    assert_eq!(data["inward"]["taxable_value"], "200.50");
    assert_eq!(data["input_tax_credit"], "0.00");
}

#[test]
fn summary_unparseable_file() {
    let output = gstr3b(&[
        "summary",
        "-s",
        "tests/data/empty.csv",
        "-p",
        "tests/data/purchases.csv",
    ]);
    let stderr = stderr(&output);

    assert!(!output.status.success());
    assert!(stderr.contains("loading sales file"));
    assert!(stderr.contains("comma-separated"));
    assert!(stderr.contains("tab-separated"));
}

#[test]
fn inspect_previews_file() {
    let output = gstr3b(&["inspect", "-f", "tests/data/sales_semicolon.csv", "-r", "1"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("semicolon-separated, 2 rows"));
    assert!(stdout.contains("  2. Net"));
    assert!(stdout.contains("S-1"));
    assert!(!stdout.contains("S-2"));
    assert!(stdout.contains("Not found"));
}

#[test]
fn schema_mapping_is_json_schema() {
    let output = gstr3b(&["schema", "mapping"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let schema = json(&output);
    assert_eq!(schema["title"], "MappingFile");
    assert!(schema["properties"]["sales"].is_object());
    assert!(schema["properties"]["purchases"].is_object());
}

#[test]
fn schema_csv_header() {
    let output = gstr3b(&["schema", "csv-header"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.starts_with("outward_taxable_value,"));
    assert!(stdout.trim_end().ends_with("net_gst"));
}
