//! Exercises the `obs` binary end-to-end: write a feed file, ingest it,
//! then query it back and check the rendered output.

use std::io::Write;
use std::process::Command;

use tempfile::tempdir;

fn obs_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_obs"))
}

#[test]
fn ingest_then_query_round_trips_through_real_files() {
    let dir = tempdir().unwrap();
    let store_dir = dir.path().join("store");
    let feed_path = dir.path().join("AAPL.log");

    let mut feed = std::fs::File::create(&feed_path).unwrap();
    writeln!(feed, "100 o1 AAPL BUY NEW 10.50 100").unwrap();
    writeln!(feed, "101 o2 AAPL SELL NEW 11.00 50").unwrap();
    writeln!(feed, "102 o1 AAPL TRADE NEW 10.50 100").unwrap(); // malformed line, skipped
    writeln!(feed, "103 o1 AAPL BUY TRADE 10.50 40").unwrap();
    drop(feed);

    let status = obs_bin()
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("--source")
        .arg(format!("AAPL={}", feed_path.display()))
        .status()
        .expect("failed to run obs ingest");
    assert!(status.success());

    assert!(store_dir.join("AAPL.snap").exists());
    assert!(store_dir.join("AAPL.idx").exists());

    let output = obs_bin()
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("query")
        .arg("AAPL")
        .arg("0")
        .arg("1000")
        .output()
        .expect("failed to run obs query");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next().unwrap(),
        "symbol, epoch, bid5q@bid5p, bid4q@bid4p, bid3q@bid3p, bid2q@bid2p, bid1q@bid1p, \
         X, ask1q@ask1p, ask2q@ask2p, ask3q@ask3p, ask4q@ask4p, ask5q@ask5p, \
         lastTradePrice, lastTradeQuantity"
    );
    let data_lines: Vec<&str> = lines.collect();
    assert_eq!(data_lines.len(), 3);
    assert!(data_lines[0].starts_with("AAPL, 100,"));
    let last_line = data_lines.last().unwrap();
    assert!(last_line.contains("10.50"));
    assert!(last_line.ends_with("40"));
}

#[test]
fn query_with_selected_fields_projects_only_those_columns() {
    let dir = tempdir().unwrap();
    let store_dir = dir.path().join("store");
    let feed_path = dir.path().join("MSFT.log");

    let mut feed = std::fs::File::create(&feed_path).unwrap();
    writeln!(feed, "1 b1 MSFT BUY NEW 300.25 10").unwrap();
    drop(feed);

    let status = obs_bin()
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("--source")
        .arg(format!("MSFT={}", feed_path.display()))
        .status()
        .unwrap();
    assert!(status.success());

    let output = obs_bin()
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("query")
        .arg("MSFT")
        .arg("0")
        .arg("10")
        .arg("symbol,bid1p,bid1q")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next().unwrap(), "symbol, bid1p, bid1q");
    assert_eq!(lines.next().unwrap(), "MSFT, 300.25, 10");
}

#[test]
fn query_with_unknown_field_reports_error_and_no_rows() {
    let dir = tempdir().unwrap();
    let store_dir = dir.path().join("store");
    std::fs::create_dir_all(&store_dir).unwrap();

    let output = obs_bin()
        .arg("--store-dir")
        .arg(&store_dir)
        .arg("query")
        .arg("NOPE")
        .arg("0")
        .arg("10")
        .arg("bogus")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown field"));
}
