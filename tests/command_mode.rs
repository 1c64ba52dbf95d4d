//! Integration tests for the tblcalc command line

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A file under the system temp dir, unique to this test process.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tblcalc_{}_{}", std::process::id(), name))
}

fn run_command(args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tblcalc"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

const PRICES: &str = "Item,Price,Qty,Total\nApple,100,5,\nOrange,150,3,\n";

#[test]
fn test_formula_on_csv() {
    let (stdout, _, code) = run_command(&["-e", "$4=$2*$3"], PRICES);
    assert_eq!(stdout, "Item,Price,Qty,Total\nApple,100,5,500\nOrange,150,3,450\n");
    assert_eq!(code, 0);
}

#[test]
fn test_joined_and_repeated_formulas() {
    let input = "Item,Price,Qty,Total,Tax\nApple,100,5,,\n";
    let (stdout, _, code) = run_command(&["-e", "$4=$2*$3::$5=$4/10", "-e", "@2$1=n"], input);
    assert_eq!(stdout, "Item,Price,Qty,Total,Tax\nn,100,5,500,50\n");
    assert_eq!(code, 0);
}

#[test]
fn test_no_header() {
    let input = "Apple,100,5,\nOrange,150,3,\n";
    let (stdout, _, code) = run_command(&["--no-header", "-e", "$4=$2*$3"], input);
    assert_eq!(stdout, "Apple,100,5,500\nOrange,150,3,450\n");
    assert_eq!(code, 0);
}

#[test]
fn test_markdown_output() {
    let (stdout, _, code) = run_command(&["--markdown", "-e", "$4=$2*$3"], PRICES);
    assert_eq!(
        stdout,
        "| Item | Price | Qty | Total |\n\
         | --- | --- | --- | --- |\n\
         | Apple | 100 | 5 | 500 |\n\
         | Orange | 150 | 3 | 450 |\n"
    );
    assert_eq!(code, 0);
}

#[test]
fn test_tsv_input() {
    let input = "a\tb\n10\t\n20\t\n";
    let (stdout, _, code) = run_command(&["--tsv", "-e", "$2=$-1+5"], input);
    assert_eq!(stdout, "a\tb\n10\t15\n20\t25\n");
    assert_eq!(code, 0);
}

#[test]
fn test_range_aggregate() {
    let input = "Item,Total\nA,1.5\nB,2\n,\n";
    let (stdout, _, code) = run_command(&["-e", "@>$2=vsum(@<..@>>)"], input);
    assert_eq!(stdout, "Item,Total\nA,1.5\nB,2\n,3.5\n");
    assert_eq!(code, 0);
}

#[test]
fn test_malformed_formula_fails() {
    let (stdout, stderr, code) = run_command(&["-e", "not-a-formula"], PRICES);
    assert_eq!(stdout, "");
    assert!(stderr.contains("invalid formula format: not-a-formula"));
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run_command(&["--bogus"], "");
    assert!(stderr.contains("Unknown option: --bogus"));
    assert_eq!(code, 1);
}

#[test]
fn test_list_functions() {
    let (stdout, _, code) = run_command(&["--functions"], "");
    assert!(stdout.contains("vsum"));
    assert!(stdout.contains("vmedian"));
    assert_eq!(code, 0);
}

#[test]
fn test_script_file() {
    let script = temp_path("script.tblfm");
    fs::write(&script, "$4=$2*$3\n\n@>$4=vsum(@<<..@>>)::@>$1=Sum\n").unwrap();
    let input = "Item,Price,Qty,Total\nApple,100,5,\nOrange,150,3,\n,,,\n";
    let (stdout, _, code) = run_command(&["-s", script.to_str().unwrap()], input);
    let _ = fs::remove_file(&script);
    assert_eq!(
        stdout,
        "Item,Price,Qty,Total\nApple,100,5,500\nOrange,150,3,450\nSum,,,950\n"
    );
    assert_eq!(code, 0);
}

#[test]
fn test_output_file() {
    let output = temp_path("output.csv");
    let (stdout, _, code) = run_command(
        &["-e", "$4=$2*$3", "-o", output.to_str().unwrap()],
        PRICES,
    );
    let written = fs::read_to_string(&output).unwrap();
    let _ = fs::remove_file(&output);
    assert_eq!(stdout, "");
    assert_eq!(written, "Item,Price,Qty,Total\nApple,100,5,500\nOrange,150,3,450\n");
    assert_eq!(code, 0);
}

#[test]
fn test_format_follows_extension() {
    for name in ["table.tsv", "table.tab"] {
        let path = temp_path(name);
        fs::write(&path, "a\tb,c\n10\t\n").unwrap();
        let (stdout, _, code) = run_command(&["-e", "$2=$1*2", path.to_str().unwrap()], "");
        let _ = fs::remove_file(&path);
        assert_eq!(stdout, "a\tb,c\n10\t20\n", "{}", name);
        assert_eq!(code, 0);
    }

    let path = temp_path("table.csv");
    fs::write(&path, "a,b\n10,\n").unwrap();
    let (stdout, _, code) = run_command(&["-e", "$2=$1*2", path.to_str().unwrap()], "");
    let _ = fs::remove_file(&path);
    assert_eq!(stdout, "a,b\n10,20\n");
    assert_eq!(code, 0);
}
