use std::path::PathBuf;
use std::process::Command;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tests/data")
        .join(name)
}

fn run(out: &PathBuf, zscore: bool) -> bool {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_expr-heatmap"));
    cmd.arg("--exp")
        .arg(data("heatmap_expression.tsv"))
        .arg("--genes")
        .arg(data("genes.txt"))
        .arg("--samples")
        .arg(data("groups.txt"))
        .arg("--out")
        .arg(out);
    if zscore {
        cmd.arg("--zscore");
    }
    cmd.status().unwrap().success()
}

#[test]
fn test_svg_heatmap_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plots/heatmap.svg");
    assert!(run(&out, false));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Alpha"));

    let values = std::fs::read_to_string(dir.path().join("plots/heatmap_plotted_values.txt")).unwrap();
    assert!(values.starts_with("gene\tbrain\tliver\theart"));
}

#[test]
fn test_pdf_request_is_written_as_svg() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("heatmap.pdf");
    assert!(run(&out, true));

    assert!(dir.path().join("heatmap.svg").exists());
    assert!(!out.exists());
    assert!(dir.path().join("heatmap_plotted_values.txt").exists());
}

#[test]
fn test_missing_flag_fails() {
    let status = Command::new(env!("CARGO_BIN_EXE_expr-heatmap"))
        .arg("--exp")
        .arg(data("heatmap_expression.tsv"))
        .status()
        .unwrap();
    assert!(!status.success());
}
