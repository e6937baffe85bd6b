//! CLI integration tests for the clusterboss binary.

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const COUNTS: &str = "number of unique sequences = 4\n\
                      total number of molecules = 195\n\
                      \n\
                      AAAA 100\n\
                      CCCC 40\n\
                      AAAT 50\n\
                      GGGG 5\n";

fn write_counts(dir: &Path) -> Result<std::path::PathBuf> {
    let path = dir.join("round5.txt");
    fs::write(&path, COUNTS)?;
    Ok(path)
}

fn clusterboss() -> Command {
    Command::new(env!("CARGO_BIN_EXE_clusterboss"))
}

#[test]
fn test_cli_writes_peaks_and_nopeaks() -> Result<()> {
    let dir = tempdir()?;
    let input = write_counts(dir.path())?;

    let output = clusterboss()
        .arg(&input)
        .args(["-d", "1", "-n", "2", "-a", "1", "-c", "10", "--keep-not-clustered"])
        .arg("--out-dir")
        .arg(dir.path())
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("There are 4 different sequences"));
    assert!(stdout.contains("Clustering resulted in 1 peaks."));

    let out_dir = dir.path().join("e1");
    let peaks = fs::read_to_string(out_dir.join("round5_e1_ms2_ma1_mac10_norec_peaks.txt"))?;
    assert!(peaks.contains("---------- peak = 1----------"));
    assert!(peaks.contains("AAAA"));
    assert!(peaks.contains("0.5128"));
    assert!(peaks.contains("AAAT"));
    assert!(!peaks.contains("CCCC"));

    let nopeaks = fs::read_to_string(out_dir.join("round5_e1_ms2_ma1_mac10_norec_nopeaks.txt"))?;
    assert!(nopeaks.contains("CCCC"));
    assert!(nopeaks.contains("GGGG\t5\t0.0256\t-\t-"));
    Ok(())
}

#[test]
fn test_cli_recycle_naming_without_nopeaks() -> Result<()> {
    let dir = tempdir()?;
    let input = write_counts(dir.path())?;

    let status = clusterboss()
        .arg(&input)
        .args(["-d", "2", "-c", "1000", "--recycle"])
        .arg("--out-dir")
        .arg(dir.path())
        .status()?;
    assert!(status.success());

    let out_dir = dir.path().join("e2");
    let peaks = fs::read_to_string(out_dir.join("round5_e2_ms1_ma1_mac1000_rec_peaks.txt"))?;
    assert_eq!(
        peaks.lines().collect::<Vec<_>>(),
        vec!["peak_rank / sequence_rank / sequence / abundance / frequency / distance to center / status"]
    );
    assert!(!out_dir.join("round5_e2_ms1_ma1_mac1000_rec_nopeaks.txt").exists());
    Ok(())
}

#[test]
fn test_cli_invalid_parameter_writes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let input = write_counts(dir.path())?;

    let output = clusterboss()
        .arg(&input)
        .args(["-d", "1", "-n", "0"])
        .arg("--out-dir")
        .arg(dir.path())
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min_seqs"), "stderr: {}", stderr);
    assert!(!dir.path().join("e1").exists());
    Ok(())
}

#[test]
fn test_cli_rejects_malformed_abundance() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("bad.txt");
    fs::write(&input, "1\n10\n\nAAAA ten\n")?;

    let output = clusterboss()
        .arg(&input)
        .arg("--out-dir")
        .arg(dir.path())
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 4"), "stderr: {}", stderr);
    Ok(())
}
