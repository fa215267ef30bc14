use anyhow::Result;
use logscan::{run_generate, run_scan, GenerateConfig, Match, ScanConfig, ScanEvent};
use std::fs::{self, File};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use tempfile::tempdir;

fn write_corpus(dir: &Path, file_count: usize, keyword_lines: &[(usize, u64)]) -> Result<()> {
    // keyword_lines: (file index, 1-based line) positions that get the keyword.
    for i in 0..file_count {
        let mut file = File::create(dir.join(format!("log_{i:03}.txt")))?;
        for line in 1..=50u64 {
            if keyword_lines.contains(&(i, line)) {
                writeln!(file, "user=99 action=login by 99 line={line}")?;
            } else {
                writeln!(file, "nothing interesting on line {line}")?;
            }
        }
    }
    Ok(())
}

fn config_for(dir: &Path, keyword: &str, threads: usize) -> ScanConfig {
    let mut config = ScanConfig::new(dir, keyword);
    config.output_path = dir.join("results.txt");
    config.thread_count = NonZeroUsize::new(threads).unwrap();
    config
}

fn sorted(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort();
    matches
}

#[test]
fn test_match_correctness() -> Result<()> {
    let dir = tempdir()?;
    let mut file = File::create(dir.path().join("app.log"))?;
    writeln!(file, "abc")?;
    writeln!(file, "login by 99 here")?;
    writeln!(file, "xyz")?;

    let config = config_for(dir.path(), "login by 99", 4);
    let report = run_scan(&config, None)?;

    let matches = report.outcome.matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].file_name, "app.log");
    assert_eq!(matches[0].line_number, 2);
    assert_eq!(matches[0].line_content, "login by 99 here");
    Ok(())
}

#[test]
fn test_no_false_positives_and_no_results_output() -> Result<()> {
    let dir = tempdir()?;
    write_corpus(dir.path(), 5, &[])?;

    let config = config_for(dir.path(), "absent keyword", 4);
    let report = run_scan(&config, None)?;

    assert!(report.outcome.is_empty());
    assert_eq!(report.summary.matches_found, 0);

    let output = fs::read_to_string(&config.output_path)?;
    assert_eq!(output, "No results found for keyword: absent keyword\n");
    Ok(())
}

#[test]
fn test_worker_counts_yield_identical_match_sets() -> Result<()> {
    let dir = tempdir()?;
    let positions: Vec<(usize, u64)> = (0..30).map(|i| (i % 10, (i as u64 % 50) + 1)).collect();
    write_corpus(dir.path(), 10, &positions)?;

    let mut baseline = None;
    for threads in [1, 4, 64] {
        let mut config = config_for(dir.path(), "login by 99", threads);
        // Keep the result file out of the scanned set.
        config.file_prefix = Some("log_".to_string());
        let report = run_scan(&config, None)?;
        let matches = sorted(report.outcome.matches().to_vec());

        match &baseline {
            None => baseline = Some(matches),
            Some(expected) => assert_eq!(
                &matches, expected,
                "worker count {threads} changed the match set"
            ),
        }
    }
    assert!(!baseline.unwrap().is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_does_not_abort_the_run() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    write_corpus(dir.path(), 4, &[(0, 1), (1, 2), (2, 3), (3, 4)])?;

    let locked = dir.path().join("log_001.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    let mut config = config_for(dir.path(), "login by 99", 2);
    config.file_prefix = Some("log_".to_string());
    let report = run_scan(&config, None)?;

    // Restore so the tempdir can be cleaned up.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;

    assert_eq!(report.summary.files_failed, 1);
    assert_eq!(report.summary.files_scanned, 3);
    let names: Vec<_> = report
        .outcome
        .matches()
        .iter()
        .map(|m| m.file_name.as_str())
        .collect();
    assert!(names.contains(&"log_000.txt"));
    assert!(names.contains(&"log_002.txt"));
    assert!(names.contains(&"log_003.txt"));
    assert!(!names.contains(&"log_001.txt"));
    Ok(())
}

#[test]
fn test_output_overwrites_previous_run() -> Result<()> {
    let dir = tempdir()?;
    write_corpus(dir.path(), 3, &[(0, 5), (1, 6)])?;

    let mut config = config_for(dir.path(), "login by 99", 4);
    config.file_prefix = Some("log_".to_string());

    run_scan(&config, None)?;
    let first = fs::read_to_string(&config.output_path)?;

    run_scan(&config, None)?;
    let second = fs::read_to_string(&config.output_path)?;

    assert_eq!(first.lines().count(), 2);
    assert_eq!(second.lines().count(), 2, "output appended instead of overwritten");
    Ok(())
}

#[test]
fn test_prefix_filter_limits_the_scan() -> Result<()> {
    let dir = tempdir()?;
    write_corpus(dir.path(), 2, &[(0, 1), (1, 1)])?;
    let mut other = File::create(dir.path().join("notes.txt"))?;
    writeln!(other, "login by 99 in an unrelated file")?;

    let mut config = config_for(dir.path(), "login by 99", 4);
    config.file_prefix = Some("log_".to_string());
    let report = run_scan(&config, None)?;

    assert_eq!(report.summary.files_scanned, 2);
    assert!(report
        .outcome
        .matches()
        .iter()
        .all(|m| m.file_name.starts_with("log_")));
    Ok(())
}

#[test]
fn test_events_report_every_phase() -> Result<()> {
    let dir = tempdir()?;
    write_corpus(dir.path(), 6, &[(2, 10)])?;

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut config = config_for(dir.path(), "login by 99", 3);
    config.file_prefix = Some("log_".to_string());
    run_scan(&config, Some(tx))?;

    let events: Vec<ScanEvent> = rx.iter().collect();
    assert!(matches!(events.first(), Some(ScanEvent::Listed { files: 6 })));
    // ceil(6 / 3) = 2 files per chunk, so all three workers are spawned.
    assert!(events
        .iter()
        .any(|e| matches!(e, ScanEvent::Started { workers: 3 })));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, ScanEvent::WorkerFinished { .. }))
            .count(),
        3
    );
    assert!(matches!(
        events.last(),
        Some(ScanEvent::Completed { summary }) if summary.matches_found == 1
    ));
    Ok(())
}

#[test]
fn test_generate_then_scan_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let logs = dir.path().join("logs");

    let mut gen_config = GenerateConfig::new(&logs, 8, 2000);
    gen_config.thread_count = NonZeroUsize::new(4).unwrap();
    let gen_summary = run_generate(&gen_config, None)?;
    assert_eq!(gen_summary.files_written, 8);

    let mut scan_config = ScanConfig::new(&logs, "login by 99");
    scan_config.file_prefix = Some("log_".to_string());
    scan_config.output_path = dir.path().join("results.txt");
    scan_config.thread_count = NonZeroUsize::new(4).unwrap();
    let report = run_scan(&scan_config, None)?;

    assert_eq!(report.summary.files_scanned, 8);
    // Every reported match really contains the keyword.
    for m in report.outcome.matches() {
        assert!(m.line_content.contains("login by 99"));
        assert!(m.file_name.starts_with("log_"));
    }
    // The output file agrees with the report.
    let output = fs::read_to_string(&scan_config.output_path)?;
    if report.outcome.is_empty() {
        assert!(output.starts_with("No results found"));
    } else {
        assert_eq!(output.lines().count(), report.summary.matches_found);
    }
    Ok(())
}
