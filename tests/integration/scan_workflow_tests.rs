/*!
 * Integration tests for the end-to-end scan workflow
 */

use std::fs;
use anyhow::Result;
use tokio_test;
use codesift::app_config::Config;
use codesift::app_controller::{render_segments, Controller, OutputFormat};
use codesift::errors::ScanError;
use codesift::keyword_matcher::KeywordMatcher;
use codesift::segment_scanner::{scan_file, CodeSegment, ScanOptions};
use crate::common;

fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn default_matcher() -> Result<KeywordMatcher> {
    let languages = vec!["c".to_string(), "cpp".to_string(), "java".to_string()];
    Ok(KeywordMatcher::from_languages(&languages, &[])?)
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert!(controller.is_initialized());

    Ok(())
}

/// Test that scanning the mixed log fixture finds the embedded code block
#[test]
fn test_scan_file_withMixedLog_shouldFindCodeBlock() -> Result<()> {
    init_test_logging();

    let temp_dir = common::create_temp_dir()?;
    let log_path = common::create_test_log(&temp_dir.path().to_path_buf(), "mixed.log")?;
    let matcher = default_matcher()?;

    let segments = scan_file(&log_path, &matcher, &ScanOptions::default())?;

    // The keyword cluster pulls the trigger on the very first full window,
    // then growth runs until the second keyword-free log line
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start_line, 1);
    assert_eq!(segments[0].end_line, 9);
    assert_eq!(segments[0].lines.len(), 9);
    assert_eq!(segments[0].lines[2], "int main(void) {");

    Ok(())
}

/// Test that scanning a missing file surfaces a source error
#[test]
fn test_scan_file_withMissingFile_shouldReturnSourceError() -> Result<()> {
    let matcher = default_matcher()?;

    let result = scan_file("definitely/not/there.log", &matcher, &ScanOptions::default());

    assert!(matches!(result, Err(ScanError::Source(_))));
    Ok(())
}

/// Test that scanning the same file twice yields identical reports
#[test]
fn test_scan_file_withSameFileTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = common::create_test_log(&temp_dir.path().to_path_buf(), "mixed.log")?;
    let matcher = default_matcher()?;

    let first = scan_file(&log_path, &matcher, &ScanOptions::default())?;
    let second = scan_file(&log_path, &matcher, &ScanOptions::default())?;

    assert_eq!(first, second);
    Ok(())
}

/// Test the single-file workflow writing a JSON report to disk
#[tokio::test]
async fn test_controller_run_withOutputFile_shouldWriteJsonReport() -> Result<()> {
    init_test_logging();

    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let log_path = common::create_test_log(&temp_dir.path().to_path_buf(), "mixed.log")?;
    let report_path = temp_dir.path().join("report.json");

    controller
        .run(log_path, Some(report_path.clone()), OutputFormat::Json)
        .await?;

    let report = fs::read_to_string(&report_path)?;
    let segments: Vec<CodeSegment> = serde_json::from_str(&report)?;
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start_line, 1);
    assert_eq!(segments[0].end_line, 9);

    Ok(())
}

/// Test that a missing input file fails the single-file workflow
#[test]
fn test_controller_run_withMissingInput_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;

    let result = tokio_test::block_on(controller.run(
        temp_dir.path().join("missing.log"),
        None,
        OutputFormat::Json,
    ));

    assert!(result.is_err());
    Ok(())
}

/// Test the directory workflow writing one report next to each input
#[tokio::test]
async fn test_controller_run_folder_withLogFiles_shouldWriteReports() -> Result<()> {
    init_test_logging();

    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_log(&dir, "a.log")?;
    common::create_test_log(&dir, "b.log")?;

    controller.run_folder(dir.clone(), false).await?;

    let report_a = dir.join("a.segments.json");
    let report_b = dir.join("b.segments.json");
    assert!(report_a.exists());
    assert!(report_b.exists());

    let segments: Vec<CodeSegment> = serde_json::from_str(&fs::read_to_string(&report_a)?)?;
    assert_eq!(segments.len(), 1);

    Ok(())
}

/// Test that existing reports are skipped unless overwrite is forced
#[tokio::test]
async fn test_controller_run_folder_withExistingReport_shouldSkipUnlessForced() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_log(&dir, "a.log")?;

    controller.run_folder(dir.clone(), false).await?;

    // Scribble over the report; a non-forced run must leave it alone
    let report_path = dir.join("a.segments.json");
    fs::write(&report_path, "scribble")?;
    controller.run_folder(dir.clone(), false).await?;
    assert_eq!(fs::read_to_string(&report_path)?, "scribble");

    // A forced run regenerates the report
    controller.run_folder(dir.clone(), true).await?;
    let segments: Vec<CodeSegment> = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(segments.len(), 1);

    Ok(())
}

/// Test that a directory without candidate files fails loudly
#[tokio::test]
async fn test_controller_run_folder_withNoMatchingFiles_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;

    let result = controller.run_folder(temp_dir.path().to_path_buf(), false).await;

    assert!(result.is_err());
    Ok(())
}

/// Test the plain-text rendering layout
#[test]
fn test_render_segments_withTextFormat_shouldMatchPlainLayout() -> Result<()> {
    let segment = CodeSegment {
        start_line: 3,
        end_line: 5,
        lines: vec![
            "int x = 0;".to_string(),
            "return x;".to_string(),
            "".to_string(),
        ],
    };

    let rendered = render_segments(&[segment], OutputFormat::Text)?;

    assert!(rendered.starts_with("3~5\n"));
    assert!(rendered.contains("int x = 0;\n"));
    assert!(rendered.contains(&"=".repeat(40)));

    Ok(())
}

/// Test that custom scan settings flow through the controller
#[tokio::test]
async fn test_controller_run_withTopNSetting_shouldTruncateReport() -> Result<()> {
    let mut config = Config::default();
    config.scan.top_n = 1;
    let controller = Controller::with_config(config)?;

    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let content = "\
int a;
int b;
int c;
plain one
plain two
int d; int e;
int f; int g;
int h;
plain three
plain four
";
    let log_path = common::create_test_file(&dir, "two_blocks.log", content)?;
    let report_path = dir.join("report.json");

    controller
        .run(log_path, Some(report_path.clone()), OutputFormat::Json)
        .await?;

    let segments: Vec<CodeSegment> = serde_json::from_str(&fs::read_to_string(&report_path)?)?;
    assert_eq!(segments.len(), 1);
    // The denser later block wins the single report slot
    assert_eq!(segments[0].start_line, 6);

    Ok(())
}
