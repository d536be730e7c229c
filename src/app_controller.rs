use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::keyword_matcher::KeywordMatcher;
use crate::segment_scanner::{self, CodeSegment, ScanOptions};

// @module: Application controller for code-segment scanning

/// Extension appended to an input file's stem for its report in directory mode
const REPORT_EXTENSION: &str = "segments.json";

/// Upper bound on scans in flight in directory mode
const MAX_CONCURRENT_SCANS: usize = 4;

/// Output rendering for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of segments
    Json,
    /// Plain-text rendering: `start~end`, the lines, then a separator
    Text,
}

/// Main application controller for log scanning
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Immutable matcher shared across all scans
    matcher: Arc<KeywordMatcher>,

    // @field: Core options mirrored from the configuration
    options: ScanOptions,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        // Validate before any file is touched
        config.validate().context("Configuration validation failed")?;

        // The vocabulary is merged exactly once; every scan shares the matcher
        let matcher = KeywordMatcher::from_languages(&config.languages, &config.extra_keywords)
            .context("Failed to build keyword matcher")?;
        let options = config.scan.to_options();

        Ok(Self {
            config,
            matcher: Arc::new(matcher),
            options,
        })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.matcher.vocabulary().is_empty()
    }

    /// Scan a single file synchronously and return its segments
    pub fn scan_path(&self, input_file: &Path) -> Result<Vec<CodeSegment>> {
        let segments = segment_scanner::scan_file(input_file, &self.matcher, &self.options)
            .with_context(|| format!("Failed to scan {:?}", input_file))?;
        debug!("{:?}: {} segment(s)", input_file, segments.len());
        Ok(segments)
    }

    /// Run the main workflow over one input file.
    ///
    /// The scan itself is synchronous and runs on the blocking pool; the
    /// rendered report goes to stdout unless an output path is given.
    pub async fn run(&self, input_file: PathBuf, output: Option<PathBuf>, format: OutputFormat) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input file exists
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let matcher = Arc::clone(&self.matcher);
        let options = self.options.clone();
        let scan_target = input_file.clone();
        let segments = tokio::task::spawn_blocking(move || {
            segment_scanner::scan_file(&scan_target, &matcher, &options)
        })
        .await
        .context("Scan task panicked")??;

        info!(
            "Found {} code-like segment(s) in {:?} in {} ms",
            segments.len(),
            input_file,
            start_time.elapsed().as_millis()
        );

        let rendered = render_segments(&segments, format)?;
        match output {
            Some(path) => {
                FileManager::write_to_file(&path, &rendered)?;
                info!("Report written to {:?}", path);
            }
            None => println!("{}", rendered),
        }

        Ok(())
    }

    /// Scan every candidate file under a directory, writing one JSON report
    /// next to each input. Per-file failures are logged and counted; they do
    /// not abort the batch.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input directory exists
        if !input_dir.exists() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Find all candidate files in the directory (recursive)
        let mut candidate_files = Vec::new();
        for ext in &self.config.file_extensions {
            let mut files = FileManager::find_files(&input_dir, ext)?;
            candidate_files.append(&mut files);
        }
        candidate_files.sort();
        candidate_files.dedup();

        // If no candidate files found, return error
        if candidate_files.is_empty() {
            return Err(anyhow::anyhow!(
                "No files matching extensions {:?} found in directory: {:?}",
                self.config.file_extensions,
                input_dir
            ));
        }

        // Create a progress bar for folder processing
        let folder_pb = ProgressBar::new(candidate_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Scanning files");

        // Track success and failure counts
        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        // Partition out files whose report already exists
        let mut pending = Vec::new();
        for file in candidate_files {
            let report_path = Self::report_path_for(&file, &input_dir);
            if report_path.exists() && !force_overwrite {
                warn!("Skipping file, report already exists (use -f to force overwrite): {:?}", report_path);
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }
            pending.push((file, report_path));
        }

        // Scan the remaining files with a bounded number in flight
        let results = stream::iter(pending.into_iter().enumerate())
            .map(|(index, (file, report_path))| {
                let matcher = Arc::clone(&self.matcher);
                let options = self.options.clone();
                let pb = folder_pb.clone();

                async move {
                    let scan_target = file.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        segment_scanner::scan_file(&scan_target, &matcher, &options)
                    })
                    .await
                    .context("Scan task panicked")
                    .and_then(|scanned| scanned.map_err(anyhow::Error::from));

                    pb.inc(1);
                    (index, file, report_path, result)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_SCANS)
            .collect::<Vec<_>>()
            .await;

        // Sort results by index to report in discovery order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(index, ..)| *index);

        for (_, file, report_path, result) in sorted_results {
            match result {
                Ok(segments) => {
                    let rendered = render_segments(&segments, OutputFormat::Json)?;
                    FileManager::write_to_file(&report_path, &rendered)?;
                    debug!("{:?}: {} segment(s) -> {:?}", file, segments.len(), report_path);
                    success_count += 1;
                }
                Err(e) => {
                    error!("Error scanning file {:?}: {}", file, e);
                    error_count += 1;
                }
            }
        }

        // Finish the folder progress bar
        folder_pb.finish_with_message("Folder scan complete");

        // Give summary results - important for batch operations
        let duration = start_time.elapsed();
        info!(
            "Folder scan completed: {} processed, {} skipped, {} errors in {} ms",
            success_count,
            skip_count,
            error_count,
            duration.as_millis()
        );

        Ok(())
    }

    /// Report path for an input file: `<stem>.segments.json` beside the input
    fn report_path_for(input_file: &Path, fallback_dir: &Path) -> PathBuf {
        let output_dir = input_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| fallback_dir.to_path_buf());
        FileManager::generate_output_path(input_file, output_dir, REPORT_EXTENSION)
    }
}

/// Render segments in the requested output format
pub fn render_segments(segments: &[CodeSegment], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(segments).context("Failed to serialize segments to JSON")
        }
        OutputFormat::Text => {
            let mut rendered = String::new();
            for segment in segments {
                rendered.push_str(&format!("{}~{}\n", segment.start_line, segment.end_line));
                for line in &segment.lines {
                    rendered.push_str(line);
                    rendered.push('\n');
                }
                rendered.push_str(&"=".repeat(40));
                rendered.push('\n');
            }
            Ok(rendered)
        }
    }
}
