/*!
 * # codesift - keyword-density triage for mixed logs
 *
 * A Rust library for heuristically extracting code-like segments from large,
 * unstructured text/log streams.
 *
 * ## Features
 *
 * - Single-pass, bounded-memory streaming scan (the input is never fully
 *   loaded)
 * - Sliding-window trigger on keyword density, with tunable thresholds
 * - Segment growth under length and blank-run caps
 * - Acceptance filtering and density-ranked output
 * - Built-in C/C++/Java keyword vocabularies plus user-supplied keywords
 * - JSON and plain-text report rendering
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `keyword_matcher`: Vocabulary merging and whole-word hit counting
 * - `segment_scanner`: The streaming window/grow/filter/rank core
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * Detection is purely lexical: no parsing, no per-language classification,
 * and no completeness guarantee. False positives are expected and acceptable.
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Add other lints you want to allow but not auto-fix

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod keyword_matcher;
pub mod segment_scanner;

// Re-export main types for easier usage
pub use app_config::{Config, ScanSettings};
pub use app_controller::{Controller, OutputFormat, render_segments};
pub use errors::{AppError, MatcherError, ScanError};
pub use keyword_matcher::KeywordMatcher;
pub use segment_scanner::{scan, scan_file, scan_reader, CodeSegment, ScanOptions};
