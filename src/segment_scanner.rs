/*!
 * Streaming extraction of code-like segments from mixed text/log input.
 *
 * The scanner reads lines exactly once, keeps a bounded trailing window of
 * recent lines with their keyword-hit counts, and opens a candidate segment
 * whenever the window's summed hit count reaches a threshold. A triggered
 * segment grows line-by-line under length and blank-run caps, passes an
 * acceptance filter, and finally the accepted segments are ranked by total
 * keyword hits. Memory stays bounded by the window size plus the segment
 * currently being grown; the whole input is never buffered.
 */

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::ScanError;
use crate::keyword_matcher::KeywordMatcher;

/// Tuning parameters for a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Number of lines considered together for the trigger decision
    pub window_size: usize,

    /// Minimum summed keyword-hit count within one window to open a segment
    pub keyword_threshold: usize,

    /// Hard cap on lines per segment
    pub max_segment_length: usize,

    /// Consecutive zero-hit lines allowed before growth stops
    pub max_blank_lines: usize,

    /// Minimum count of hit-carrying lines required to accept a segment
    pub min_keyword_lines: usize,

    /// Maximum number of segments returned after ranking; 0 means unlimited
    pub top_n: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            window_size: 5,
            keyword_threshold: 3,
            max_segment_length: 20,
            max_blank_lines: 2,
            min_keyword_lines: 2,
            top_n: 0,
        }
    }
}

impl ScanOptions {
    /// Reject inconsistent or out-of-range option combinations before any
    /// line is read
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.window_size == 0 {
            return Err(ScanError::InvalidOptions(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.keyword_threshold == 0 {
            return Err(ScanError::InvalidOptions(
                "keyword_threshold must be at least 1".to_string(),
            ));
        }
        if self.max_segment_length < self.window_size {
            return Err(ScanError::InvalidOptions(format!(
                "max_segment_length ({}) must not be smaller than window_size ({})",
                self.max_segment_length, self.window_size
            )));
        }
        Ok(())
    }
}

/// One line of input with its 1-based number and keyword-hit count
#[derive(Debug, Clone)]
pub struct LineRecord {
    /// 1-based line number in the source
    pub number: usize,

    /// Line text with the terminator stripped
    pub text: String,

    /// Keyword occurrences found in the text
    pub hits: usize,
}

/// Bounded trailing buffer of the most recent lines, with its keyword-hit
/// sum maintained incrementally on append and evict
#[derive(Debug)]
pub struct SlidingWindow {
    records: VecDeque<LineRecord>,
    hit_sum: usize,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        SlidingWindow {
            records: VecDeque::with_capacity(capacity),
            hit_sum: 0,
            capacity,
        }
    }

    /// Append a record at the tail. The scan protocol only appends below
    /// capacity; eviction is an explicit step
    pub fn push(&mut self, record: LineRecord) {
        debug_assert!(self.records.len() < self.capacity);
        self.hit_sum += record.hits;
        self.records.push_back(record);
    }

    /// Drop the oldest record, keeping the running sum in step
    pub fn evict_oldest(&mut self) -> Option<LineRecord> {
        let evicted = self.records.pop_front();
        if let Some(record) = &evicted {
            self.hit_sum -= record.hits;
        }
        evicted
    }

    /// Take the entire window contents, leaving it empty
    pub fn drain(&mut self) -> Vec<LineRecord> {
        self.hit_sum = 0;
        self.records.drain(..).collect()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summed keyword hits over the records currently held
    pub fn hit_sum(&self) -> usize {
        self.hit_sum
    }
}

/// A finished (grown, not yet filtered) candidate segment
#[derive(Debug)]
pub struct GrownSegment {
    /// 1-based line number of the first record
    pub start_line: usize,

    /// The segment's lines in source order
    pub records: Vec<LineRecord>,
}

impl GrownSegment {
    /// Total keyword hits across all lines
    pub fn total_hits(&self) -> usize {
        self.records.iter().map(|r| r.hits).sum()
    }

    /// Count of lines carrying at least one keyword hit
    pub fn keyword_line_count(&self) -> usize {
        self.records.iter().filter(|r| r.hits > 0).count()
    }

    fn finalize(self) -> CodeSegment {
        let end_line = self.start_line + self.records.len() - 1;
        CodeSegment {
            start_line: self.start_line,
            end_line,
            lines: self.records.into_iter().map(|r| r.text).collect(),
        }
    }
}

/// An accepted segment paired with its ranking key. The hit total never
/// appears in the emitted output
#[derive(Debug)]
pub struct RankedSegment {
    pub segment: CodeSegment,
    pub keyword_hits: usize,
}

/// A contiguous run of lines judged likely to be source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSegment {
    pub start_line: usize,
    pub end_line: usize,
    pub lines: Vec<String>,
}

/// Scan a finite line source and return the ranked code-like segments.
///
/// Lines are consumed exactly once and never rewound. A source that ends
/// while the window holds fewer than `window_size` lines discards those
/// buffered lines without evaluating them, so a file shorter than one full
/// window can never produce a segment. Source I/O errors (including invalid
/// encoding surfaced by the source) propagate unchanged; any partially built
/// window or segment is discarded, never emitted.
pub fn scan<I>(
    lines: I,
    matcher: &KeywordMatcher,
    options: &ScanOptions,
) -> Result<Vec<CodeSegment>, ScanError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    options.validate()?;

    let mut source = lines.into_iter();
    let mut window = SlidingWindow::new(options.window_size);
    let mut accepted: Vec<RankedSegment> = Vec::new();
    let mut next_line_number: usize = 1;

    while let Some(line) = source.next() {
        let text = line?;
        let hits = matcher.count_hits(&text);
        window.push(LineRecord {
            number: next_line_number,
            text,
            hits,
        });
        next_line_number += 1;

        if !window.is_full() {
            continue;
        }

        if window.hit_sum() >= options.keyword_threshold {
            let hit_sum = window.hit_sum();
            // The entire window becomes the initial segment content and the
            // window restarts from empty once growth has finished
            let initial = window.drain();
            debug!(
                "Window triggered at line {} (hit sum {})",
                initial[0].number, hit_sum
            );

            let grown = grow_segment(initial, &mut source, matcher, options, &mut next_line_number)?;
            match accept_segment(grown, options.min_keyword_lines) {
                Some(ranked) => {
                    debug!(
                        "Accepted segment {}-{} with {} keyword hits",
                        ranked.segment.start_line, ranked.segment.end_line, ranked.keyword_hits
                    );
                    accepted.push(ranked);
                }
                None => debug!("Discarded segment below the keyword-line minimum"),
            }
        } else {
            window.evict_oldest();
        }
    }

    // A tail shorter than one full window is dropped unevaluated
    Ok(rank_segments(accepted, options.top_n))
}

/// Scan lines from any buffered reader
pub fn scan_reader<R: BufRead>(
    reader: R,
    matcher: &KeywordMatcher,
    options: &ScanOptions,
) -> Result<Vec<CodeSegment>, ScanError> {
    scan(reader.lines(), matcher, options)
}

/// Open a file and scan it; the handle is released on every exit path
pub fn scan_file<P: AsRef<Path>>(
    path: P,
    matcher: &KeywordMatcher,
    options: &ScanOptions,
) -> Result<Vec<CodeSegment>, ScanError> {
    let file = File::open(path.as_ref())?;
    scan_reader(BufReader::new(file), matcher, options)
}

/// Extend a triggered segment line-by-line until the blank-run cap, the
/// length cap, or the end of input stops it. Lines already appended are
/// never retracted, so trailing zero-hit lines stay in the segment.
fn grow_segment<I>(
    initial: Vec<LineRecord>,
    source: &mut I,
    matcher: &KeywordMatcher,
    options: &ScanOptions,
    next_line_number: &mut usize,
) -> Result<GrownSegment, ScanError>
where
    I: Iterator<Item = io::Result<String>>,
{
    let start_line = initial[0].number;
    let mut records = initial;

    // The handed-off window content seeds the counter with its own trailing
    // zero-hit streak, tracked the same way as growth below
    let mut blank_run = records.iter().rev().take_while(|r| r.hits == 0).count();

    while records.len() < options.max_segment_length && blank_run < options.max_blank_lines {
        let Some(line) = source.next() else {
            break;
        };
        let text = line?;
        let hits = matcher.count_hits(&text);
        records.push(LineRecord {
            number: *next_line_number,
            text,
            hits,
        });
        *next_line_number += 1;

        if hits > 0 {
            blank_run = 0;
        } else {
            blank_run += 1;
        }
    }

    Ok(GrownSegment { start_line, records })
}

/// Accept or discard a grown segment. Acceptance requires at least
/// `min_keyword_lines` lines carrying one or more hits; rejection is a
/// normal outcome, not a failure.
pub fn accept_segment(segment: GrownSegment, min_keyword_lines: usize) -> Option<RankedSegment> {
    if segment.keyword_line_count() < min_keyword_lines {
        return None;
    }
    let keyword_hits = segment.total_hits();
    Some(RankedSegment {
        segment: segment.finalize(),
        keyword_hits,
    })
}

/// Order accepted segments by total keyword hits, descending. The sort is
/// stable, so equal totals keep their detection order. A positive `top_n`
/// truncates the ranking; zero returns everything.
pub fn rank_segments(mut accepted: Vec<RankedSegment>, top_n: usize) -> Vec<CodeSegment> {
    accepted.sort_by(|a, b| b.keyword_hits.cmp(&a.keyword_hits));
    if top_n > 0 {
        accepted.truncate(top_n);
    }
    accepted.into_iter().map(|ranked| ranked.segment).collect()
}
