/*!
 * Common test utilities for the codesift test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a mixed log file with one obvious code block for testing
pub fn create_test_log(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "\
2024-03-01 12:00:01 service started
2024-03-01 12:00:02 request handled in 13ms
int main(void) {
    int total = 0;
    for (int i = 0; i < 10; i++) {
        total += i;
    }
    return total;
}
2024-03-01 12:00:03 request handled in 9ms
2024-03-01 12:00:04 worker idle
2024-03-01 12:00:05 worker idle
2024-03-01 12:00:06 worker idle
2024-03-01 12:00:07 worker idle
";
    create_test_file(dir, filename, content)
}
