use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::models::Record;
use crate::tree::{NestedNode, TreeSource};
use crate::utils::{safe_open_file, validate_file_size};

const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Parse a JSONL session file into records, in file order.
///
/// Returns an error if more than 50% of non-empty lines fail to parse, or after
/// 100 consecutive failures.
pub fn parse_records_file(path: &Path) -> Result<Vec<Record>> {
    let file = safe_open_file(path)?;
    validate_file_size(&file, path)?;

    parse_records(BufReader::new(file), &path.display().to_string())
}

/// Parse either session form: a JSONL record log, or a JSON array of nested nodes
/// (detected by a leading `[`).
pub fn parse_session_file(path: &Path) -> Result<TreeSource> {
    let mut file = safe_open_file(path)?;
    validate_file_size(&file, path)?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        let roots: Vec<NestedNode> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse nested session tree: {}", path.display()))?;
        return Ok(TreeSource::Tree(roots));
    }

    parse_records(content.as_bytes(), &path.display().to_string()).map(TreeSource::Records)
}

/// Line-by-line record parsing over any reader; `source` names the input in messages
pub fn parse_records<R: BufRead>(reader: R, source: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut skipped_count = 0;
    let mut total_lines = 0;
    let mut consecutive_errors = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line from {}", source))?;

        if line.trim().is_empty() {
            continue;
        }

        total_lines += 1;

        match serde_json::from_str::<Record>(&line) {
            Ok(record) => {
                records.push(record);
                consecutive_errors = 0;
            }
            Err(e) => {
                warn!(line = line_num + 1, source, "Skipping unparseable record: {}", e);
                skipped_count += 1;
                consecutive_errors += 1;

                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    bail!(
                        "Too many consecutive parse errors ({}) in {} - file may be corrupted",
                        consecutive_errors,
                        source
                    );
                }
            }
        }
    }

    if total_lines > 0 {
        let failure_rate = (skipped_count as f64) / (total_lines as f64);
        if failure_rate > 0.5 {
            bail!(
                "Too many parse failures in {}: {} of {} lines failed ({:.1}%)",
                source,
                skipped_count,
                total_lines,
                failure_rate * 100.0
            );
        }
    }

    if skipped_count > 0 {
        info!(source, records = records.len(), skipped = skipped_count, "Parsed session with skipped lines");
    }

    Ok(records)
}
