//! CLI output formatting for all pipeline stages.
//!
//! Progress is plain line-oriented text on stdout:
//!
//! ```text
//! Scanning directory: releases
//! Found file: demo-v1.2.0-linux.tar.gz
//! Found file: demo-v1.3.0-linux.tar.gz
//! Warning: File notes.tar.gz doesn't match the expected pattern
//!
//! Latest versions
//! 001 demo-linux
//!     Latest: demo-v1.3.0-linux.tar.gz (1.3.0, 2 candidates)
//!     Redirect: /demo-linux/latest
//!
//! Generated out/versions.json
//! Generated out/_redirects
//! out/index.html already exists, skipping...
//! ```
//!
//! Groups follow the header + indented context line pattern: the header is
//! the heading the download page will show for the group.
//!
//! Each stage has a `format_*` function returning `Vec<String>`. Format
//! functions are pure; the pipeline hands their lines to a progress sink,
//! which the binary prints to stdout.

use crate::config::{DisplayName, display_name};
use crate::generate::{ArtifactStatus, GenerateReport};
use crate::resolve::Resolution;
use crate::scan::{ScanEvent, ScanResult};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn format_scan_header(dir: &Path) -> String {
    format!("Scanning directory: {}", dir.display())
}

/// One line per archive, in listing order.
pub fn format_scan_output(result: &ScanResult) -> Vec<String> {
    result
        .events
        .iter()
        .map(|event| match event {
            ScanEvent::Found(f) => format!("Found file: {f}"),
            ScanEvent::Skipped(f) => {
                format!("Warning: File {f} doesn't match the expected pattern")
            }
            ScanEvent::NotUnicode(f) => {
                format!("Warning: File {f} has a name that is not valid UTF-8, skipping")
            }
        })
        .collect()
}

pub fn format_resolve_output(
    resolution: &Resolution,
    display_names: &[DisplayName],
) -> Vec<String> {
    let mut lines = vec![String::new(), "Latest versions".to_string()];
    for (i, group) in resolution.groups.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            display_name(&group.key, display_names)
        ));
        lines.push(format!(
            "{}Latest: {} ({}, {})",
            indent(1),
            group.filename,
            group.latest,
            plural(group.candidates, "candidate")
        ));
        lines.push(format!("{}Redirect: /{}/latest", indent(1), group.key));
    }
    lines.push(String::new());
    lines
}

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    report
        .artifacts
        .iter()
        .map(|a| match a.status {
            ArtifactStatus::Written => format!("Generated {}", a.path.display()),
            ArtifactStatus::Skipped => {
                format!("{} already exists, skipping...", a.path.display())
            }
        })
        .collect()
}

pub fn format_nothing_to_do() -> String {
    "No valid .tar.gz files found in the specified directory".to_string()
}
