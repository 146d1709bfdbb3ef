//! Executor for planned rewrite steps.
//!
//! All writes stay inside the caller-supplied build-output tree. A missing
//! expected input means the step does not apply to this variant, so it is
//! skipped and reported, never treated as a failure. Every step is
//! idempotent: re-applying a rule to the same tree leaves the same
//! artifact set behind.

use std::path::Path;

use chisel_util::fs as cfs;

use crate::error::EngineError;
use crate::packaging::{pack_meta_json, PackagingRule, RewriteStep, CLASSES_DIR};

/// What happened when a rule was applied.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Steps that ran, in order.
    pub applied: Vec<String>,
    /// Steps skipped because their input was absent.
    pub skipped: Vec<String>,
}

impl ApplyReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Apply a packaging rule's steps, in order, against a build-output tree.
///
/// # Errors
/// Returns an error on I/O failures other than input absence, or on an
/// invalid rewrite pattern.
pub fn apply_rule(rule: &PackagingRule, out_dir: &Path) -> Result<ApplyReport, EngineError> {
    let mut report = ApplyReport::default();

    for step in &rule.steps {
        match step {
            RewriteStep::Relocate { source, dest } => {
                let source_path = out_dir.join(source);
                match cfs::read_to_string_if_exists(&source_path)? {
                    Some(content) => {
                        cfs::write_text(&out_dir.join(dest), &content)?;
                        cfs::remove_file_if_exists(&source_path)?;
                        report.applied.push(step.to_string());
                    }
                    None => {
                        report.skipped.push(step.to_string());
                    }
                }
            }
            RewriteStep::StripField { path, pattern } => {
                let file_path = out_dir.join(path);
                match cfs::read_to_string_if_exists(&file_path)? {
                    Some(content) => {
                        let re = regex::Regex::new(pattern).map_err(|e| EngineError::Pattern {
                            pattern: pattern.clone(),
                            message: e.to_string(),
                        })?;
                        let stripped = re.replace_all(&content, "");
                        if stripped != content {
                            cfs::write_text(&file_path, &stripped)?;
                        }
                        report.applied.push(step.to_string());
                    }
                    None => {
                        report.skipped.push(step.to_string());
                    }
                }
            }
            RewriteStep::SynthesizePackMeta {
                dest,
                pack_format,
                description,
            } => {
                let json = pack_meta_json(*pack_format, description)?;
                cfs::write_text(&out_dir.join(dest), &json)?;
                report.applied.push(step.to_string());
            }
        }
    }

    Ok(report)
}

/// Write archive manifest attributes into `classes/META-INF/MANIFEST.MF`.
///
/// Existing attributes with other names are preserved; named attributes are
/// replaced. `Manifest-Version: 1.0` is kept as the first entry.
///
/// # Errors
/// Returns an error if the manifest cannot be read or written.
pub fn write_archive_manifest(
    out_dir: &Path,
    attributes: &[(String, String)],
) -> Result<(), EngineError> {
    let path = out_dir.join(CLASSES_DIR).join("META-INF").join("MANIFEST.MF");

    let mut entries: Vec<(String, String)> = Vec::new();
    if let Some(existing) = cfs::read_to_string_if_exists(&path)? {
        for line in existing.lines() {
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if key != "Manifest-Version" {
                    entries.push((key.to_owned(), value.trim().to_owned()));
                }
            }
        }
    }

    for (key, value) in attributes {
        entries.retain(|(k, _)| k != key);
        entries.push((key.clone(), value.clone()));
    }

    let mut content = String::from("Manifest-Version: 1.0\n");
    for (key, value) in &entries {
        content.push_str(&format!("{key}: {value}\n"));
    }
    cfs::write_text(&path, &content)?;
    Ok(())
}
