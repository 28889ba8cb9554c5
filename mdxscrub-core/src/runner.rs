//! runner.rs - Drives a whole-corpus pass and aggregates statistics.
//!
//! The runner owns all mutable state for one pass (`RunStats`) and treats
//! every per-document problem as local: a bad document is logged, recorded
//! as a failure, and skipped, never aborting the run or corrupting the
//! aggregate counts of other documents. Persistence goes through the
//! `DocumentSink` seam so callers decide where (and whether) bytes land.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::engine::Sanitizer;

/// Whether a run persists modified documents or only reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compute and report would-be changes without writing anything.
    DryRun,
    /// Persist every modified document via the sink.
    Apply,
}

/// Write-back collaborator for modified documents. Full overwrite per call;
/// invoked once per modified document in apply mode, never for unmodified
/// ones.
pub trait DocumentSink {
    fn write(&mut self, path: &Path, text: &str) -> std::io::Result<()>;
}

/// A document the run could not process, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate statistics for one corpus pass. Created fresh per run, mutated
/// only by the runner, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Documents the run looked at, including ones that failed.
    pub files_processed: usize,
    /// Documents whose text actually differs from the input (and, in apply
    /// mode, were successfully written).
    pub files_modified: usize,
    /// Cumulative per-rule match counts across the corpus.
    pub per_rule_hits: BTreeMap<String, usize>,
    /// Paths that were (or, in dry-run mode, would have been) modified, in
    /// processing order.
    pub modified_paths: Vec<PathBuf>,
    /// Per-document failures, in processing order.
    pub failures: Vec<RunFailure>,
}

/// Iterates a corpus, sanitizing each document and merging statistics.
#[derive(Debug)]
pub struct CorpusRunner<'a> {
    sanitizer: &'a Sanitizer,
    mode: RunMode,
}

impl<'a> CorpusRunner<'a> {
    pub fn new(sanitizer: &'a Sanitizer, mode: RunMode) -> Self {
        Self { sanitizer, mode }
    }

    /// Processes `sources` in the order supplied, writing modified
    /// documents to `sink` in apply mode.
    ///
    /// Each source pairs a path with the result of reading it, so read
    /// failures flow through the same per-document failure handling as
    /// sanitize and write failures.
    pub fn run<I, S>(&self, sources: I, sink: &mut S) -> RunStats
    where
        I: IntoIterator<Item = (PathBuf, std::io::Result<String>)>,
        S: DocumentSink + ?Sized,
    {
        let mut stats = RunStats::default();

        for (path, read_result) in sources {
            stats.files_processed += 1;

            let text = match read_result {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    stats.failures.push(RunFailure {
                        path,
                        message: format!("read failed: {}", e),
                    });
                    continue;
                }
            };

            let outcome = match self.sanitizer.sanitize(&text) {
                Ok(outcome) => outcome,
                Err(e) => {
                    // The document reverts to its on-disk text: nothing is
                    // persisted and its partial hits are not merged.
                    warn!("Failed to sanitize {}: {}", path.display(), e);
                    stats.failures.push(RunFailure {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            for (rule_name, count) in outcome.hits {
                *stats.per_rule_hits.entry(rule_name).or_insert(0) += count;
            }

            if !outcome.modified {
                debug!("No changes needed for {}.", path.display());
                continue;
            }

            match self.mode {
                RunMode::DryRun => {
                    info!("Would modify {}.", path.display());
                    stats.files_modified += 1;
                    stats.modified_paths.push(path);
                }
                RunMode::Apply => match sink.write(&path, &outcome.text) {
                    Ok(()) => {
                        info!("Modified {}.", path.display());
                        stats.files_modified += 1;
                        stats.modified_paths.push(path);
                    }
                    Err(e) => {
                        warn!("Failed to write {}: {}", path.display(), e);
                        stats.failures.push(RunFailure {
                            path,
                            message: format!("write failed: {}", e),
                        });
                    }
                },
            }
        }

        info!(
            "Corpus run complete: {} processed, {} modified, {} failed.",
            stats.files_processed,
            stats.files_modified,
            stats.failures.len()
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CleanupRule, RuleConfig};
    use std::collections::HashMap;
    use std::io;

    /// In-memory sink capturing every write.
    #[derive(Debug, Default)]
    struct MemorySink {
        written: HashMap<PathBuf, String>,
    }

    impl DocumentSink for MemorySink {
        fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
            self.written.insert(path.to_path_buf(), text.to_string());
            Ok(())
        }
    }

    /// Sink that refuses one specific path.
    #[derive(Debug, Default)]
    struct PickySink {
        reject: Option<PathBuf>,
        written: HashMap<PathBuf, String>,
    }

    impl DocumentSink for PickySink {
        fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
            if self.reject.as_deref() == Some(path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.written.insert(path.to_path_buf(), text.to_string());
            Ok(())
        }
    }

    fn strip_x_sanitizer() -> Sanitizer {
        let rule = CleanupRule {
            name: "strip_x".to_string(),
            pattern: Some("x".to_string()),
            ..Default::default()
        };
        Sanitizer::new(&RuleConfig { rules: vec![rule] }).unwrap()
    }

    fn sources(docs: &[(&str, &str)]) -> Vec<(PathBuf, io::Result<String>)> {
        docs.iter()
            .map(|(p, t)| (PathBuf::from(p), Ok(t.to_string())))
            .collect()
    }

    #[test_log::test]
    fn dry_run_and_apply_report_identical_stats() {
        let sanitizer = strip_x_sanitizer();
        let docs = [("a.mdx", "xx keep"), ("b.mdx", "clean"), ("c.mdx", "x")];

        let mut dry_sink = MemorySink::default();
        let dry = CorpusRunner::new(&sanitizer, RunMode::DryRun).run(sources(&docs), &mut dry_sink);

        let mut apply_sink = MemorySink::default();
        let apply =
            CorpusRunner::new(&sanitizer, RunMode::Apply).run(sources(&docs), &mut apply_sink);

        assert_eq!(dry, apply);
        assert!(dry_sink.written.is_empty());
        assert_eq!(apply_sink.written.len(), 2);
        assert_eq!(apply.files_processed, 3);
        assert_eq!(apply.files_modified, 2);
        assert_eq!(apply.per_rule_hits.get("strip_x"), Some(&3));
    }

    #[test]
    fn modified_paths_are_in_processing_order() {
        let sanitizer = strip_x_sanitizer();
        let docs = [("z.mdx", "x"), ("a.mdx", "x"), ("m.mdx", "clean")];
        let mut sink = MemorySink::default();
        let stats = CorpusRunner::new(&sanitizer, RunMode::DryRun).run(sources(&docs), &mut sink);
        assert_eq!(
            stats.modified_paths,
            vec![PathBuf::from("z.mdx"), PathBuf::from("a.mdx")]
        );
    }

    #[test]
    fn read_failure_is_recorded_and_run_continues() {
        let sanitizer = strip_x_sanitizer();
        let sources: Vec<(PathBuf, io::Result<String>)> = vec![
            (
                PathBuf::from("bad.mdx"),
                Err(io::Error::new(io::ErrorKind::NotFound, "gone")),
            ),
            (PathBuf::from("good.mdx"), Ok("x".to_string())),
        ];

        let mut sink = MemorySink::default();
        let stats = CorpusRunner::new(&sanitizer, RunMode::Apply).run(sources, &mut sink);

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_modified, 1);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].path, PathBuf::from("bad.mdx"));
        assert!(sink.written.contains_key(Path::new("good.mdx")));
    }

    #[test]
    fn failing_document_does_not_disturb_other_stats_or_its_own_text() {
        // An inflating replacement trips the engine's growth cap on one
        // document; the other documents' stats must be unaffected and the
        // failing document must never reach the sink.
        let big = "y".repeat(8192);
        let rules = vec![
            CleanupRule {
                name: "inflate".to_string(),
                pattern: Some("BOOM".to_string()),
                replace_with: big,
                ..Default::default()
            },
            CleanupRule {
                name: "strip_x".to_string(),
                pattern: Some("x".to_string()),
                ..Default::default()
            },
        ];
        let sanitizer = Sanitizer::new(&RuleConfig { rules }).unwrap();

        let docs = [("ok1.mdx", "x"), ("bad.mdx", "BOOM x"), ("ok2.mdx", "xx")];
        let mut sink = MemorySink::default();
        let stats = CorpusRunner::new(&sanitizer, RunMode::Apply).run(sources(&docs), &mut sink);

        assert_eq!(stats.files_processed, 3);
        assert_eq!(stats.files_modified, 2);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].path, PathBuf::from("bad.mdx"));
        // The failed document's hits never reach the aggregate.
        assert_eq!(stats.per_rule_hits.get("strip_x"), Some(&3));
        assert!(stats.per_rule_hits.get("inflate").is_none());
        assert!(!sink.written.contains_key(Path::new("bad.mdx")));
    }

    #[test]
    fn write_failure_is_excluded_from_files_modified() {
        let sanitizer = strip_x_sanitizer();
        let docs = [("locked.mdx", "x"), ("open.mdx", "x")];
        let mut sink = PickySink {
            reject: Some(PathBuf::from("locked.mdx")),
            ..Default::default()
        };
        let stats = CorpusRunner::new(&sanitizer, RunMode::Apply).run(sources(&docs), &mut sink);

        assert_eq!(stats.files_modified, 1);
        assert_eq!(stats.failures.len(), 1);
        assert!(stats.failures[0].message.contains("write failed"));
        // The sanitization itself was real, so its hits still count.
        assert_eq!(stats.per_rule_hits.get("strip_x"), Some(&2));
    }
}
