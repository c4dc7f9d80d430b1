//! Per-file event collection with cargo-style reporting

use super::codes;
use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe store of error and warning events keyed by program file
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.file_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn contexts(&self) -> MutexGuard<'_, BTreeMap<PathBuf, FileProcessingContext>> {
        self.file_contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an event; past the per-file limit a single marker event is kept
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = self.events();
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(
                codes::system::EVENT_LIMIT_REACHED,
                &format!(
                    "Too many events for file (limit: {})",
                    MAX_LOG_EVENTS_PER_FILE
                ),
            ));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        self.contexts()
            .insert(context.file_path.clone(), context);
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.events().get(file_path).cloned().unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.get_file_events(file_path)
            .into_iter()
            .filter(LogEvent::is_error)
            .collect()
    }

    pub fn get_file_warnings(&self, file_path: &Path) -> Vec<LogEvent> {
        self.get_file_events(file_path)
            .into_iter()
            .filter(LogEvent::is_warning)
            .collect()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.events().clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.events();
        let contexts = self.contexts();

        let mut summary = ProcessingSummary {
            total_files: events
                .keys()
                .chain(contexts.keys())
                .collect::<BTreeSet<_>>()
                .len(),
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary.successful_files =
            summary.total_files - summary.failed_files - summary.files_with_warnings;
        summary
    }

    /// Errors that require halting, across all files
    pub fn get_critical_errors(&self) -> Vec<(PathBuf, LogEvent)> {
        self.events()
            .iter()
            .flat_map(|(path, file_events)| {
                file_events
                    .iter()
                    .filter(|e| e.is_error() && e.requires_halt())
                    .map(move |e| (path.clone(), e.clone()))
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events().clear();
        self.contexts().clear();
    }

    pub fn total_event_count(&self) -> usize {
        self.events().values().map(Vec::len).sum()
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

fn push_event(output: &mut String, label: &str, file_path: &Path, event: &LogEvent) {
    let span_info = event
        .span
        .as_ref()
        .map(|s| {
            format!(
                " --> {}:{}:{}",
                file_path.display(),
                s.start().line,
                s.start().column
            )
        })
        .unwrap_or_default();

    output.push_str(&format!(
        "{}[{}]: {}{}\n",
        label,
        event.code.as_str(),
        event.message,
        span_info
    ));

    for (key, value) in &event.context {
        if !matches!(key.as_str(), "file" | "file_path" | "file_id") {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}

/// Render collected errors and warnings grouped by file
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        if events.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in events.iter().filter(|e| e.is_error()) {
            push_event(&mut output, "error", file_path, event);
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in events.iter().filter(|e| e.is_warning()) {
            push_event(&mut output, "warning", file_path, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    #[test]
    fn test_record_and_summarize() {
        let collector = ErrorCollector::new();
        let bad = PathBuf::from("bad.c");
        let warned = PathBuf::from("warned.c");
        let clean = PathBuf::from("clean.c");

        collector.record_file_context(FileProcessingContext::new(bad.clone(), 0));
        collector.record_file_context(FileProcessingContext::new(warned.clone(), 1));
        collector.record_file_context(FileProcessingContext::new(clean, 2));

        collector.record_event(&bad, LogEvent::error(codes::lexical::BAD_TOKEN, "bad"));
        collector.record_event(
            &warned,
            LogEvent::warning(codes::preprocessor::WARNING_TOKEN, "`"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.successful_files, 1);
        assert!(summary.has_errors());
        assert!(summary.has_warnings());

        assert_eq!(collector.get_file_errors(&bad).len(), 1);
        assert_eq!(collector.get_file_warnings(&warned).len(), 1);
        assert!(collector.get_critical_errors().is_empty());
    }

    #[test]
    fn test_per_file_limit_adds_single_marker() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("noisy.c");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(&path, LogEvent::error(codes::lexical::BAD_TOKEN, "bad"));
        }

        let events = collector.get_file_events(&path);
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert_eq!(
            events.last().map(|e| e.code),
            Some(codes::system::EVENT_LIMIT_REACHED)
        );
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("prog.c");
        let at = Position::new(4, 2, 3);

        collector.record_event(
            &path,
            LogEvent::error(codes::lexical::BAD_TOKEN, "bad token")
                .with_span(Span::new(at, at))
                .with_context("lexeme", "\"abc")
                .with_context("file", "prog.c"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("Checking prog.c..."));
        assert!(output.contains("error[E020]: bad token --> prog.c:2:3"));
        assert!(output.contains("= lexeme: \"abc"));
        assert!(!output.contains("= file:"));
        assert!(output.contains("Total errors: 1"));

        collector.clear();
        assert_eq!(collector.total_event_count(), 0);
    }
}
