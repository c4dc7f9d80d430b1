use crate::lexical::LexicalMetrics;
use crate::preprocessor::PreProcessorResponse;
use crate::tokens::TokenStream;
use std::time::Duration;

/// Everything one program produced: preprocessor diagnostics and tokens
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub response: PreProcessorResponse,
    pub tokens: TokenStream,
    pub metrics: LexicalMetrics,
    pub duration: Duration,
}

impl PipelineResult {
    pub fn new(
        response: PreProcessorResponse,
        tokens: TokenStream,
        metrics: LexicalMetrics,
        duration: Duration,
    ) -> Self {
        Self {
            response,
            tokens,
            metrics,
            duration,
        }
    }

    /// Preprocessor errors plus bad tokens
    pub fn error_count(&self) -> usize {
        self.response.errors.len() + self.tokens.bad_count()
    }

    pub fn is_clean(&self) -> bool {
        self.error_count() == 0 && !self.response.has_warnings()
    }

    pub fn log_success(&self, source_name: &str) {
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Program processed",
            "source" => source_name,
            "tokens" => self.tokens.len(),
            "warnings" => self.response.warnings.len(),
            "errors" => self.error_count(),
            "duration_ms" => format!("{:.2}", self.duration.as_secs_f64() * 1000.0)
        );
    }
}
