use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::preprocessor::PreprocessorError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Preprocessing failed: {0}")]
    Preprocessing(#[from] PreprocessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::FileProcessing(error) => error.error_code(),
            PipelineError::Preprocessing(error) => error.error_code(),
            PipelineError::LexicalAnalysis(error) => error.error_code(),
        }
    }
}
