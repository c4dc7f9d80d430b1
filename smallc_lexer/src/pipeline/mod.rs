//! Program file -> preprocessor -> lexical analyzer

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::config::runtime::RuntimeConfig;
use crate::lexical::LexicalAnalyzer;
use crate::log_error;
use crate::logging::{self, codes};
use crate::preprocessor::PreProcessor;
use std::path::Path;
use std::time::Instant;

/// Both analyzers of one table set
#[derive(Debug)]
pub struct Pipeline {
    pub preprocessor: PreProcessor,
    pub lexer: LexicalAnalyzer,
}

impl Pipeline {
    pub fn new(preprocessor: PreProcessor, lexer: LexicalAnalyzer) -> Self {
        Self {
            preprocessor,
            lexer,
        }
    }

    /// Load the three tables named by the configuration
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, PipelineError> {
        let pipeline = Self::load_tables(config);

        if let Err(error) = &pipeline {
            log_error!(codes::system::INITIALIZATION_FAILURE, "Pipeline initialization failed",
                "table_dir" => config.tables.table_dir.display(),
                "cause" => error
            );
        }

        pipeline
    }

    fn load_tables(config: &RuntimeConfig) -> Result<Self, PipelineError> {
        let preprocessor = PreProcessor::with_preferences(
            crate::automaton::StateMachine::load(config.tables.preprocessor_table_path()),
            config.preprocessor.clone(),
        )?
        .with_file_processor(crate::file_processor::create_processor_from_preferences(
            &config.file_processor,
        ));
        let lexer = crate::lexical::create_analyzer(&config.tables, config.lexical.clone())?;

        Ok(Self::new(preprocessor, lexer))
    }

    pub fn process_file<P: AsRef<Path>>(&mut self, path: P) -> Result<PipelineResult, PipelineError> {
        process_file(path, &mut self.preprocessor, &mut self.lexer)
    }

    pub fn process_source(&mut self, text: &str) -> Result<PipelineResult, PipelineError> {
        process_source(text, &mut self.preprocessor, &mut self.lexer)
    }
}

/// Closes the preprocessor's program when dropped
struct OpenProgram<'a>(&'a mut PreProcessor);

impl Drop for OpenProgram<'_> {
    fn drop(&mut self) {
        self.0.close_program();
    }
}

/// Process one program file inside a per-file logging context
pub fn process_file<P: AsRef<Path>>(
    path: P,
    preprocessor: &mut PreProcessor,
    lexer: &mut LexicalAnalyzer,
) -> Result<PipelineResult, PipelineError> {
    let path = path.as_ref();
    let start_time = Instant::now();

    logging::with_file_context(path.to_path_buf(), 0, || -> Result<_, PipelineError> {
        crate::log_info!("Starting program processing", "file" => path.display());

        preprocessor.open_program(path)?;
        let response = {
            let program = OpenProgram(preprocessor);
            program.0.process()?
        };

        let tokens = lexer.tokenize(&response.text)?;
        let result = PipelineResult::new(
            response,
            tokens,
            lexer.metrics().clone(),
            start_time.elapsed(),
        );

        result.log_success(&path.display().to_string());
        Ok(result)
    })
}

/// Process an in-memory program
pub fn process_source(
    text: &str,
    preprocessor: &mut PreProcessor,
    lexer: &mut LexicalAnalyzer,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    preprocessor.set_program(text);
    let response = {
        let program = OpenProgram(preprocessor);
        program.0.process()?
    };

    let tokens = lexer.tokenize(&response.text)?;
    let result = PipelineResult::new(
        response,
        tokens,
        lexer.metrics().clone(),
        start_time.elapsed(),
    );

    result.log_success("<source>");
    Ok(result)
}
