use smallc_lexer::config::runtime::{RuntimeConfig, TablePreferences};
use smallc_lexer::conversions::to_literal;
use smallc_lexer::preprocessor::PreProcessorResponse;
use smallc_lexer::tokens::{SpannedToken, TokenOutcome};
use smallc_lexer::{logging, LexicalAnalyzer, Pipeline, PipelineResult};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    table_dir: Option<PathBuf>,
    program: Option<PathBuf>,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("smallc_lexer");

    let options = match parse_options(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!(
                "Usage: {} [--config <file>] [--tables <dir>] [<program>]",
                program_name
            );
            std::process::exit(2);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let mut config = match &options.config {
        Some(path) => match RuntimeConfig::from_file(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: {}", error);
                std::process::exit(2);
            }
        },
        None => RuntimeConfig::default(),
    };
    if let Some(table_dir) = options.table_dir {
        config.tables = TablePreferences {
            table_dir,
            ..config.tables
        };
    }

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    smallc_lexer::lexical::init_lexical_analysis_logging()?;

    let mut pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(error) => {
            eprintln!("Cannot load tables from {}: {}", config.tables.table_dir.display(), error);
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    };

    match options.program {
        Some(program) => run_file(&mut pipeline, &program),
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_interactive(&mut pipeline, &mut stdin.lock(), &mut stdout.lock())?;
            Ok(())
        }
    }
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--config" => {
                let file = args.next().ok_or("--config requires a file")?;
                options.config = Some(PathBuf::from(file));
            }
            "--tables" => {
                let dir = args.next().ok_or("--tables requires a directory")?;
                options.table_dir = Some(PathBuf::from(dir));
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{}'", flag));
            }
            program => {
                if options.program.is_some() {
                    return Err(format!("Unexpected argument '{}'", program));
                }
                options.program = Some(PathBuf::from(program));
            }
        }
    }

    Ok(options)
}

fn print_help(program_name: &str) {
    println!("SmallC Lexer v{}", env!("CARGO_PKG_VERSION"));
    println!("Table-driven preprocessor and lexical analyzer");
    println!();
    println!("USAGE:");
    println!("    {} [--tables <dir>]              # Interactive session", program_name);
    println!("    {} [--tables <dir>] <program>    # Analyze one program", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --config <file>   TOML preferences file (tables, lexical, preprocessor, logging)");
    println!("    --tables <dir>    Directory holding the three table files (default: tables)");
    println!("    --help            Show this help message");
    println!();
    println!("INTERACTIVE COMMANDS:");
    print_commands(&mut io::stdout()).ok();
}

fn run_file(pipeline: &mut Pipeline, program: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Processing file: {}", program.display());

    match pipeline.process_file(program) {
        Ok(result) => {
            let mut stdout = io::stdout();
            print_response(&mut stdout, &result.response)?;
            print_tokens(&mut stdout, &result)?;
            logging::print_cargo_style_summary();

            if result.error_count() > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }
}

fn print_tokens<W: Write>(out: &mut W, result: &PipelineResult) -> io::Result<()> {
    writeln!(out, "Tokens:")?;
    for token in result.tokens.iter() {
        let location = token.span.start.to_string();
        writeln!(out, "{:>8}  {}", location, describe_token(token))?;
    }
    writeln!(
        out,
        "{} tokens, {} invalid, {} comments skipped",
        result.tokens.len(),
        result.tokens.bad_count(),
        result.metrics.skipped_tokens
    )
}

fn describe_token(token: &SpannedToken) -> String {
    match token.value.name() {
        Some(name) => format!("Lexeme: {:<10}Name: {}", token.value.lexeme(), name),
        None => format!("Invalid token {}", to_literal(token.value.lexeme())),
    }
}

fn print_response<W: Write>(out: &mut W, response: &PreProcessorResponse) -> io::Result<()> {
    if response.has_warnings() {
        writeln!(out, "Warnings:")?;
        for token in &response.warnings {
            writeln!(
                out,
                "Lexeme: {:<15}Name: {}",
                to_literal(token.value.lexeme()),
                token.value.name().unwrap_or_default()
            )?;
        }
    }

    if response.has_errors() {
        writeln!(out, "Errors:")?;
        for token in &response.errors {
            writeln!(out, "Lexeme: {:<15}", to_literal(token.value.lexeme()))?;
        }
    }

    Ok(())
}

fn print_commands<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Lexical Analyzer Commands:")?;
    writeln!(out, "{:<5}Quit", 'q')?;
    writeln!(out, "{:<5}Read the rest of the analysis", 'r')?;
    writeln!(out, "{:<5}Help with commands", 'h')
}

/// Trimmed next line; `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

/// Ask until the answer is y or n; end of input counts as no
fn user_confirmation<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<bool> {
    loop {
        out.flush()?;
        let Some(answer) = read_line(input)? else {
            return Ok(false);
        };

        match answer.to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => write!(out, "Please answer with (y/n)> ")?,
        }
    }
}

fn run_interactive<R: BufRead, W: Write>(
    pipeline: &mut Pipeline,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    print_commands(out)?;

    loop {
        write!(out, "Enter a path to the program you want to analyze or q to quit> ")?;
        out.flush()?;

        let Some(path) = read_line(input)? else {
            return Ok(());
        };
        if path.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        if let Err(error) = pipeline.preprocessor.open_program(&path) {
            writeln!(out, "{}", error)?;
            continue;
        }

        let response = pipeline.preprocessor.process();
        pipeline.preprocessor.close_program();

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                writeln!(out, "{}", error)?;
                continue;
            }
        };

        print_response(out, &response)?;
        pipeline.lexer.set_program(&response.text);
        run_analysis(&mut pipeline.lexer, input, out)?;

        logging::print_cargo_style_summary();
        logging::clear_error_collection();
    }
}

/// Step through tokens, one per line of input
fn run_analysis<R: BufRead, W: Write>(
    lexer: &mut LexicalAnalyzer,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    let mut rush_analysis = false;
    writeln!(out, "Starting analysis...")?;

    while lexer.has_next_token() {
        match lexer.next_token() {
            TokenOutcome::Token(token) => writeln!(
                out,
                "Lexeme: {:<10}Name: {}",
                token.lexeme(),
                token.name().unwrap_or_default()
            )?,
            TokenOutcome::BadToken(_) => writeln!(out, "Invalid token")?,
            TokenOutcome::NoTokenAvailable => {
                if lexer.skip_char().is_none() {
                    break;
                }
                writeln!(out, "Invalid token")?;
            }
        }

        if rush_analysis {
            continue;
        }

        out.flush()?;
        let Some(command) = read_line(input)? else {
            rush_analysis = true;
            continue;
        };

        match command.to_lowercase().as_str() {
            "q" => {
                write!(out, "Are you sure you want to quit? (y/n)> ")?;
                if user_confirmation(input, out)? {
                    break;
                }
            }
            "r" => {
                write!(out, "Are you sure you want to analyze the rest of the file? (y/n)> ")?;
                rush_analysis = user_confirmation(input, out)?;
            }
            "h" => print_commands(out)?,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallc_lexer::{KeywordTable, PreProcessor, TransitionTableLoader};
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const PREPROCESSOR_TABLE: &str = "\
Valid Chars,Accepted,i,n,t,x,0x20,0x0A,{
0,,1,1,1,1,1,1,2
1,Add,,,,,,,
2,Brace,,,,,,,
";

    const LEXICAL_TABLE: &str = "\
Valid Chars,Accepted,i,n,t,x,0x20,0x0A
0,,1,1,1,1,0,0
1,Identifier,1,1,1,1,,
";

    fn pipeline() -> Pipeline {
        let (pre_machine, _) = TransitionTableLoader::parse(PREPROCESSOR_TABLE);
        let (lex_machine, _) = TransitionTableLoader::parse(LEXICAL_TABLE);
        Pipeline::new(
            PreProcessor::new(pre_machine).unwrap(),
            LexicalAnalyzer::new(lex_machine, KeywordTable::parse("int,Int\n")).unwrap(),
        )
    }

    fn session(pipeline: &mut Pipeline, input: &str) -> String {
        let mut output = Vec::new();
        run_interactive(pipeline, &mut Cursor::new(input.as_bytes()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_options() {
        let args = vec![
            "--config".to_string(),
            "smallc.toml".to_string(),
            "--tables".to_string(),
            "my tables".to_string(),
            "program.c".to_string(),
        ];
        let options = parse_options(&args).unwrap();

        assert_eq!(options.config, Some(PathBuf::from("smallc.toml")));
        assert_eq!(options.table_dir, Some(PathBuf::from("my tables")));
        assert_eq!(options.program, Some(PathBuf::from("program.c")));
        assert!(!options.help);

        assert!(parse_options(&["--help".to_string()]).unwrap().help);
        assert_eq!(parse_options(&[]).unwrap(), CliOptions::default());
    }

    #[test]
    fn test_parse_options_invalid() {
        assert!(parse_options(&["--tables".to_string()]).is_err());
        assert!(parse_options(&["--config".to_string()]).is_err());
        assert!(parse_options(&["--threads".to_string()]).is_err());
        assert!(parse_options(&["a.c".to_string(), "b.c".to_string()]).is_err());
    }

    #[test]
    fn test_quit_at_path_prompt() {
        let output = session(&mut pipeline(), "q\n");

        assert!(output.starts_with("Lexical Analyzer Commands:"));
        assert!(output.ends_with("or q to quit> "));
    }

    #[test]
    fn test_unreadable_path_prompts_again() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.c");
        let output = session(&mut pipeline(), &format!("{}\nQ\n", missing.display()));

        assert!(output.contains("File not found"));
        assert_eq!(output.matches("or q to quit> ").count(), 2);
    }

    #[test]
    fn test_session_steps_then_runs_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("program.c");
        fs::write(&path, "int {x\n").unwrap();

        let mut pipeline = pipeline();
        let output = session(
            &mut pipeline,
            &format!("{}\nr\nmaybe\ny\nq\n", path.display()),
        );

        assert!(output.contains("Warnings:"));
        assert!(output.contains("Lexeme: \"{\""));
        assert!(output.contains("Starting analysis..."));
        assert!(output.contains("Lexeme: int       Name: Int"));
        assert!(output.contains("Please answer with (y/n)> "));
        assert!(output.contains("Lexeme: x         Name: Identifier"));
        assert!(!pipeline.preprocessor.is_open());
    }

    #[test]
    fn test_quit_analysis_returns_to_prompt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("program.c");
        fs::write(&path, "int x\n").unwrap();

        let output = session(&mut pipeline(), &format!("{}\nq\ny\nq\n", path.display()));

        assert!(output.contains("Name: Int"));
        assert!(!output.contains("Name: Identifier"));
        assert_eq!(output.matches("or q to quit> ").count(), 2);
    }
}
