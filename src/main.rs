use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use pdf_quiz::{ParserConfig, Quiz, QuizConfig, QuestionParser, config, load_questions, logging};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Practice quiz from PDF exam dumps", long_about = None)]
struct Args {
    /// PDF exam dump, or a JSON question bank
    file: Option<PathBuf>,

    /// Directory for parsed-question cache entries
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// File name prefix of cache entries
    #[arg(long)]
    cache_prefix: Option<String>,

    /// Page extraction threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Number of questions in an exam session
    #[arg(long)]
    exam_questions: Option<usize>,

    /// Hide explanations after answering
    #[arg(long)]
    no_explanations: bool,

    /// Delete all cache entries before doing anything else
    #[arg(long)]
    clear_cache: bool,

    /// Parse the file and print its questions as JSON instead of starting the quiz
    #[arg(long)]
    dump: bool,
}

impl Args {
    fn parser_config(&self) -> ParserConfig {
        let mut cfg = ParserConfig::default();
        if let Some(dir) = &self.cache_dir {
            cfg.cache_dir = dir.clone();
        }
        if let Some(prefix) = &self.cache_prefix {
            cfg.cache_prefix = prefix.clone();
        }
        if let Some(workers) = self.workers {
            cfg.workers = workers;
        }
        cfg
    }

    fn quiz_config(&self) -> QuizConfig {
        let mut cfg = QuizConfig::default();
        if let Some(count) = self.exam_questions {
            cfg.exam_question_count = count;
        }
        cfg.show_explanations = !self.no_explanations;
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_dir = config::app_data_dir();
    let _guard = logging::init(&log_dir, args.dump)
        .with_context(|| format!("failed to set up logging in {}", log_dir.display()))?;

    let parser_config = args.parser_config();

    if args.clear_cache {
        let parser = QuestionParser::new(&parser_config);
        let removed = parser
            .cache()
            .clear()
            .with_context(|| format!("failed to clear cache in {}", parser.cache().dir().display()))?;
        info!("Removed {} cache entries", removed);
        eprintln!("Removed {} cache entries", removed);
    }

    let Some(file) = args.file.clone() else {
        if args.clear_cache {
            return Ok(());
        }
        bail!("no input file given (see --help)");
    };

    if args.dump {
        let outcome = load_questions(&file, &parser_config)
            .with_context(|| format!("failed to load {}", file.display()))?;
        let json = serde_json::to_string_pretty(&outcome.questions)?;
        println!("{}", json);
        return Ok(());
    }

    Quiz::load(file, parser_config, args.quiz_config())
        .run()
        .context("error running quiz")?;

    Ok(())
}
