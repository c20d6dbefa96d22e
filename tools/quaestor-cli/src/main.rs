mod corpus;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quaestor_engine::{basic, Answer, DispatchError, Dispatcher, EndCondition, Engine, EngineConfig, QueryGraph};
use quaestor_pattern::matcher::{alt, pos};
use quaestor_pattern::parse_tagged;
use quaestor_protocol::{SentenceId, TaggedSentence};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Interprets POS-tagged questions as semantic queries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a JSON corpus of tagged sentences to an rkyv archive
    Compile {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Interpret tagged questions with the basic rule set
    Ask {
        /// Question in surface/lemma/TAG notation (repeatable)
        #[arg(short, long, value_name = "TEXT")]
        tagged: Vec<String>,

        /// Compiled corpus whose sentences are interpreted as well
        #[arg(short, long, value_name = "FILE")]
        corpus: Option<PathBuf>,

        /// POS tag tolerated after the end of a match (repeatable)
        #[arg(long, value_name = "TAG")]
        allow_trailing: Vec<String>,

        /// Also print the lowered query graph
        #[arg(long)]
        graph: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match Cli::parse().command {
        Command::Compile { input, output } => compile(input, output),
        Command::Ask {
            tagged,
            corpus,
            allow_trailing,
            graph,
        } => ask(tagged, corpus, allow_trailing, graph),
    }
}

fn compile(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    info!(input = %input.display(), "reading corpus JSON");
    let json = fs::read_to_string(&input).with_context(|| format!("cannot read {}", input.display()))?;

    let bytes = corpus::compile_json(&json)?;
    fs::write(&output, bytes.as_slice()).with_context(|| format!("cannot write {}", output.display()))?;

    info!(output = %output.display(), bytes = bytes.len(), "corpus archive written");
    Ok(())
}

fn ask(tagged: Vec<String>, corpus_path: Option<PathBuf>, allow_trailing: Vec<String>, graph: bool) -> anyhow::Result<()> {
    let mut sentences = Vec::new();
    for (i, text) in tagged.iter().enumerate() {
        let tokens = parse_tagged(text)?;
        sentences.push(TaggedSentence::new(SentenceId::new(i as u32), tokens));
    }
    if let Some(path) = corpus_path {
        let bytes = fs::read(&path).with_context(|| format!("cannot read {}", path.display()))?;
        sentences.extend(corpus::load(&bytes)?.sentences);
    }

    let mut config = EngineConfig::new();
    if !allow_trailing.is_empty() {
        config = config.with_end(EndCondition::allow_trailing(alt(allow_trailing.into_iter().map(pos)))?);
    }
    let dispatcher = Dispatcher::new(Engine::with_config(basic::registry()?, config));

    for sentence in &sentences {
        let report = report(sentence, dispatcher.answer(sentence.tokens()), graph);
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

fn report(sentence: &TaggedSentence, outcome: Result<Option<Answer>, DispatchError>, graph: bool) -> Value {
    let mut report = json!({
        "id": sentence.id,
        "sentence": sentence.text(),
    });

    match outcome {
        Ok(Some(answer)) => {
            report["rule"] = json!(answer.rule_name);
            if graph {
                let lowered = QueryGraph::lower(&answer.expr);
                let triples: Vec<[String; 3]> = lowered
                    .triples()
                    .into_iter()
                    .map(|(from, label, to)| [from.to_string(), label.to_string(), to.to_string()])
                    .collect();
                report["head"] = json!(lowered.head().to_string());
                report["graph"] = json!(triples);
            }
            report["query"] = json!(answer.expr);
        }
        Ok(None) => report["query"] = Value::Null,
        Err(err) => report["error"] = json!(err.to_string()),
    }
    report
}
