//! CLI entry point for the SAGE research agent.

use anyhow::Context;
use clap::Parser;
use sage::agents::{EditorAgent, PlannerAgent, ResearcherAgent, WriterAgent};
use sage::cli::output::Output;
use sage::cli::{display_report, save_report, Cli};
use sage::hitl::{AutoApproveGate, ConsoleReviewer, ReviewGate};
use sage::llm::OpenAIClient;
use sage::tools::{ArxivExtractor, TavilyClient, WikipediaExtractor};
use sage::{AppError, Orchestrator, Settings};
use std::io::{self, BufRead, Write as _};
use tracing_subscriber::EnvFilter;

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone()));

    if settings.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn make_llm(settings: &Settings) -> Box<OpenAIClient> {
    Box::new(
        OpenAIClient::new(&settings.openai_api_key, &settings.model_name)
            .with_api_base(&settings.openai_api_base),
    )
}

fn prompt_question(out: &Output) -> anyhow::Result<Option<String>> {
    out.info("Type your research question, or 'quit' to exit.");
    print!("\n> ");
    io::stdout().flush()?;
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    let question = line.trim().to_string();
    if question.is_empty() || matches!(question.to_lowercase().as_str(), "quit" | "exit" | "q") {
        return Ok(None);
    }
    Ok(Some(question))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let mut settings = Settings::from_env().context("failed to load settings")?;
    if let Some(model) = &cli.model {
        settings.model_name = model.clone();
    }
    init_tracing(&settings);

    out.banner();

    let question = match cli.question {
        Some(question) => question,
        None => match prompt_question(&out)? {
            Some(question) => question,
            None => {
                out.detail("Goodbye!");
                return Ok(());
            }
        },
    };

    let gate: Box<dyn ReviewGate> = if cli.auto_approve {
        Box::new(AutoApproveGate)
    } else {
        Box::new(ConsoleReviewer::new(out))
    };

    let researcher = ResearcherAgent::new(
        make_llm(&settings),
        TavilyClient::new(&settings.tavily_api_key, settings.max_search_results),
        ArxivExtractor::new(),
        WikipediaExtractor::new(),
    );

    let orchestrator = Orchestrator::new(
        Box::new(PlannerAgent::new(make_llm(&settings))),
        gate,
        std::sync::Arc::new(researcher),
        Box::new(WriterAgent::new(make_llm(&settings))),
        Box::new(EditorAgent::new(make_llm(&settings))),
        settings.orchestrator_config(cli.parallel),
    );

    match orchestrator.run(&question).await {
        Ok(report) => {
            display_report(&out, &report);
            if let Some(path) = &cli.output {
                let saved = save_report(&report, path).context("failed to save report")?;
                out.success(&format!("Report saved to {}", saved.display()));
            }
            Ok(())
        }
        Err(AppError::Aborted) => {
            out.detail("Aborted by user.");
            Ok(())
        }
        Err(e) => {
            out.error(&e.to_string());
            std::process::exit(1);
        }
    }
}
