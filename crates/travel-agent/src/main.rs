//! An interactive travel planner in the terminal.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use travel_agent::SessionBuilder;
use travel_agent::render::render_markdown;
use travel_agent_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use travel_agent_search::SearchConfigBuilder;

enum SessionEvent {
    ToolCall(String, String),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(serpapi_key) = env::var("SERPAPI_API_KEY") else {
        eprintln!("SERPAPI_API_KEY environment variable is not set");
        return;
    };
    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };

    let mut config = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config = config.with_model(model);
    }
    let model_provider = OpenAIProvider::new(config.build());
    let search_config = SearchConfigBuilder::with_api_key(serpapi_key).build();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut session =
        SessionBuilder::with_model_provider(model_provider, search_config)
            .on_tool_call(move |req| {
                event_tx
                    .send(SessionEvent::ToolCall(
                        req.name.clone(),
                        req.arguments.to_string(),
                    ))
                    .ok();
            })
            .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!(
        "{}",
        "Where would you like to go? Type `exit` to quit.".dimmed()
    );
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let result = {
            let send = session.send_message(line);
            tokio::pin!(send);
            loop {
                select! {
                    result = &mut send => break result,
                    Some(event) = event_rx.recv() => {
                        progress_bar.suspend(|| print_event(event));
                    }
                }
            }
        };

        // Finish the progress bar before printing anything else.
        progress_bar.finish_and_clear();
        while let Ok(event) = event_rx.try_recv() {
            print_event(event);
        }

        match result {
            Ok(turn) => {
                let bar = BAR_CHAR.bright_cyan();
                println!();
                for line in render_markdown(&turn.reply).lines() {
                    println!("{bar}{line}");
                }
                println!();
                println!("{}", session.plan().checklist().dimmed());
            }
            Err(err) => {
                error!("failed to send message: {err}");
                println!("{}⚠️  {err}", BAR_CHAR.bright_yellow());
            }
        }
    }
}

fn print_event(event: SessionEvent) {
    match event {
        SessionEvent::ToolCall(name, arguments) => {
            println!("🔧 {} {}", name.bright_white().bold(), arguments.dimmed());
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
