use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Subcommand;
use researchdoro_core::{
    AiGateway, ChatMessage, Config, ContextStore, GatewayError, ResearchContext, SessionData,
};

use super::{runtime, CommandResult};

#[derive(Subcommand)]
pub enum AiAction {
    /// Ask a one-off research question
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Do not send the research context
        #[arg(long)]
        no_context: bool,
    },
    /// Interactive chat on stdin (empty line or /quit to exit)
    Chat,
    /// Get feedback on a focus session
    Analyze {
        /// Total focus minutes
        #[arg(long)]
        minutes: u64,
        /// Completed pomodoros
        #[arg(long)]
        pomodoros: u64,
        /// Breaks taken
        #[arg(long, default_value = "0")]
        breaks: u64,
        /// Session goal
        #[arg(long)]
        goal: Option<String>,
        /// Session note (repeatable)
        #[arg(long = "note")]
        notes: Vec<String>,
    },
    /// Generate insights from productivity data (JSON file or stdin)
    Insights {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Verify the configured provider responds
    Test,
}

pub fn run(action: AiAction) -> CommandResult {
    let config = Config::load()?;
    let gateway = AiGateway::from_settings(config.ai);
    let store = ContextStore::open()?;
    let rt = runtime()?;

    match action {
        AiAction::Ask { query, no_context } => {
            let query = query.join(" ");
            let context = if no_context { None } else { Some(store.load()?) };
            let answer = rt.block_on(gateway.quick_query(&query, context.as_ref()))?;
            println!("{answer}");
            store.update(|ctx| ctx.record_query(&query))?;
        }
        AiAction::Chat => {
            let context = store.load()?;
            rt.block_on(chat_loop(&gateway, &context))?;
        }
        AiAction::Analyze {
            minutes,
            pomodoros,
            breaks,
            goal,
            notes,
        } => {
            let session = SessionData {
                total_minutes: minutes,
                completed_pomodoros: pomodoros,
                breaks_taken: breaks,
                goal,
                notes,
            };
            let context = store.load()?;
            let feedback = rt.block_on(gateway.analyze_session(&session, Some(&context)))?;
            println!("{feedback}");
        }
        AiAction::Insights { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let data: serde_json::Value = serde_json::from_str(&raw)?;
            let context = store.load()?;
            let insights = rt.block_on(gateway.generate_insights(&data, Some(&context)))?;
            for insight in insights {
                println!("- {insight}");
            }
        }
        AiAction::Test => {
            rt.block_on(gateway.test_connection())?;
            if let Some(provider) = gateway.active_provider() {
                println!("connection ok: {}", provider.display_name());
            }
        }
    }
    Ok(())
}

async fn chat_loop(gateway: &AiGateway, context: &ResearchContext) -> CommandResult {
    if !gateway.is_configured() {
        return Err(GatewayError::NotConfigured.into());
    }
    let stdin = std::io::stdin();
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line == "/quit" {
            break;
        }

        history.push(ChatMessage::user(line));
        match gateway.chat(&history, Some(context)).await {
            Ok(reply) => {
                println!("{reply}");
                history.push(ChatMessage::assistant(reply));
            }
            Err(e) => {
                // Drop the unanswered turn so the next one starts clean.
                history.pop();
                eprintln!("error: {e}");
            }
        }
    }
    Ok(())
}
