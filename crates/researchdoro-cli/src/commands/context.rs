use clap::Subcommand;
use researchdoro_core::ContextStore;

use super::CommandResult;

#[derive(Subcommand)]
pub enum ContextAction {
    /// Print the research context as JSON
    Show,
    /// Set the current topic (omit to clear)
    Topic {
        topic: Option<String>,
    },
    /// Append a session note
    Note {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Add a focus area
    Focus {
        area: String,
    },
    /// Remove a focus area
    Unfocus {
        area: String,
    },
    /// Forget everything
    Clear,
}

pub fn run(action: ContextAction) -> CommandResult {
    let store = ContextStore::open()?;

    match action {
        ContextAction::Show => {
            let context = store.load()?;
            println!("{}", serde_json::to_string_pretty(&context)?);
        }
        ContextAction::Topic { topic } => {
            let topic = topic.unwrap_or_default();
            store.update(|ctx| ctx.set_topic(topic.as_str()))?;
            if topic.trim().is_empty() {
                println!("topic cleared");
            } else {
                println!("topic set: {}", topic.trim());
            }
        }
        ContextAction::Note { text } => {
            let note = text.join(" ");
            store.update(|ctx| ctx.add_note(&note))?;
            println!("note added");
        }
        ContextAction::Focus { area } => {
            if store.update(|ctx| ctx.add_focus_area(&area))? {
                println!("focus area added: {area}");
            } else {
                println!("focus area already present: {area}");
            }
        }
        ContextAction::Unfocus { area } => {
            if store.update(|ctx| ctx.remove_focus_area(&area))? {
                println!("focus area removed: {area}");
            } else {
                println!("no such focus area: {area}");
            }
        }
        ContextAction::Clear => {
            store.update(|ctx| ctx.clear())?;
            println!("context cleared");
        }
    }
    Ok(())
}
