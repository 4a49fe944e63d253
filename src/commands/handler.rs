use super::ReplState;
use crate::display;
use crate::error::ChatError;

use chrono::Local;
use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut ReplState, args: &[&str]) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct NewChatCommand;
pub struct ChatsCommand;
pub struct OpenCommand;
pub struct ModelCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ReplState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(&self, _state: &mut ReplState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            style(QuitCommand.help()).to_string(),
            style(HelpCommand.help()).to_string(),
            style(NewChatCommand.help()).to_string(),
            style(ChatsCommand.help()).to_string(),
            style(OpenCommand.help()).to_string(),
            style(ModelCommand.help()).to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for NewChatCommand {
    fn execute(&self, state: &mut ReplState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.client.start_new_conversation();
        display::display_model_badge(state.client.selected_model());
        Ok(Some("Started a new chat.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/new - Start a new chat on the default model"
    }
}

impl CommandHandler for ChatsCommand {
    fn execute(&self, state: &mut ReplState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let summaries = state.client.summaries();
        if summaries.is_empty() {
            return Ok(Some("No past chats".to_string()));
        }

        let lines: Vec<String> = summaries
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let preview: String = s.preview.chars().take(48).collect();
                let when = s.last_updated.with_timezone(&Local).format("%m-%d %H:%M");
                format!(
                    "{:>2}. {} {} {}",
                    i + 1,
                    style(&s.model_name).bold().cyan(),
                    style(when).dim(),
                    preview
                )
            })
            .collect();

        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/chats - List recent chats, newest first"
    }
}

impl CommandHandler for OpenCommand {
    fn execute(&self, state: &mut ReplState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(target) = args.first() else {
            return Ok(Some("Usage: /open <number|id> (see /chats)".to_string()));
        };

        let summaries = state.client.summaries();
        let id = match target.parse::<usize>() {
            Ok(n) if n >= 1 && n <= summaries.len() => summaries[n - 1].id.clone(),
            _ => target.to_string(),
        };

        state.client.select_conversation(&id)?;

        display::display_model_badge(state.client.selected_model());
        for message in &state.client.session().messages {
            display::display_message(message);
        }

        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/open <n> - Open a chat from the /chats listing"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut ReplState, args: &[&str]) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            let current_id = state.client.selected_model().id.clone();
            let mut lines = vec![format!(
                "Current model: {}",
                state.client.selected_model().display_name
            )];
            for model in state.client.registry().list() {
                let marker = if model.id == current_id { "*" } else { " " };
                lines.push(format!(" {} {} ({})", marker, model.display_name, model.id));
            }
            Ok(Some(lines.join("\n")))
        } else {
            state.client.select_model(args[0])?;
            Ok(Some(format!(
                "Model changed to: {}",
                state.client.selected_model().display_name
            )))
        }
    }

    fn help(&self) -> &'static str {
        "/model <id> - Show or change the current model"
    }
}
