use crate::cli::Args;
use crate::client::{ChatClient, SendOutcome};
use crate::commands::{ReplState, dispatcher::CommandDispatcher};
use crate::display;
use crate::error::ChatError;
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, Read};

/// Terminal presentation adapter: renders the session and forwards user
/// intents into the [`ChatClient`].
pub struct Application {
    pub args: Args,
    pub command_dispatcher: CommandDispatcher,
    pub state: ReplState,
}

impl Application {
    pub fn new(
        args: Args,
        client: ChatClient,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, ChatError> {
        Ok(Self {
            args,
            command_dispatcher,
            state: ReplState::new(client),
        })
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        let one_shot = match (self.args.query.clone(), context) {
            (Some(arg_q), Some(stdin_ctx)) => Some(format!("{}\n\n{}", stdin_ctx, arg_q)),
            (None, Some(stdin_ctx)) => Some(stdin_ctx),
            (Some(arg_q), None) => Some(arg_q),
            (None, None) => None,
        };

        match one_shot {
            Some(query) => self.handle_one_shot(&query).await,
            None => self.handle_chat_loop().await,
        }
    }

    async fn handle_one_shot(&mut self, query: &str) -> Result<(), ChatError> {
        match self.state.client.send_message(query).await {
            SendOutcome::Sent => {
                if let Some(reply) = self.state.client.session().messages.last() {
                    display::display_reply(&reply.content);
                }
                Ok(())
            }
            SendOutcome::Failed => {
                if let Some(advisory) = &self.state.client.session().last_error {
                    display::display_error(advisory);
                }
                Ok(())
            }
            SendOutcome::Rejected => Err(ChatError::Input("No query provided".to_string())),
        }
    }

    async fn handle_chat_loop(&mut self) -> Result<(), ChatError> {
        println!(
            "Entering chat mode. Type '/help' for available commands. Press Ctrl+D or type /quit to exit."
        );
        display::display_model_badge(self.state.client.selected_model());

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            let input_result = input::read_input(&mut editor)?;

            let input = match input_result {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if input.starts_with('/') {
                let parts: Vec<&str> = input[1..].split_whitespace().collect();
                if !parts.is_empty() {
                    let command = parts[0];
                    let args = if parts.len() > 1 { &parts[1..] } else { &[] };

                    match self.command_dispatcher.execute(command, args, &mut self.state) {
                        Ok(Some(output)) => {
                            println!("{}", output);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            display::display_error(&e.to_string());
                        }
                    }

                    if !self.state.should_continue {
                        break;
                    }
                }
                continue;
            }

            match self.state.client.send_message(&input).await {
                SendOutcome::Sent => {
                    if let Some(reply) = self.state.client.session().messages.last() {
                        display::display_reply(&reply.content);
                    }
                }
                SendOutcome::Failed => {
                    if let Some(advisory) = &self.state.client.session().last_error {
                        display::display_error(advisory);
                    }
                }
                SendOutcome::Rejected => {}
            }
        }

        input::save_history(&mut editor)?;

        Ok(())
    }
}
