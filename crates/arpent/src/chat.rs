// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `arpent chat` command implementation.
//!
//! Interactive REPL against the assistant gateway. Replies are printed as
//! they stream in; a failed reply is shown as an `[Erreur]` line and the
//! conversation continues.

use std::io::Write;

use arpent_assistant::{AssistantClient, Conversation, StreamEvent};
use arpent_assistant::messages::ERROR_PREFIX;
use arpent_config::ArpentConfig;
use arpent_core::ArpentError;
use colored::Colorize;
use futures::StreamExt;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// Runs the chat REPL until `/quit`, Ctrl+C or Ctrl+D.
pub async fn run_chat(config: &ArpentConfig) -> Result<(), ArpentError> {
    let client = AssistantClient::from_config(&config.assistant)
        .map_err(|e| crate::missing_section("assistant", e))?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| ArpentError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "arpent chat".bold().green());
    println!(
        "Type {} to start over, {} to exit.\n",
        "/reset".yellow(),
        "/quit".yellow()
    );

    let mut conversation = Conversation::new();
    let prompt = format!("{}> ", "vous".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "/quit" | "/exit" => break,
                    "/reset" => {
                        conversation = Conversation::new();
                        println!("{}", "conversation cleared".dimmed());
                        continue;
                    }
                    "" => continue,
                    _ => {}
                }
                let _ = rl.add_history_entry(&line);
                stream_reply(&client, &mut conversation, trimmed).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    debug!(turns = conversation.turns().len(), "chat session ended");
    Ok(())
}

async fn stream_reply(client: &AssistantClient, conversation: &mut Conversation, input: &str) {
    let turns = conversation.push_user(input);
    let mut events = client.reply(turns);

    print!("{} ", "assistant>".cyan());
    let _ = std::io::stdout().flush();
    while let Some(event) = events.next().await {
        conversation.apply(&event);
        match event {
            StreamEvent::Delta(text) => {
                print!("{text}");
                let _ = std::io::stdout().flush();
            }
            StreamEvent::Error(message) => {
                print!("{}", format!("{ERROR_PREFIX} {message}").red());
            }
            StreamEvent::Done => {
                println!("\n");
                break;
            }
        }
    }
}
