// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `arpent contact` command implementation.

use std::io::Read;
use std::path::PathBuf;

use arpent_contact::{ContactSubmission, Notification, decode, encode};
use arpent_core::ArpentError;
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum ContactCommand {
    /// Print the stored text form of a submission.
    Encode(EncodeArgs),
    /// Parse a stored message (file or stdin) and print its fields as JSON.
    Decode {
        /// File holding the message. Reads stdin when omitted.
        file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long)]
    message: String,
    /// Print the full notification record as JSON instead of the text.
    #[arg(long)]
    notification: bool,
}

impl From<EncodeArgs> for ContactSubmission {
    fn from(args: EncodeArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            subject: args.subject,
            message: args.message,
        }
    }
}

pub fn run_contact(command: ContactCommand) -> Result<(), ArpentError> {
    match command {
        ContactCommand::Encode(args) => {
            let as_notification = args.notification;
            let submission = ContactSubmission::from(args);
            if as_notification {
                let notification = Notification::from_submission(&submission, chrono::Utc::now());
                println!("{}", to_json(&notification)?);
            } else {
                println!("{}", encode(&submission));
            }
        }
        ContactCommand::Decode { file } => {
            let text = read_input(file.as_deref())?;
            println!("{}", to_json(&decode(&text))?);
        }
    }
    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<String, ArpentError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            ArpentError::Internal(format!("failed to read {}: {e}", path.display()))
        }),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| ArpentError::Internal(format!("failed to read stdin: {e}")))?;
            Ok(text)
        }
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ArpentError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ArpentError::Internal(format!("failed to serialize output: {e}")))
}
