// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `arpent team` command implementation.

use std::sync::Arc;

use arpent_config::ArpentConfig;
use arpent_core::ArpentError;
use arpent_directory::{ProfileDirectory, RestProfileSource};
use clap::Subcommand;
use colored::Colorize;

use crate::contact::to_json;

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// List all active team members in display order.
    List,
    /// Show the active member with this email address.
    Email { email: String },
    /// Show the active member with this slug.
    Slug { slug: String },
}

pub async fn run_team(config: &ArpentConfig, command: TeamCommand) -> Result<(), ArpentError> {
    let source = RestProfileSource::from_config(&config.directory)
        .map_err(|e| crate::missing_section("directory", e))?;
    let directory = ProfileDirectory::from_config(Arc::new(source), &config.directory);

    match command {
        TeamCommand::List => {
            let profiles = directory.list_active().await;
            if profiles.is_empty() {
                eprintln!("{}", "no active team members".yellow());
            }
            println!("{}", to_json(&profiles)?);
        }
        TeamCommand::Email { email } => match directory.by_email(&email).await {
            Some(profile) => println!("{}", to_json(&profile)?),
            None => eprintln!("{}", format!("no active member with email {email}").yellow()),
        },
        TeamCommand::Slug { slug } => match directory.by_slug(&slug).await {
            Some(profile) => println!("{}", to_json(&profile)?),
            None => eprintln!("{}", format!("no active member with slug {slug}").yellow()),
        },
    }
    Ok(())
}
