// src/cli.rs
use crate::copilot::{CareerCopilot, ChatRequest};
use crate::core::ConfigManager;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "career-copilot")]
#[command(about = "Job search aggregation and AI career assistance")]
pub struct CopilotCli {
    #[command(subcommand)]
    pub command: Option<CopilotCommand>,
}

#[derive(Subcommand)]
pub enum CopilotCommand {
    /// Run the HTTP API (default)
    Serve,
    /// Search every configured job board and print the merged result as JSON
    Search {
        keywords: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        remote: bool,
        /// Skip the LinkedIn scraper
        #[arg(long)]
        no_linkedin: bool,
    },
    /// Send one chat message and print the reply as JSON
    Chat {
        message: String,
        #[arg(long)]
        api_key: Option<String>,
    },
}

pub async fn handle_command(cli: CopilotCli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(CopilotCommand::Serve) {
        CopilotCommand::Serve => start_web_server(config).await,

        CopilotCommand::Search {
            keywords,
            location,
            limit,
            remote,
            no_linkedin,
        } => {
            let copilot = CareerCopilot::new(config)?;
            let mut query = copilot
                .default_query(Some(keywords.as_str()))
                .with_location(&location)
                .remote_only(remote)
                .include_linkedin(!no_linkedin);
            if let Some(limit) = limit {
                query = query.with_limit(limit);
            }

            info!("CLI search for '{}'", query.keywords);
            let result = copilot.search_jobs(&query).await;
            print_json(&result)
        }

        CopilotCommand::Chat { message, api_key } => {
            let copilot = CareerCopilot::new(config)?;
            let reply = copilot
                .chat(&ChatRequest {
                    message,
                    api_key,
                    conversation_history: Vec::new(),
                })
                .await?;
            print_json(&reply)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = CopilotCli::try_parse_from(["career-copilot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_search() {
        let cli = CopilotCli::try_parse_from([
            "career-copilot",
            "search",
            "rust developer",
            "--location",
            "Berlin",
            "--limit",
            "5",
            "--no-linkedin",
        ])
        .unwrap();

        match cli.command {
            Some(CopilotCommand::Search {
                keywords,
                location,
                limit,
                remote,
                no_linkedin,
            }) => {
                assert_eq!(keywords, "rust developer");
                assert_eq!(location, "Berlin");
                assert_eq!(limit, Some(5));
                assert!(!remote);
                assert!(no_linkedin);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_chat() {
        let cli = CopilotCli::try_parse_from(["career-copilot", "chat", "find rust jobs"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(CopilotCommand::Chat { ref message, api_key: None }) if message == "find rust jobs"
        ));
    }
}
