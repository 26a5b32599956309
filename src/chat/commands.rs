//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to manage conversations without sending messages to the
//! API.

use crate::chat::conversation::Feedback;

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a new empty conversation.
    New,

    /// List conversations, newest first.
    List,

    /// Switch to a conversation by its listed number.
    Switch(usize),

    /// Rename the active conversation.
    Rename(String),

    /// Delete a conversation by its listed number.
    /// `None` deletes the active conversation.
    Delete(Option<usize>),

    /// Change the selected model.
    Model(String),

    /// List the model catalog.
    Models,

    /// Attach an image file to the next message.
    Attach(String),

    /// Clear the pending image attachment.
    ClearAttachment,

    /// Set feedback on a message in the active conversation, by its
    /// listed number.
    Feedback(usize, Feedback),

    /// Ask for a model recommendation for a query.
    Recommend(String),

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::New,
        "list" | "ls" => ChatCommand::List,
        "switch" => match argument.map(str::parse::<usize>) {
            Some(Ok(index)) if index > 0 => ChatCommand::Switch(index),
            Some(_) => ChatCommand::Invalid("/switch expects a conversation number".to_string()),
            None => ChatCommand::Invalid("/switch requires a conversation number".to_string()),
        },
        "rename" => match argument {
            Some(name) => ChatCommand::Rename(name.to_string()),
            None => ChatCommand::Invalid("/rename requires a new name".to_string()),
        },
        "delete" | "del" => match argument.map(str::parse::<usize>) {
            Some(Ok(index)) if index > 0 => ChatCommand::Delete(Some(index)),
            Some(_) => ChatCommand::Invalid("/delete expects a conversation number".to_string()),
            None => ChatCommand::Delete(None),
        },
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model id".to_string()),
        },
        "models" => ChatCommand::Models,
        "attach" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("clear") => ChatCommand::ClearAttachment,
            Some(path) => ChatCommand::Attach(path.to_string()),
            None => ChatCommand::Invalid("/attach requires an image file path".to_string()),
        },
        "feedback" => parse_feedback_command(argument),
        "recommend" => match argument {
            Some(query) => ChatCommand::Recommend(query.to_string()),
            None => ChatCommand::Invalid("/recommend requires a query".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_feedback_command(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid(
            "/feedback requires a message number and 'good' or 'bad'".to_string(),
        );
    };

    let mut parts = arg.splitn(2, ' ');
    let index = parts.next().unwrap_or_default().parse::<usize>();
    let value = parts.next().map(|s| s.trim().to_lowercase());

    let Ok(index) = index else {
        return ChatCommand::Invalid("/feedback expects a message number".to_string());
    };
    if index == 0 {
        return ChatCommand::Invalid("/feedback expects a message number".to_string());
    }
    match value.as_deref() {
        Some("good") => ChatCommand::Feedback(index, Feedback::Good),
        Some("bad") => ChatCommand::Feedback(index, Feedback::Bad),
        _ => ChatCommand::Invalid("/feedback expects 'good' or 'bad'".to_string()),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new conversation
  /list                  List conversations (newest first)
  /switch <n>            Switch to conversation n
  /rename <name>         Rename the active conversation
  /delete [n]            Delete conversation n (default: active), with confirmation
  /model <id>            Select a model (e.g., /model gemini-2.0-flash)
  /models                List available models
  /attach <file>         Attach an image to the next message (or 'clear')
  /feedback <n> good|bad Rate message n in the active conversation
  /recommend <query>     Ask for a model recommendation for a query
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_messages_are_not_commands() {
        assert!(parse_command("Hello there").is_none());
        assert!(parse_command("generate an image of a cat").is_none());
    }

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_new_and_list() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::New));
        assert_eq!(parse_command("/list"), Some(ChatCommand::List));
        assert_eq!(parse_command("/ls"), Some(ChatCommand::List));
    }

    #[test]
    fn parse_switch() {
        assert_eq!(parse_command("/switch 2"), Some(ChatCommand::Switch(2)));
        assert_eq!(
            parse_command("/switch"),
            Some(ChatCommand::Invalid(
                "/switch requires a conversation number".to_string()
            ))
        );
        assert_eq!(
            parse_command("/switch zero"),
            Some(ChatCommand::Invalid(
                "/switch expects a conversation number".to_string()
            ))
        );
        assert_eq!(
            parse_command("/switch 0"),
            Some(ChatCommand::Invalid(
                "/switch expects a conversation number".to_string()
            ))
        );
    }

    #[test]
    fn parse_rename() {
        assert_eq!(
            parse_command("/rename Weekend plans"),
            Some(ChatCommand::Rename("Weekend plans".to_string()))
        );
        assert_eq!(
            parse_command("/rename"),
            Some(ChatCommand::Invalid(
                "/rename requires a new name".to_string()
            ))
        );
    }

    #[test]
    fn parse_delete() {
        assert_eq!(parse_command("/delete"), Some(ChatCommand::Delete(None)));
        assert_eq!(parse_command("/delete 3"), Some(ChatCommand::Delete(Some(3))));
        assert_eq!(parse_command("/del 1"), Some(ChatCommand::Delete(Some(1))));
        assert_eq!(
            parse_command("/delete x"),
            Some(ChatCommand::Invalid(
                "/delete expects a conversation number".to_string()
            ))
        );
    }

    #[test]
    fn parse_model_commands() {
        assert_eq!(
            parse_command("/model gemini-2.0-flash"),
            Some(ChatCommand::Model("gemini-2.0-flash".to_string()))
        );
        assert_eq!(
            parse_command("/model"),
            Some(ChatCommand::Invalid("/model requires a model id".to_string()))
        );
        assert_eq!(parse_command("/models"), Some(ChatCommand::Models));
    }

    #[test]
    fn parse_attach() {
        assert_eq!(
            parse_command("/attach cat.png"),
            Some(ChatCommand::Attach("cat.png".to_string()))
        );
        assert_eq!(parse_command("/attach clear"), Some(ChatCommand::ClearAttachment));
        assert_eq!(
            parse_command("/attach"),
            Some(ChatCommand::Invalid(
                "/attach requires an image file path".to_string()
            ))
        );
    }

    #[test]
    fn parse_feedback() {
        assert_eq!(
            parse_command("/feedback 2 good"),
            Some(ChatCommand::Feedback(2, Feedback::Good))
        );
        assert_eq!(
            parse_command("/feedback 4 BAD"),
            Some(ChatCommand::Feedback(4, Feedback::Bad))
        );
        assert_eq!(
            parse_command("/feedback good"),
            Some(ChatCommand::Invalid(
                "/feedback expects a message number".to_string()
            ))
        );
        assert_eq!(
            parse_command("/feedback 2 meh"),
            Some(ChatCommand::Invalid(
                "/feedback expects 'good' or 'bad'".to_string()
            ))
        );
    }

    #[test]
    fn parse_recommend() {
        assert_eq!(
            parse_command("/recommend summarize a paper"),
            Some(ChatCommand::Recommend("summarize a paper".to_string()))
        );
    }

    #[test]
    fn unknown_commands_are_invalid() {
        assert_eq!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid("Unknown command: /frobnicate".to_string()))
        );
    }
}
