//! Interactive chat application backed by the Gemini API.
//!
//! This binary provides a REPL interface for chatting with Gemini models,
//! with conversation history persisted locally between runs.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! nebula-chat
//!
//! # Specify a model
//! nebula-chat --model gemini-2.0-flash
//!
//! # Use a specific store file
//! nebula-chat --store ./conversations.json
//!
//! # Disable colors (useful for piping output)
//! nebula-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a new conversation
//! - `/list` - List conversations
//! - `/model <id>` - Change the model
//! - `/attach <file>` - Attach an image to the next message
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rand::seq::SliceRandom;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use nebula::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, ConversationStore, FileStorage, Sender,
    help_text, parse_command,
};
use nebula::{DataUri, Gemini, PlainTextRenderer, Renderer, catalog};

/// Prompts offered when the active conversation is empty.
const SUGGESTIONS: &[&str] = &[
    "Generate an image of a futuristic city skyline",
    "What are the advantages of using Next.js?",
    "Write code to demonstrate djikstra's algorithm",
    "Help me write an essay about silicon valley",
    "What is the weather In San Francisco?",
    "Explain quantum computing in simple terms",
    "Plan a 3-day trip to Paris",
    "What are some healthy breakfast ideas?",
    "Create a workout plan for a beginner",
    "How does blockchain technology work?",
    "Write a short story about a friendly robot",
    "What's the difference between AI, ML, and Deep Learning?",
    "Suggest a good book to read this month",
];

/// Main entry point for the nebula-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let (args, _) = ChatArgs::from_command_line_relaxed("nebula-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = Gemini::new(None)?;
    let store = ConversationStore::open(Box::new(FileStorage::new(&config.store_path)))?;
    let mut session = ChatSession::new(client, store);
    if let Some(model) = &config.model
        && !session.set_model(model)?
    {
        eprintln!("Unknown model: {model} (see /models)");
    }

    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Requests run to completion; Ctrl+C must not kill an in-flight turn.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Nebula Chat (model: {})", session.stats().model.id);
    println!("Type /help for commands, /quit to exit\n");
    if session
        .store()
        .active()
        .map(|c| c.messages.is_empty())
        .unwrap_or(true)
    {
        print_suggestions(&mut renderer);
    }

    let mut pending_image: Option<DataUri> = None;

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() && pending_image.is_none() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            session.new_chat()?;
                            renderer.info("Started a new conversation.");
                            print_suggestions(&mut renderer);
                        }
                        ChatCommand::List => {
                            print_conversations(&session);
                        }
                        ChatCommand::Switch(index) => {
                            match conversation_id_at(&session, index) {
                                Some(id) => {
                                    session.select(&id);
                                    let name = session
                                        .store()
                                        .get(&id)
                                        .map(|c| c.name.clone())
                                        .unwrap_or_default();
                                    renderer.info(&format!("Switched to: {name}"));
                                    print_active_conversation(&session, &mut renderer);
                                }
                                None => renderer.error("No such conversation."),
                            }
                        }
                        ChatCommand::Rename(name) => {
                            match session.store().active_id().map(str::to_string) {
                                Some(id) => {
                                    if session.rename(&id, &name)? {
                                        renderer.info(&format!("Renamed to: {}", name.trim()));
                                    } else {
                                        renderer.error("Name unchanged.");
                                    }
                                }
                                None => renderer.error("No active conversation."),
                            }
                        }
                        ChatCommand::Delete(index) => {
                            let target = match index {
                                Some(index) => conversation_id_at(&session, index),
                                None => session.store().active_id().map(str::to_string),
                            };
                            match target {
                                Some(id) => {
                                    delete_with_confirmation(&mut session, &mut rl, &mut renderer, &id)?;
                                }
                                None => renderer.error("No such conversation."),
                            }
                        }
                        ChatCommand::Model(model_id) => {
                            if session.set_model(&model_id)? {
                                renderer.info(&format!("Model changed to: {model_id}"));
                            } else {
                                renderer.error(&format!(
                                    "Unknown model: {model_id} (see /models)"
                                ));
                            }
                        }
                        ChatCommand::Models => {
                            print_models(&session);
                        }
                        ChatCommand::Attach(path) => match DataUri::from_path(&path) {
                            Ok(uri) => {
                                renderer.info(&format!(
                                    "Attached {path} ({}) to the next message.",
                                    uri.mime_type()
                                ));
                                pending_image = Some(uri);
                            }
                            Err(err) => renderer.error(&err.to_string()),
                        },
                        ChatCommand::ClearAttachment => {
                            pending_image = None;
                            renderer.info("Attachment cleared.");
                        }
                        ChatCommand::Feedback(index, feedback) => {
                            match message_id_at(&session, index) {
                                Some(id) => {
                                    if session.feedback(&id, feedback)? {
                                        renderer.info("Feedback recorded.");
                                    } else {
                                        renderer.error("Only model replies accept feedback.");
                                    }
                                }
                                None => renderer.error("No such message."),
                            }
                        }
                        ChatCommand::Recommend(query) => match session.recommend(&query).await {
                            Ok(recommendation) => {
                                renderer.info(&format!(
                                    "Recommended model: {} (confidence {:.0}%)",
                                    recommendation.recommended_model,
                                    recommendation.confidence * 100.0
                                ));
                            }
                            Err(err) => renderer.error(&err.to_string()),
                        },
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the backend
                println!("Gemini:");
                let image = pending_image.take();
                match session.submit(line, image).await {
                    Ok(Some(outcome)) => {
                        if let Some(reply) = &outcome.reply {
                            renderer.message(reply);
                        }
                        if let Some(notice) = &outcome.notice {
                            renderer.notice(notice);
                        }
                        if interrupted.load(Ordering::Relaxed) {
                            renderer.info("Requests run to completion; nothing was canceled.");
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        renderer.error(&e.to_string());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_suggestions(renderer: &mut PlainTextRenderer) {
    let mut rng = rand::thread_rng();
    let picks: Vec<&&str> = SUGGESTIONS.choose_multiple(&mut rng, 4).collect();
    renderer.info("How can I help you today? Try:");
    for suggestion in picks {
        println!("    - {suggestion}");
    }
}

fn conversation_id_at(session: &ChatSession<Gemini>, index: usize) -> Option<String> {
    session
        .store()
        .conversations()
        .get(index - 1)
        .map(|c| c.id.clone())
}

fn message_id_at(session: &ChatSession<Gemini>, index: usize) -> Option<String> {
    session
        .store()
        .active()
        .and_then(|c| c.messages.get(index - 1))
        .map(|m| m.id.clone())
}

fn print_conversations(session: &ChatSession<Gemini>) {
    let conversations = session.store().conversations();
    if conversations.is_empty() {
        println!("    Start a new chat to see your history.");
        return;
    }
    let active = session.store().active_id();
    for (i, convo) in conversations.iter().enumerate() {
        let marker = if active == Some(convo.id.as_str()) { "*" } else { " " };
        println!(
            "    {marker} {}. {} ({} messages)",
            i + 1,
            convo.name,
            convo.messages.len()
        );
    }
}

fn print_active_conversation(session: &ChatSession<Gemini>, renderer: &mut PlainTextRenderer) {
    let Some(convo) = session.store().active() else {
        return;
    };
    for message in &convo.messages {
        if message.sender == Sender::Loading {
            continue;
        }
        renderer.message(message);
    }
}

fn print_models(session: &ChatSession<Gemini>) {
    let selected = session.stats().model;
    println!("    Available models:");
    for model in catalog() {
        let marker = if model.id == selected.id { "*" } else { " " };
        println!("    {marker} {} ({})", model.name, model.id);
        println!("        {}", model.description);
    }
}

fn print_stats(session: &ChatSession<Gemini>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model.id);
    println!("      Conversations: {}", stats.conversation_count);
    println!("      Messages in active: {}", stats.active_messages);
    if stats.traffic.is_empty() {
        println!("      Traffic: (none)");
    } else {
        println!("      Traffic:");
        for (model, count) in &stats.traffic {
            println!("        {model}: {count}");
        }
    }
}

fn delete_with_confirmation(
    session: &mut ChatSession<Gemini>,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(name) = session.store().get(id).map(|c| c.name.clone()) else {
        renderer.error("No such conversation.");
        return Ok(());
    };
    let answer = rl
        .readline(&format!(
            "Permanently delete \"{name}\"? This cannot be undone. (y/N): "
        ))
        .unwrap_or_default();
    if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
        session.remove(id)?;
        renderer.info(&format!("Deleted: {name}"));
    } else {
        renderer.info("Canceled.");
    }
    Ok(())
}
