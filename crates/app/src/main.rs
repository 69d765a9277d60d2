//! Terminal driver for the chat relay.
//!
//! Deliberately thin: reads lines, hands them to the controller, prints
//! replies. A few slash commands cover what the chat surface offered:
//! backend selection, attachments, saving a generated file.

use anyhow::{anyhow, Context, Result};
use chat::attachments::format_file_size;
use chat::{catalog, ChatController, Message, Sender};
use providers::HttpDispatcher;
use shared::chat_api::{Attachment, GeneratedFile};
use shared::settings::ChatSettings;
use std::io::{self, Write as _};
use std::path::Path;

const HELP: &str = "commands:
  /backends          list selectable backends
  /backend <id>      switch backend
  /attach <path>     stage a file for the next message
  /detach <n>        unstage file n (zero-based)
  /files             list staged files
  /save              write the most recent generated file to disk
  /quit              exit";

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn load_attachment(path: &Path) -> Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("not a file path: {}", path.display()))?;
    Ok(Attachment::new(name, mime_for_path(path), bytes))
}

fn print_message(message: &Message) {
    let tag = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    println!("[{tag}] {}", message.content);
    for info in &message.attachments {
        println!("      ({}, {})", info.name, format_file_size(info.size_bytes));
    }
    if let Some(file) = &message.download {
        println!(
            "      generated file: {} ({}), /save to keep it",
            file.name,
            format_file_size(file.size_bytes)
        );
    }
}

fn save_file(file: &GeneratedFile) -> Result<()> {
    std::fs::write(&file.name, &file.content).with_context(|| format!("write {}", file.name))?;
    println!("saved {} ({})", file.name, format_file_size(file.size_bytes));
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = ChatSettings::from_env();
    let dispatcher = HttpDispatcher::new(&settings)?;
    let mut controller = ChatController::new(
        Box::new(dispatcher),
        settings.user_name.clone(),
        catalog::resolve(&settings.completion.default_model),
    );
    tracing::info!(session = %controller.session_id(), "chat session started");

    if let Some(greeting) = controller.messages().first() {
        print_message(greeting);
    }
    println!("{HELP}");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(rest) = input.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or_default();
            let arg = parts.next().unwrap_or_default().trim();
            match command {
                "quit" | "exit" => break,
                "help" => println!("{HELP}"),
                "backends" => {
                    for entry in catalog::BACKENDS {
                        println!("  {:<16} {} ({})", entry.id, entry.name, entry.description);
                    }
                }
                "backend" => {
                    if arg.is_empty() {
                        println!("usage: /backend <id>");
                    } else {
                        if catalog::lookup(arg).is_none() {
                            println!("(unlisted id; treating it as a completion model name)");
                        }
                        controller.select_backend(catalog::resolve(arg));
                        println!("backend set to {arg}");
                    }
                }
                "attach" => match load_attachment(Path::new(arg)) {
                    Ok(file) => {
                        let staged_name = file.name.clone();
                        for warning in controller.attach(vec![file]) {
                            println!("warning: {warning}");
                        }
                        if controller
                            .pending_files()
                            .iter()
                            .any(|f| f.name == staged_name)
                        {
                            println!("staged {staged_name}");
                        }
                    }
                    Err(e) => println!("couldn't attach: {e:#}"),
                },
                "detach" => match arg.parse::<usize>() {
                    Ok(index) => controller.remove_attachment(index),
                    Err(_) => println!("usage: /detach <n>"),
                },
                "files" => {
                    for (i, file) in controller.pending_files().iter().enumerate() {
                        println!(
                            "  {i}: {} ({}, {})",
                            file.name,
                            file.mime_type,
                            format_file_size(file.size_bytes())
                        );
                    }
                }
                "save" => {
                    let file = controller
                        .messages()
                        .iter()
                        .rev()
                        .find_map(|m| m.download.clone());
                    match file {
                        Some(file) => {
                            if let Err(e) = save_file(&file) {
                                println!("couldn't save: {e:#}");
                            }
                        }
                        None => println!("no generated file in this session"),
                    }
                }
                _ => println!("unknown command; /help for the list"),
            }
            continue;
        }

        controller.set_input(input);
        if !controller.can_send() {
            continue;
        }
        let before = controller.messages().len();
        controller.send().await;
        for message in &controller.messages()[before..] {
            print_message(message);
        }
    }

    Ok(())
}
