//! Terminal chat client for relay-service.
//!
//! Reads prompts from stdin and prints replies. Lines starting with `/` are
//! commands; see `/help`.

use relay_service::models::ModelKey;
use relay_service::session::{ChatSession, RelayClient, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_RELAY_URL: &str = "http://localhost:8080";

const HELP: &str = "\
Commands:
  /new            start a new chat (memories are kept)
  /model <key>    switch model (fom, rvm)
  /memories       list recent memories
  /recall <n>     resend the prompt of memory n
  /help           show this help
  /quit           exit";

enum Command {
    NewChat,
    Model(Option<ModelKey>),
    Memories,
    Recall(Option<usize>),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let rest = line.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    Some(match name {
        "new" => Command::NewChat,
        "model" => Command::Model(arg.and_then(ModelKey::parse)),
        "memories" => Command::Memories,
        "recall" => Command::Recall(arg.and_then(|n| n.parse().ok())),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    })
}

fn print_welcome(session: &ChatSession) {
    println!("{}", relay_service::session::WELCOME_MESSAGE);
    if let Some(prompts) = session.quick_prompts() {
        println!("Try one of:");
        for prompt in prompts {
            println!("  - {}", prompt);
        }
    }
}

fn print_memories(session: &ChatSession) {
    if session.memories().is_empty() {
        println!("No memories yet.");
        return;
    }
    for (n, memory) in session.memories().iter().enumerate() {
        println!(
            "[{}] {} | {} | ~{} tokens | {}",
            n + 1,
            memory.model_name,
            memory.timestamp.format("%H:%M:%S"),
            memory.estimated_tokens,
            memory.prompt
        );
        println!("    {}", memory.response);
    }
}

async fn send(session: &mut ChatSession, client: &RelayClient, prompt: &str) {
    let turn = match session.begin_send(prompt) {
        Ok(turn) => turn,
        Err(SessionError::EmptyPrompt) => return,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    if let Some(placeholder) = session.pending_message() {
        println!("{}", placeholder.content);
    }

    let outcome = client.generate(turn.prompt(), turn.model()).await;
    match session.complete(turn, outcome) {
        Ok(reply) => println!("\n{}\n", reply.content),
        Err(e) => eprintln!("{}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let base_url = std::env::var("RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
    let client = RelayClient::new(base_url);
    let mut session = ChatSession::new();

    session.check_health(&client).await;
    for notice in session.messages() {
        println!("{}", notice.content);
    }
    print_welcome(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        let Some(command) = parse_command(line) else {
            send(&mut session, &client, line).await;
            continue;
        };

        match command {
            Command::NewChat => {
                session.new_chat();
                print_welcome(&session);
            }
            Command::Model(Some(key)) => println!("{}", session.switch_model(key).content),
            Command::Model(None) => println!("Usage: /model <fom|rvm>"),
            Command::Memories => print_memories(&session),
            Command::Recall(n) => {
                let prompt = n
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| session.memories().iter().nth(i))
                    .and_then(|memory| session.recall(memory.id))
                    .map(str::to_string);
                match prompt {
                    Some(prompt) => {
                        println!("> {}", prompt);
                        send(&mut session, &client, &prompt).await;
                    }
                    None => println!("No such memory. Use /memories to list them."),
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(name) => println!("Unknown command /{}. Use /help.", name),
        }
    }

    Ok(())
}
