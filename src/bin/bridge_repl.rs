// ABOUTME: Interactive REPL driving the bridge against the mock Crisp SDK.
// ABOUTME: Usage: bridge-repl [seed-config.toml]

use crisp_bridge::backends::mock::{MockCrisp, MockSurface};
use crisp_bridge::{
    ActivityResult, BridgeHandle, Command, CommandReply, CrispConfig, ReplyReceiver,
    CHAT_REQUEST_CODE, RESULT_CANCELED, RESULT_OK,
};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_colored(color: &str, text: &str) {
    let code = match color {
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "cyan" => "\x1b[36m",
        "red" => "\x1b[31m",
        "dim" => "\x1b[2m",
        "bold" => "\x1b[1m",
        _ => "",
    };
    print!("{}{}\x1b[0m", code, text);
}

fn println_colored(color: &str, text: &str) {
    print_colored(color, text);
    println!();
}

fn print_help() {
    println!();
    println_colored("bold", "Commands:");
    println!("  /open                - openCrispChat with the seed config");
    println!("  /close [code]        - simulate the chat window closing (default: ok)");
    println!("  /cancel              - simulate the user canceling the chat");
    println!("  /reset               - resetCrispChatSession");
    println!("  /id                  - getSessionIdentifier");
    println!("  /set KEY VALUE       - setSessionString");
    println!("  /setint KEY VALUE    - setSessionInt");
    println!("  /segments A,B,...    - setSessionSegments (overwrite)");
    println!("  /attach, /detach     - attach or detach the host surface");
    println!("  /quit, /help");
    println!();
}

fn print_reply(reply: &CommandReply) {
    match reply {
        CommandReply::Success { value: None } => println_colored("green", "ok"),
        CommandReply::Success { value: Some(v) } => {
            println_colored("green", &format!("ok: {}", v))
        }
        CommandReply::Error {
            code,
            message,
            details,
        } => {
            print_colored("red", &format!("error [{}] {}", code.as_str(), message));
            if let Some(details) = details {
                print_colored("dim", &format!(" ({})", details));
            }
            println!();
        }
    }
}

async fn deliver_close(
    handle: &BridgeHandle,
    pending: &mut Option<ReplyReceiver>,
    result_code: i32,
) {
    match handle
        .activity_result(ActivityResult::new(CHAT_REQUEST_CODE, result_code))
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            println_colored("yellow", "Result was not consumed by the bridge");
            return;
        }
        Err(e) => {
            println_colored("red", &format!("Error: {}", e));
            return;
        }
    }

    match pending.take() {
        Some(rx) => match rx.recv().await {
            Ok(reply) => print_reply(&reply),
            Err(e) => println_colored("red", &format!("Error: {}", e)),
        },
        None => println_colored("yellow", "No caller was waiting for the chat to close"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let seed_path = args.get(1).map(Path::new);
    let seed = match CrispConfig::load_seed(seed_path) {
        Ok(seed) => seed,
        Err(_) => {
            println_colored(
                "dim",
                "No seed config found; using a placeholder website id",
            );
            CrispConfig::from_bag(&json!({"websiteId": "demo-website"}))?
        }
    };

    println!();
    println_colored("bold", "crisp-bridge REPL (mock SDK)");
    println!("Website: {}", seed.website_id);

    let sdk = Arc::new(MockCrisp::new().with_session("session_demo"));
    let handle = BridgeHandle::spawn(sdk.clone());
    let surface = Arc::new(MockSurface::new());
    handle.attach_surface(surface.clone()).await?;
    println_colored("green", "Bridge running, host surface attached");
    print_help();

    // Receiver of the caller currently waiting for the chat to close
    let mut pending: Option<ReplyReceiver> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print_colored("bold", ">>> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let word = parts.next().unwrap_or("");

        match word {
            "/quit" | "/exit" | "/q" => {
                println_colored("dim", "Goodbye!");
                break;
            }
            "/help" | "/?" => print_help(),
            "/open" => {
                let bag = serde_json::to_value(&seed)?;
                let rx = handle.invoke(Command::with_args("openCrispChat", bag)).await?;
                if pending.replace(rx).is_some() {
                    println_colored("yellow", "Earlier /open displaced; it will never resolve");
                }
                println_colored("cyan", "Chat opened; /close or /cancel to finish it");
            }
            "/close" => {
                let code = parts
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(RESULT_OK);
                deliver_close(&handle, &mut pending, code).await;
            }
            "/cancel" => deliver_close(&handle, &mut pending, RESULT_CANCELED).await,
            "/reset" => print_reply(&handle.call(Command::bare("resetCrispChatSession")).await?),
            "/id" => print_reply(&handle.call(Command::bare("getSessionIdentifier")).await?),
            "/set" => match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => {
                    let cmd = Command::with_args(
                        "setSessionString",
                        json!({"key": key, "value": value}),
                    );
                    print_reply(&handle.call(cmd).await?);
                }
                _ => println_colored("red", "Usage: /set KEY VALUE"),
            },
            "/setint" => match (parts.next(), parts.next().and_then(|v| v.parse::<i64>().ok())) {
                (Some(key), Some(value)) => {
                    let cmd =
                        Command::with_args("setSessionInt", json!({"key": key, "value": value}));
                    print_reply(&handle.call(cmd).await?);
                }
                _ => println_colored("red", "Usage: /setint KEY INTEGER"),
            },
            "/segments" => match parts.next() {
                Some(list) => {
                    let segments: Vec<&str> = list.split(',').filter(|s| !s.is_empty()).collect();
                    let cmd = Command::with_args(
                        "setSessionSegments",
                        json!({"segments": segments, "overwrite": true}),
                    );
                    print_reply(&handle.call(cmd).await?);
                }
                None => println_colored("red", "Usage: /segments A,B,C"),
            },
            "/attach" => {
                handle.attach_surface(surface.clone()).await?;
                println_colored("green", "Surface attached");
            }
            "/detach" => {
                handle.detach_surface().await?;
                println_colored("yellow", "Surface detached");
            }
            other => {
                // Anything unprefixed goes through the router as-is, which
                // demonstrates the NOT_IMPLEMENTED path.
                print_reply(&handle.call(Command::bare(other)).await?);
            }
        }
    }

    handle.shutdown().await.ok();
    Ok(())
}
