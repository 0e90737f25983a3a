//! pdf-chat: terminal front-end.
//! Reads config, takes a message from an argument or stdin plus an optional
//! --file PDF, submits it to the relay, and prints the streamed answer.

use pdf_chat_client::{config, Attachment, Session, StreamEvent};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

#[derive(Default)]
struct CliArgs {
    config: Option<PathBuf>,
    file: Option<PathBuf>,
    message: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut out = CliArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if let Some(v) = args.get(i + 1) {
                    out.config = Some(PathBuf::from(v));
                    i += 1;
                }
            }
            "--file" => {
                if let Some(v) = args.get(i + 1) {
                    out.file = Some(PathBuf::from(v));
                    i += 1;
                }
            }
            other => {
                if out.message.is_none() {
                    out.message = Some(other.to_string());
                }
            }
        }
        i += 1;
    }
    out
}

fn resolve_config_path(flag: Option<PathBuf>) -> PathBuf {
    // 1. --config <path> flag
    if let Some(path) = flag {
        return path;
    }
    // 2. PDF_CHAT_CONFIG env var
    if let Ok(val) = std::env::var("PDF_CHAT_CONFIG") {
        return PathBuf::from(val);
    }
    // 3. Default path (~/.pdf-chat/config.yaml)
    config::default_config_path().unwrap_or_else(|| {
        eprintln!("Error: unable to determine config path (set --config or PDF_CHAT_CONFIG)");
        process::exit(1);
    })
}

fn main() {
    let args = parse_args();
    let config_path = resolve_config_path(args.config);

    let cfg = match config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Error: failed to load config from {}: {}",
                config_path.display(),
                e
            );
            process::exit(1);
        }
    };

    let relay_url = cfg
        .client
        .relay_url
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

    // Message from the positional argument, else the first stdin line.
    let message = match args.message {
        Some(m) => m,
        None => {
            let stdin = io::stdin();
            let mut line = String::new();
            stdin.lock().read_line(&mut line).unwrap_or(0);
            line.trim().to_string()
        }
    };

    if message.is_empty() {
        eprintln!("Error: no message provided");
        process::exit(1);
    }

    let attachment = args.file.map(|path| match Attachment::read(&path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", path.display(), e);
            process::exit(1);
        }
    });

    // Run the async submission on a tokio runtime.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    rt.block_on(async {
        let session = Session::new(&relay_url);
        let stdout = io::stdout();
        let mut out = stdout.lock();

        // Print only the newly arrived suffix of each progress report.
        let mut printed = 0usize;
        let result = session
            .submit(&message, attachment, |event| match event {
                StreamEvent::Progress(accumulated) => {
                    let _ = write!(out, "{}", &accumulated[printed..]);
                    let _ = out.flush();
                    printed = accumulated.len();
                }
                StreamEvent::Complete(_) => {
                    let _ = writeln!(out);
                }
            })
            .await;

        if let Err(e) = result {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    });
}
