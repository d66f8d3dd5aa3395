use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use client_core::{NotificationKind, Notifier, Prompter};

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => println!("{message}"),
            NotificationKind::Warning => eprintln!("warning: {message}"),
            NotificationKind::Error => eprintln!("error: {message}"),
        }
    }
}

/// Answers from command-line flags when given, otherwise asks on stdin.
pub struct TerminalPrompter {
    position: Option<String>,
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(position: Option<String>, assume_yes: bool) -> Self {
        Self {
            position,
            assume_yes,
        }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn prompt(&self, message: &str) -> Option<String> {
        if let Some(position) = &self.position {
            return Some(position.clone());
        }
        read_answer(format!("{message} ")).await
    }

    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        read_answer(format!("{message} [y/N] "))
            .await
            .is_some_and(|answer| is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads one line from stdin. End of input counts as a dismissed prompt.
async fn read_answer(question: String) -> Option<String> {
    tokio::task::spawn_blocking(move || {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "{question}");
        let _ = stdout.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    })
    .await
    .ok()
    .flatten()
}
