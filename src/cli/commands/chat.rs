//! Chat command - interactive question loop over one index
//!
//! Reads one question per line. A failed question reports its error
//! and the loop continues; `:quit` or end of input ends the session.
//!
//! Commands:
//! - `:history` prints earlier exchanges, most recent first
//! - `:clear` forgets the history
//! - `:quit` / `:q` ends the chat

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::session::ChatSession;
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Index name (defaults to storage.default_index)
    #[arg(long, short = 'i')]
    pub index: Option<String>,

    /// Number of chunks to retrieve per question
    #[arg(short = 'k', long)]
    pub k: Option<usize>,
}

/// Execute the chat command on stdin/stdout
pub async fn execute(
    args: ChatArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    execute_with_io(args, services, format, stdin, &mut stdout).await
}

/// Run the chat loop over arbitrary input and output streams
pub async fn execute_with_io<R: AsyncBufRead + Unpin, W: Write>(
    args: ChatArgs,
    services: &Arc<Services>,
    format: OutputFormat,
    mut input: R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ChatSession::new(services.index_name(args.index.as_deref()));
    let human = format == OutputFormat::Human;

    if human {
        writeln!(
            out,
            "Chatting with '{}'. Type {} to exit.",
            colors::index_name(&session.index),
            colors::label(":quit")
        )?;
    }

    let mut line = String::new();
    loop {
        if human {
            write!(out, "{} ", colors::label(">"))?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            break;
        }

        let question = line.trim();
        match question {
            "" => continue,
            ":quit" | ":q" => break,
            ":clear" => {
                session.clear();
                if human {
                    writeln!(out, "{}", colors::dim("History cleared."))?;
                }
                continue;
            }
            ":history" => {
                print_history(&session, format, out)?;
                continue;
            }
            _ => {}
        }

        match services.ask_in_session(&mut session, question, args.k).await {
            Ok(answer) => match format {
                OutputFormat::Human => writeln!(out, "{}\n", answer.answer.trim_end())?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&answer)?)?,
            },
            Err(e) => {
                tracing::warn!("Question failed in {}: {}", session.id, e);
                match format {
                    OutputFormat::Human => {
                        writeln!(out, "{}: {}", colors::error("Error"), e.message())?
                    }
                    OutputFormat::Json => writeln!(
                        out,
                        "{}",
                        serde_json::json!({ "question": question, "error": e.message() })
                    )?,
                }
            }
        }
    }

    if human {
        writeln!(
            out,
            "{}",
            colors::dim(&format!("Session ended after {} question(s).", session.len()))
        )?;
    }

    Ok(())
}

fn print_history<W: Write>(
    session: &ChatSession,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Human => {
            if session.is_empty() {
                writeln!(out, "{}", colors::dim("No questions yet."))?;
            }
            for exchange in session.history() {
                writeln!(out, "{} {}", colors::label("Q:"), exchange.question)?;
                writeln!(out, "{} {}", colors::label("A:"), exchange.answer.trim_end())?;
            }
        }
        OutputFormat::Json => {
            let history: Vec<_> = session.history().collect();
            let json = serde_json::to_string(&history).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}
