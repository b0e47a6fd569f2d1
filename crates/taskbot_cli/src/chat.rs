use crate::cli::{Cli, TaskCommand};
use crate::render;
use clap::CommandFactory;
use std::io::{BufRead, Write};
use std::path::Path;
use taskbot_core::error::AppError;
use taskbot_core::responder::{Conversation, Responder};

const PROMPT: &str = "You: ";

/// Interactive session: task commands run against the store, everything else
/// goes to the responder. The conversation context lives here, one value per
/// session.
pub struct ChatSession<'a> {
    pub store: &'a Path,
    pub responder: &'a dyn Responder,
    pub json: bool,
    pub max_history_messages: usize,
}

impl ChatSession<'_> {
    pub fn run<R: BufRead, W: Write, E: Write>(
        &self,
        mut input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<(), AppError> {
        let mut context = Conversation::new(self.max_history_messages);
        let mut line = String::new();

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
                break;
            }

            if text.eq_ignore_ascii_case("help") || text == "?" {
                writeln!(out, "{}", Cli::command().render_help())?;
                continue;
            }

            match TaskCommand::recognize(text) {
                Ok(Some(command)) => {
                    if let Err(error) = render::run_command(self.store, &command, self.json, out) {
                        writeln!(err, "ERROR: {error}")?;
                    }
                }
                Ok(None) => match self.responder.respond(text, &context) {
                    Ok((reply, next)) => {
                        context = next;
                        writeln!(out, "Chatbot: {reply}")?;
                    }
                    Err(error) => {
                        tracing::warn!(%error, "responder failed for this turn");
                        writeln!(err, "ERROR: {error}")?;
                    }
                },
                Err(error) => writeln!(err, "ERROR: {error}")?,
            }
        }

        writeln!(out, "Chatbot: Goodbye!")?;
        Ok(())
    }
}
