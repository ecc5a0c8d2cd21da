//! Best-effort delivery of a finished transcript or summary.
//!
//! Delivery never fails the caller: the text has already been computed, so a
//! clipboard or output error only changes how the user is told about it.

use std::io::{self, Write};
use std::process::Stdio;

use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, warn};

use crate::{
    error::Result,
    format::{PREVIEW_CHARS, preview},
};

pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<()>;
}

pub trait Notifier {
    fn notify(&self, message: &str) -> Result<()>;
}

/// What is being handed to the user.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    Transcript(&'a str),
    Summary(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Copied to the clipboard and announced.
    Copied,
    /// Shown through the notifier only.
    Displayed,
    /// Both channels failed; the text was only logged.
    Lost,
}

impl Payload<'_> {
    fn text(&self) -> &str {
        match self {
            Payload::Transcript(text) | Payload::Summary(text) => *text,
        }
    }

    fn copied_message(&self) -> String {
        match self {
            Payload::Transcript(text) => format!(
                "Transcript fetched (copied to clipboard):\n\n{}",
                preview(text, PREVIEW_CHARS)
            ),
            Payload::Summary(text) => format!("Summary (copied to clipboard):\n\n{}", text),
        }
    }

    fn plain_message(&self, clipboard_failed: bool) -> String {
        match self {
            Payload::Transcript(text) if text.is_empty() => {
                "Transcript fetched, but the caption track contained no text.".to_string()
            }
            Payload::Transcript(text) if clipboard_failed => format!(
                "Transcript fetched but couldn't copy to clipboard automatically.\n\n{}",
                text
            ),
            Payload::Transcript(text) => format!("Transcript:\n\n{}", text),
            Payload::Summary(text) => format!("Summary:\n\n{}", text),
        }
    }
}

/// Copy `payload` to the clipboard and announce it, falling back to a plain notification.
pub async fn deliver<C, N>(clipboard: Option<&C>, notifier: &N, payload: Payload<'_>) -> Delivery
where
    C: Clipboard,
    N: Notifier,
{
    let mut clipboard_failed = false;

    if let Some(clipboard) = clipboard.filter(|_| !payload.text().is_empty()) {
        match clipboard.write_text(payload.text()).await {
            Ok(()) => match notifier.notify(&payload.copied_message()) {
                Ok(()) => return Delivery::Copied,
                Err(e) => warn!(error = %e, "notification after copy failed"),
            },
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                clipboard_failed = true;
            }
        }
    }

    match notifier.notify(&payload.plain_message(clipboard_failed)) {
        Ok(()) => Delivery::Displayed,
        Err(e) => {
            warn!(error = %e, text = payload.text(), "could not display result");
            Delivery::Lost
        }
    }
}

/// Clipboard backed by the platform's copy command.
#[derive(Clone, Debug, Default)]
pub struct SystemClipboard;

struct CopyCommand {
    program: &'static str,
    args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const COPY_COMMANDS: &[CopyCommand] = &[CopyCommand {
    program: "pbcopy",
    args: &[],
}];

#[cfg(target_os = "windows")]
const COPY_COMMANDS: &[CopyCommand] = &[CopyCommand {
    program: "clip",
    args: &[],
}];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const COPY_COMMANDS: &[CopyCommand] = &[
    CopyCommand {
        program: "wl-copy",
        args: &[],
    },
    CopyCommand {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
    CopyCommand {
        program: "xsel",
        args: &["--clipboard", "--input"],
    },
];

impl SystemClipboard {
    async fn pipe_to(program: &str, args: &[&str], text: &str) -> io::Result<()> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(io::Error::other(format!("{} exited with {}", program, status)));
        }
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut last_error = io::Error::new(io::ErrorKind::NotFound, "no clipboard command");
        for command in COPY_COMMANDS {
            match Self::pipe_to(command.program, command.args, text).await {
                Ok(()) => {
                    debug!(program = command.program, "copied to clipboard");
                    return Ok(());
                }
                Err(e) => last_error = e,
            }
        }
        Err(last_error.into())
    }
}

/// Notifier that prints to standard output.
#[derive(Clone, Debug, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", message)?;
        stdout.flush()?;
        Ok(())
    }
}
