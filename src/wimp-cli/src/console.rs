//! A [`Host`] that renders listings as text lines.

use std::io::{BufRead, Write};
use wimp_plugin::{ContentType, DirectoryItem, Host, ResolvedItem};

/// Listing rows and resolved streams go to `out`; prompts and notifications
/// go to `prompt` so that `out` stays machine-readable.
pub struct ConsoleHost<R, W, P> {
    input: R,
    out: W,
    prompt: P,
}

impl<R: BufRead, W: Write, P: Write> ConsoleHost<R, W, P> {
    pub fn new(input: R, out: W, prompt: P) -> Self {
        Self { input, out, prompt }
    }

    fn emit(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::warn!(error = %err, "failed to write listing");
        }
    }

    fn tell(&mut self, line: &str) {
        if let Err(err) = writeln!(self.prompt, "{line}") {
            tracing::warn!(error = %err, "failed to write prompt");
        }
    }
}

fn describe(item: &DirectoryItem) -> String {
    let kind = if item.is_folder {
        "dir"
    } else if item.info.playable {
        "play"
    } else {
        "item"
    };
    let mut line = format!("[{kind}] {}", item.label);
    if let Some(artist) = item.info.artist.as_deref().filter(|_| !item.is_folder) {
        line.push_str(&format!(" - {artist}"));
    }
    if let Some(count) = item.info.track_count {
        line.push_str(&format!(" ({count} tracks)"));
    }
    if let Some(secs) = item.info.duration.filter(|_| !item.is_folder) {
        line.push_str(&format!(" [{}:{:02}]", secs / 60, secs % 60));
    }
    format!("{line}\t{}", item.url)
}

impl<R: BufRead, W: Write, P: Write> Host for ConsoleHost<R, W, P> {
    fn set_content(&mut self, content: ContentType) {
        tracing::debug!(content = content.as_str(), "listing content");
    }

    fn add_directory_items(&mut self, items: Vec<DirectoryItem>) {
        for item in &items {
            let line = describe(item);
            self.emit(&line);
        }
    }

    fn end_of_directory(&mut self, succeeded: bool) {
        if !succeeded {
            tracing::debug!("listing closed without results");
        }
        if let Err(err) = self.out.flush() {
            tracing::warn!(error = %err, "failed to flush listing");
        }
    }

    fn set_resolved_url(&mut self, item: ResolvedItem) {
        self.emit(&format!("{}\t{}", item.url, item.mime_type));
    }

    fn input(&mut self, heading: &str, hidden: bool) -> Option<String> {
        let marker = if hidden { " (not masked)" } else { "" };
        if let Err(err) = write!(self.prompt, "{heading}{marker}: ").and_then(|_| self.prompt.flush())
        {
            tracing::warn!(error = %err, "failed to write prompt");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let value = line.trim_end_matches(['\r', '\n']).to_string();
                (!value.is_empty()).then_some(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read input");
                None
            }
        }
    }

    fn notify(&mut self, message: &str) {
        self.tell(message);
    }
}
