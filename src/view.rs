//! Transcript view and rendering surfaces
//!
//! [`ChatView`] owns the [`Transcript`] together with a [`Renderer`] that
//! draws it. The pair sits behind one mutex, so updates coming from
//! concurrent response handlers are applied one at a time, in the order
//! they reach the view.
//!
//! Two renderers are provided:
//!
//! - [`TerminalRenderer`] writes colored lines to the terminal, either
//!   directly or through a line editor's [`ExternalPrinter`] so output from
//!   background tasks does not land inside the prompt being edited.
//! - [`RecordingRenderer`] records every call for tests and headless use.

use crate::transcript::{Message, Transcript};
use colored::Colorize;
use rustyline::ExternalPrinter;
use std::sync::{Arc, Mutex, MutexGuard};

/// Drawing surface for the chat UI
pub trait Renderer: Send {
    /// Switch from the login surface to the chat surface
    fn show_chat(&mut self, username: &str);

    /// Draw one message at the bottom of the transcript
    fn append(&mut self, message: &Message);

    /// Remove every drawn message
    fn clear(&mut self);

    /// Show a message the user must acknowledge
    fn alert(&mut self, text: &str);
}

/// Separator drawn where the transcript is reset
const TRANSCRIPT_SEPARATOR: &str = "--- conversation ---";

/// Renderer writing to the terminal
///
/// Clearing draws a separator and keeps the scrollback, so the login
/// confirmation printed by [`Renderer::show_chat`] stays visible when the
/// history is replayed right after it.
#[derive(Default)]
pub struct TerminalRenderer {
    printer: Option<Box<dyn ExternalPrinter + Send>>,
}

impl TerminalRenderer {
    /// Create a renderer that prints straight to stdout and stderr
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that routes every line through `printer`
    ///
    /// Use this while a line editor owns the terminal: the printer redraws
    /// the prompt and any half-typed input below each line.
    pub fn with_printer(printer: impl ExternalPrinter + Send + 'static) -> Self {
        Self {
            printer: Some(Box::new(printer)),
        }
    }

    fn emit(&mut self, line: String, to_stderr: bool) {
        if let Some(printer) = self.printer.as_mut() {
            match printer.print(format!("{}\n", line)) {
                Ok(()) => return,
                Err(e) => tracing::warn!("External printer failed, writing directly: {}", e),
            }
        }
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

impl std::fmt::Debug for TerminalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRenderer")
            .field("external_printer", &self.printer.is_some())
            .finish()
    }
}

impl Renderer for TerminalRenderer {
    fn show_chat(&mut self, username: &str) {
        let line = format!("Logged in as {}. Type /help for commands.", username)
            .green()
            .to_string();
        self.emit(line, false);
    }

    fn append(&mut self, message: &Message) {
        let line = format!("{} {}", message.sender.colored_tag(), message.text);
        self.emit(line, false);
    }

    fn clear(&mut self) {
        self.emit(TRANSCRIPT_SEPARATOR.dimmed().to_string(), false);
    }

    fn alert(&mut self, text: &str) {
        let line = format!("{} {}", "!".red().bold(), text.red());
        self.emit(line, true);
    }
}

/// One call made against a [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// `show_chat` was called with this username
    ShowChat(String),
    /// `append` was called with this message
    Append(Message),
    /// `clear` was called
    Clear,
    /// `alert` was called with this text
    Alert(String),
}

/// Renderer that records calls instead of drawing
///
/// Clones share the same event log, so a test can hand one clone to a
/// [`ChatView`] and inspect the other.
///
/// # Examples
///
/// ```
/// use memchat::transcript::Message;
/// use memchat::view::{ChatView, RecordingRenderer, RenderEvent};
///
/// let recorder = RecordingRenderer::new();
/// let view = ChatView::new(recorder.clone());
/// view.append(Message::user("hello"));
///
/// assert_eq!(recorder.events(), vec![RenderEvent::Append(Message::user("hello"))]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded event, oldest first
    pub fn events(&self) -> Vec<RenderEvent> {
        lock(&self.events).clone()
    }

    /// Alert texts only, oldest first
    pub fn alerts(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Alert(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: RenderEvent) {
        lock(&self.events).push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn show_chat(&mut self, username: &str) {
        self.record(RenderEvent::ShowChat(username.to_string()));
    }

    fn append(&mut self, message: &Message) {
        self.record(RenderEvent::Append(message.clone()));
    }

    fn clear(&mut self) {
        self.record(RenderEvent::Clear);
    }

    fn alert(&mut self, text: &str) {
        self.record(RenderEvent::Alert(text.to_string()));
    }
}

struct ViewInner {
    transcript: Transcript,
    renderer: Box<dyn Renderer>,
}

/// Shared handle to the transcript and its renderer
///
/// Cloning is cheap and every clone addresses the same transcript.
#[derive(Clone)]
pub struct ChatView {
    inner: Arc<Mutex<ViewInner>>,
}

impl ChatView {
    /// Wrap a renderer with an empty transcript
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewInner {
                transcript: Transcript::new(),
                renderer: Box::new(renderer),
            })),
        }
    }

    /// Switch the surface to the chat view
    pub fn show_chat(&self, username: &str) {
        lock(&self.inner).renderer.show_chat(username);
    }

    /// Append one message and draw it
    pub fn append(&self, message: Message) {
        let mut inner = lock(&self.inner);
        inner.renderer.append(&message);
        inner.transcript.push(message);
    }

    /// Clear the transcript and the surface
    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        inner.transcript.clear();
        inner.renderer.clear();
    }

    /// Replace the transcript with `messages` as one update
    ///
    /// No other update can land between the clear and the last append.
    pub fn replace_all(&self, messages: impl IntoIterator<Item = Message>) -> usize {
        let mut inner = lock(&self.inner);
        inner.transcript.clear();
        inner.renderer.clear();
        let mut count = 0;
        for message in messages {
            inner.renderer.append(&message);
            inner.transcript.push(message);
            count += 1;
        }
        count
    }

    /// Show an alert
    pub fn alert(&self, text: &str) {
        lock(&self.inner).renderer.alert(text);
    }

    /// Copy of the transcript as currently rendered
    pub fn snapshot(&self) -> Transcript {
        lock(&self.inner).transcript.clone()
    }

    /// Number of rendered messages
    pub fn len(&self) -> usize {
        lock(&self.inner).transcript.len()
    }

    /// True when nothing is rendered
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).transcript.is_empty()
    }
}

impl std::fmt::Debug for ChatView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatView")
            .field("messages", &self.len())
            .finish()
    }
}

// A renderer panicking mid-draw must not take the transcript down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Sender;

    /// Printer capturing every line it is handed
    #[derive(Clone, Default)]
    struct CapturePrinter {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl CapturePrinter {
        fn lines(&self) -> Vec<String> {
            lock(&self.lines).clone()
        }
    }

    impl ExternalPrinter for CapturePrinter {
        fn print(&mut self, msg: String) -> rustyline::Result<()> {
            lock(&self.lines).push(msg);
            Ok(())
        }
    }

    #[test]
    fn test_terminal_renderer_routes_lines_through_printer() {
        let printer = CapturePrinter::default();
        let view = ChatView::new(TerminalRenderer::with_printer(printer.clone()));

        view.append(Message::user("hello"));
        view.alert("rate limited");

        let lines = printer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("hello"));
        assert!(lines[0].ends_with('\n'));
        assert!(lines[1].contains("rate limited"));
    }

    #[test]
    fn test_terminal_clear_keeps_login_confirmation_visible() {
        let printer = CapturePrinter::default();
        let view = ChatView::new(TerminalRenderer::with_printer(printer.clone()));

        view.show_chat("alice");
        view.replace_all(vec![Message::bot("welcome back")]);

        let lines = printer.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Logged in as alice"));
        assert!(lines[1].contains(TRANSCRIPT_SEPARATOR));
        assert!(lines[2].contains("welcome back"));
        assert!(lines.iter().all(|line| !line.contains("\x1B[2J")));
    }

    #[test]
    fn test_append_records_and_renders_in_order() {
        let recorder = RecordingRenderer::new();
        let view = ChatView::new(recorder.clone());

        view.append(Message::user("hello"));
        view.append(Message::bot("hi"));

        assert_eq!(
            recorder.events(),
            vec![
                RenderEvent::Append(Message::user("hello")),
                RenderEvent::Append(Message::bot("hi")),
            ]
        );
        assert_eq!(view.len(), 2);
        assert_eq!(view.snapshot().messages()[1].sender, Sender::Bot);
    }

    #[test]
    fn test_duplicate_appends_are_kept() {
        let view = ChatView::new(RecordingRenderer::new());
        view.append(Message::user("same"));
        view.append(Message::user("same"));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_clear_empties_transcript() {
        let recorder = RecordingRenderer::new();
        let view = ChatView::new(recorder.clone());
        view.append(Message::user("old"));

        view.clear();

        assert!(view.is_empty());
        assert_eq!(recorder.events().last(), Some(&RenderEvent::Clear));
    }

    #[test]
    fn test_replace_all_clears_then_appends() {
        let recorder = RecordingRenderer::new();
        let view = ChatView::new(recorder.clone());
        view.append(Message::user("stale"));

        let count = view.replace_all(vec![Message::user("a"), Message::bot("b")]);

        assert_eq!(count, 2);
        assert_eq!(
            view.snapshot().messages(),
            &[Message::user("a"), Message::bot("b")]
        );
        assert_eq!(
            recorder.events(),
            vec![
                RenderEvent::Append(Message::user("stale")),
                RenderEvent::Clear,
                RenderEvent::Append(Message::user("a")),
                RenderEvent::Append(Message::bot("b")),
            ]
        );
    }

    #[test]
    fn test_alert_does_not_touch_transcript() {
        let recorder = RecordingRenderer::new();
        let view = ChatView::new(recorder.clone());
        view.alert("rate limited");

        assert!(view.is_empty());
        assert_eq!(recorder.alerts(), vec!["rate limited".to_string()]);
    }

    #[test]
    fn test_clones_share_transcript() {
        let view = ChatView::new(RecordingRenderer::new());
        let other = view.clone();
        other.append(Message::bot("shared"));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_are_all_applied() {
        let view = ChatView::new(RecordingRenderer::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let view = view.clone();
                std::thread::spawn(move || view.append(Message::bot(format!("reply {}", i))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(view.len(), 8);
    }
}
