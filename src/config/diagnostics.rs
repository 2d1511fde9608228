//! Pending diagnostics and the user-facing notification surface.
//!
//! Configuration is resolved before any log subscriber exists. Messages
//! produced in that window are buffered in [`Diagnostics`] and flushed, in
//! order, once [`Diagnostics::attach`] is called.

use std::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational.
    Info,
    /// Something was ignored or repaired.
    Warn,
    /// Something failed, startup continues.
    Error,
}

/// One message destined for the log, and optionally for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the message is.
    pub severity: Severity,
    /// The message text.
    pub message: String,
    /// Whether the message is also shown through the [`Notifier`].
    pub notify: bool,
}

impl Diagnostic {
    /// Creates an informational, log-only diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            notify: false,
        }
    }

    /// Creates a log-only warning.
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            message: message.into(),
            notify: false,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            notify: false,
        }
    }

    /// Marks the diagnostic as user-visible.
    #[must_use]
    pub const fn notify_user(mut self) -> Self {
        self.notify = true;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// User-facing notification surface (dialogs, status bar, console).
pub trait Notifier {
    /// Shows an informational message.
    fn show_information(&self, message: &str);

    /// Shows a warning.
    fn show_warning(&self, message: &str);

    /// Shows an error.
    fn show_error(&self, message: &str);
}

/// Notifier writing to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_information(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_warning(&self, message: &str) {
        eprintln!("Warning: {message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

/// Buffer for diagnostics raised before logging is wired up.
#[derive(Default)]
pub struct Diagnostics {
    pending: Vec<Diagnostic>,
    notifier: Option<Box<dyn Notifier>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("pending", &self.pending)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Diagnostics {
    /// Creates an empty, unattached buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once [`Self::attach`] was called.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.notifier.is_some()
    }

    /// Diagnostics waiting for the logger.
    #[must_use]
    pub fn pending(&self) -> &[Diagnostic] {
        &self.pending
    }

    /// Records a diagnostic, emitting it immediately when attached.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match &self.notifier {
            Some(notifier) => emit(&diagnostic, notifier.as_ref()),
            None => self.pending.push(diagnostic),
        }
    }

    /// Records several diagnostics in order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    /// Attaches the notifier and flushes everything buffered so far.
    ///
    /// Attaching twice keeps the first notifier.
    pub fn attach(&mut self, notifier: Box<dyn Notifier>) {
        if self.is_attached() {
            return;
        }

        for diagnostic in self.pending.drain(..) {
            emit(&diagnostic, notifier.as_ref());
        }
        self.notifier = Some(notifier);
    }

    /// The attached notifier, if any.
    #[must_use]
    pub fn notifier(&self) -> Option<&dyn Notifier> {
        self.notifier.as_deref()
    }
}

fn emit(diagnostic: &Diagnostic, notifier: &dyn Notifier) {
    match diagnostic.severity {
        Severity::Info => tracing::info!("{diagnostic}"),
        Severity::Warn => tracing::warn!("{diagnostic}"),
        Severity::Error => tracing::error!("{diagnostic}"),
    }

    if diagnostic.notify {
        match diagnostic.severity {
            Severity::Info => notifier.show_information(&diagnostic.message),
            Severity::Warn => notifier.show_warning(&diagnostic.message),
            Severity::Error => notifier.show_error(&diagnostic.message),
        }
    }
}
