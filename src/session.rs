//! Session state
//!
//! Each connected client carries its own session. The engine never
//! tracks a global current database; the session is passed into every
//! execute call so concurrent sessions stay independent.

/// Per-client execution state
#[derive(Debug, Default)]
pub struct Session {
    current_database: Option<String>,
    closed: bool,
}

impl Session {
    /// Create a fresh session with no database selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the currently selected database, if any
    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }

    /// Select a database for subsequent statements
    pub fn use_database(&mut self, name: impl Into<String>) {
        self.current_database = Some(name.into().to_lowercase());
    }

    /// Clear the selection, e.g. after the current database is dropped
    pub fn clear_database(&mut self) {
        self.current_database = None;
    }

    /// Whether a QUIT statement ended this session
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Mark the session closed
    pub fn close(&mut self) {
        self.closed = true;
    }
}
