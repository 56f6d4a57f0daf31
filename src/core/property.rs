//! Property-Namen als opake, internierte Tokens.

use std::fmt;
use std::sync::Arc;

/// Name einer selektierbaren Objekt-Property (z.B. ein Attribut oder eine
/// Relation). Hashbar, vergleichbar und O(1) klonbar; der Kern interpretiert
/// den Inhalt nicht.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyToken(Arc<str>);

impl PropertyToken {
    /// Erstellt ein Token aus einem Namen.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Der Name als String-Slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyToken {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PropertyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
