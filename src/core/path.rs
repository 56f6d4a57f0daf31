//! Hierarchische Szenen-Pfade als opake, billig klonbare Schluessel.

use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Result};

/// Absoluter, hierarchischer Pfad zu einem Objekt der Szene, z.B.
/// `/World/Props/Chair`.
///
/// Der Selektions-Kern behandelt Pfade als opake Schluessel: hashbar, total
/// geordnet (lexikographisch) und O(1) klonbar (`Arc<str>`). Die
/// Hierarchie-Semantik (Eltern/Kind) nutzen nur externe Konsumenten.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScenePath(Arc<str>);

impl ScenePath {
    /// Parst und validiert einen absoluten Pfad.
    ///
    /// Gueltige Pfade beginnen mit `/` und bestehen aus nicht-leeren, durch
    /// `/` getrennten Komponenten. Der Wurzelpfad `/` selbst ist gueltig.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            bail!("Leerer Szenen-Pfad");
        }
        if !text.starts_with('/') {
            bail!("Szenen-Pfad muss absolut sein (fuehrendes '/'): {text}");
        }
        if text != "/" {
            if text.ends_with('/') {
                bail!("Szenen-Pfad darf nicht mit '/' enden: {text}");
            }
            if text[1..].split('/').any(str::is_empty) {
                bail!("Szenen-Pfad enthaelt leere Komponente: {text}");
            }
        }
        Ok(Self(Arc::from(text)))
    }

    /// Der Pfad als String-Slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Die letzte Pfadkomponente; leer fuer den Wurzelpfad.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Der Elternpfad; `None` fuer den Wurzelpfad.
    pub fn parent(&self) -> Option<ScenePath> {
        if &*self.0 == "/" {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self(Arc::from("/"))),
            Some(pos) => Some(Self(Arc::from(&self.0[..pos]))),
            None => None,
        }
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
