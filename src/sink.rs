//! Delivering finished decks
//!
//! TTS picks up saved objects from a folder, so the default sink just writes
//! the JSON file into a directory.

use crate::error::Result;
use crate::tabletop::TabletopOutput;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where a finished deck goes
pub trait DownloadSink {
    /// Returns where the document ended up
    fn deliver(&self, file_name: &str, document: &TabletopOutput) -> Result<PathBuf>;
}

/// Replace characters that are not allowed in file names on common systems
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "deck.json".to_string()
    } else {
        cleaned
    }
}

/// Writes pretty printed JSON files into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's download folder, or the current directory
    pub fn default_dir() -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, file_name: &str, document: &TabletopOutput) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(sanitize_file_name(file_name));
        let content = serde_json::to_string_pretty(document)?;
        std::fs::write(&path, content)?;
        log::info!("Wrote deck to {}", path.display());
        Ok(path)
    }
}

/// Prints the document on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DownloadSink for StdoutSink {
    fn deliver(&self, file_name: &str, document: &TabletopOutput) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(document)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", content)?;
        Ok(PathBuf::from(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_replaces_path_characters() {
        assert_eq!(
            sanitize_file_name("Fire // Ice.json"),
            "Fire __ Ice.json"
        );
        assert_eq!(
            sanitize_file_name("Atraxa, Praetors' Voice.json"),
            "Atraxa, Praetors' Voice.json"
        );
        assert_eq!(sanitize_file_name("../secret"), "_secret");
        assert_eq!(sanitize_file_name("   "), "deck.json");
    }

    #[test]
    fn directory_sink_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path().join("decks"));
        let document = TabletopOutput {
            object_states: Vec::new(),
        };

        let path = sink.deliver("Sol Ring.json", &document).unwrap();

        assert_eq!(path, temp_dir.path().join("decks").join("Sol Ring.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: TabletopOutput = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, document);
    }
}
