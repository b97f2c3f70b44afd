//! Recording storage - JSON lines format for efficiency

use crate::events::{Event, Recording};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// First line of every stored recording
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    name: String,
    #[serde(default)]
    recorded_at: Option<DateTime<Utc>>,
    events: usize,
}

pub struct RecordingStorage {
    dir: PathBuf,
}

impl RecordingStorage {
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME not set")?;
        Self::with_dir(PathBuf::from(home).join(".recast"))
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating storage dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Save recording as JSON lines (one event per line for streaming)
    pub fn save(&self, recording: &Recording) -> Result<PathBuf> {
        let now = Utc::now();
        let stem = format!("{}_{}", sanitize(&recording.name), now.format("%Y%m%d_%H%M%S"));
        let (path, file) = self.create_unique(&stem)?;
        let mut w = BufWriter::new(file);

        let header = Header {
            name: recording.name.clone(),
            recorded_at: recording.recorded_at.or(Some(now)),
            events: recording.events.len(),
        };
        serde_json::to_writer(&mut w, &header)?;
        writeln!(w)?;

        for e in &recording.events {
            serde_json::to_writer(&mut w, e)?;
            writeln!(w)?;
        }

        w.flush()?;
        Ok(path)
    }

    /// Create `<stem>.jsonl`, or `<stem>_2.jsonl` and so on when taken
    fn create_unique(&self, stem: &str) -> Result<(PathBuf, File)> {
        for n in 1u32.. {
            let filename = if n == 1 {
                format!("{}.jsonl", stem)
            } else {
                format!("{}_{}.jsonl", stem, n)
            };
            let path = self.dir.join(filename);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("creating {}", path.display()))
                }
            }
        }
        bail!("no free file name for {}", stem)
    }

    /// Load a stored recording by file name
    pub fn load(&self, filename: &str) -> Result<Recording> {
        read_jsonl(&self.dir.join(filename))
    }

    /// List all stored recordings
    pub fn list(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(s) = name.to_str() {
                if s.ends_with(".jsonl") {
                    files.push(s.to_string());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn delete(&self, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        fs::remove_file(&path).with_context(|| format!("deleting {}", path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

/// Read a recording from an arbitrary file.
///
/// `.jsonl` files use the storage layout, anything else is parsed as a JSON
/// array of events or a `{ name, events }` object.
pub fn read_recording(path: &Path) -> Result<Recording> {
    if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
        return read_jsonl(path);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("recording");
    Recording::from_json(stem, &content).with_context(|| format!("parsing {}", path.display()))
}

fn read_jsonl(path: &Path) -> Result<Recording> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    // First line: metadata
    let meta_line = lines.next().context("Empty file")??;
    let header: Header = serde_json::from_str(&meta_line).context("invalid header line")?;

    let mut events = Vec::with_capacity(header.events);
    for (i, line) in lines.enumerate() {
        let line = line?;
        if !line.is_empty() {
            let e: Event = serde_json::from_str(&line)
                .with_context(|| format!("invalid event on line {}", i + 2))?;
            events.push(e);
        }
    }

    Ok(Recording {
        name: header.name,
        recorded_at: header.recorded_at,
        events,
    })
}

fn sanitize(s: &str) -> String {
    let s: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if s.is_empty() {
        "recording".to_string()
    } else {
        s
    }
}
