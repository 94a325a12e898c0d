// Mood mapping table loaded from the emotion/mood/color CSV dataset

use crate::error::{MoodLightError, Result};
use crate::models::{Bgr, Rgb};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Header columns every dataset must carry
const REQUIRED_COLUMNS: [&str; 6] = ["emotion", "mood", "color_name", "r", "g", "b"];

/// One row of the mapping table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoodEntry {
    emotion: String,
    mood: String,
    color_name: String,
    rgb: Rgb,
    bgr: Bgr,
}

impl MoodEntry {
    /// Creates an entry; the emotion key is trimmed and lowercased.
    pub fn new(
        emotion: &str,
        mood: impl Into<String>,
        color_name: impl Into<String>,
        rgb: Rgb,
    ) -> Self {
        Self {
            emotion: normalize_key(emotion),
            mood: mood.into(),
            color_name: color_name.into(),
            rgb,
            bgr: rgb.to_bgr(),
        }
    }

    pub fn emotion(&self) -> &str {
        &self.emotion
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn color_name(&self) -> &str {
        &self.color_name
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// Color in display channel order
    pub fn bgr(&self) -> Bgr {
        self.bgr
    }
}

/// Raw CSV record; csv trims every field before it lands here
#[derive(Debug, Deserialize)]
struct MoodRow {
    emotion: String,
    mood: String,
    color_name: String,
    r: u8,
    g: u8,
    b: u8,
}

/// Immutable emotion → mood/color lookup
#[derive(Clone, Debug, Default)]
pub struct MoodTable {
    entries: HashMap<String, MoodEntry>,
}

impl MoodTable {
    /// Loads the dataset at `path`. Any unreadable or malformed row fails the
    /// whole load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading mood-color dataset from {:?}", path);

        let file = std::fs::File::open(path)
            .map_err(|e| MoodLightError::dataset(path, format!("cannot open file: {e}")))?;
        let table = Self::from_reader(file).map_err(|reason| MoodLightError::dataset(path, reason))?;

        info!("Dataset loaded successfully ({} emotions)", table.len());
        Ok(table)
    }

    /// Parses a dataset from any reader. The error is a human readable reason.
    pub(crate) fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| format!("unreadable header: {e}"))?
            .clone();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(format!("missing required column `{missing}`"));
        }

        let mut entries = HashMap::new();
        for record in reader.deserialize::<MoodRow>() {
            let row = record.map_err(describe_csv_error)?;
            if row.emotion.is_empty() {
                return Err("row has an empty `emotion` field".to_string());
            }

            let entry = MoodEntry::new(
                &row.emotion,
                row.mood,
                row.color_name,
                Rgb::new(row.r, row.g, row.b),
            );
            if entries.contains_key(entry.emotion()) {
                debug!("Duplicate emotion `{}`, keeping the later row", entry.emotion());
            }
            entries.insert(entry.emotion.clone(), entry);
        }

        Ok(Self { entries })
    }

    /// Builds a table from already constructed entries; later entries win.
    pub fn from_entries<I: IntoIterator<Item = MoodEntry>>(entries: I) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.emotion.clone(), entry))
                .collect(),
        }
    }

    /// Looks up an emotion, ignoring case and surrounding whitespace
    pub fn lookup(&self, emotion: &str) -> Option<&MoodEntry> {
        self.entries.get(&normalize_key(emotion))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(emotion: &str) -> String {
    emotion.trim().to_lowercase()
}

fn describe_csv_error(err: csv::Error) -> String {
    match err.position() {
        Some(pos) => format!("line {}: {}", pos.line(), err),
        None => err.to_string(),
    }
}
