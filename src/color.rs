// Resolves a mood/emotion label to the panel color and its display name

use crate::models::Bgr;
use crate::mood_table::MoodTable;

/// Panel color used when nothing is detected or the label is unmapped
pub const NEUTRAL_COLOR: Bgr = Bgr::new(255, 255, 255);

/// Color name shown when there is no label at all
pub const NEUTRAL_NAME: &str = "Neutral";

/// Display-order color for `label`. Never fails: empty or unknown labels get
/// [`NEUTRAL_COLOR`].
pub fn resolve_color(table: &MoodTable, label: Option<&str>) -> Bgr {
    match label {
        Some(label) if !label.is_empty() => table
            .lookup(label)
            .map(|entry| entry.bgr())
            .unwrap_or(NEUTRAL_COLOR),
        _ => NEUTRAL_COLOR,
    }
}

/// Color name for `label`. Empty labels give [`NEUTRAL_NAME`]; unknown labels
/// are echoed back unchanged.
pub fn resolve_color_name(table: &MoodTable, label: Option<&str>) -> String {
    match label {
        Some(label) if !label.is_empty() => table
            .lookup(label)
            .map(|entry| entry.color_name().to_string())
            .unwrap_or_else(|| label.to_string()),
        _ => NEUTRAL_NAME.to_string(),
    }
}
