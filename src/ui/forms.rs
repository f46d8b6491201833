use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{BiodataField, BiodataRecord, GENDER_OPTIONS};

/// Column where field values start, wide enough for the longest label.
const LABEL_WIDTH: usize = 13;

/// One row of a field block: what to show and whether typing edits it
/// directly (as opposed to a picker).
pub(crate) struct FieldEntry {
    pub(crate) field: BiodataField,
    pub(crate) display: String,
    pub(crate) typed: bool,
}

/// Rendered field block plus where the text cursor belongs, relative to the
/// top-left corner of the block.
pub(crate) struct FieldBlock {
    pub(crate) lines: Vec<Line<'static>>,
    pub(crate) cursor: Option<(u16, u16)>,
}

/// Lay out labelled fields one after another. Multi-line values continue on
/// indented rows below their label.
pub(crate) fn build_field_block(entries: &[FieldEntry], active: BiodataField) -> FieldBlock {
    let mut lines = Vec::new();
    let mut cursor = None;

    for entry in entries {
        let is_active = entry.field == active;
        let label = format!("{:<width$}", format!("{}:", entry.field.label()), width = LABEL_WIDTH);
        let label_style = if is_active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let value_style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if entry.display.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let segments: Vec<&str> = entry.display.split('\n').collect();
        for (idx, segment) in segments.iter().enumerate() {
            let prefix = if idx == 0 {
                Span::styled(label.clone(), label_style)
            } else {
                Span::raw(" ".repeat(LABEL_WIDTH))
            };
            let text = if entry.display.is_empty() && !is_active {
                "<empty>".to_string()
            } else {
                segment.to_string()
            };
            lines.push(Line::from(vec![prefix, Span::styled(text, value_style)]));
        }

        if is_active && entry.typed {
            let last = segments.last().map(|s| s.chars().count()).unwrap_or(0);
            cursor = Some(((LABEL_WIDTH + last) as u16, (lines.len() - 1) as u16));
        }
    }

    FieldBlock { lines, cursor }
}

/// Radio-style rendering of the gender choice.
pub(crate) fn gender_choice(code: &str) -> String {
    GENDER_OPTIONS
        .iter()
        .map(|(value, label)| {
            let mark = if *value == code { "(*)" } else { "( )" };
            format!("{mark} {label}")
        })
        .collect::<Vec<_>>()
        .join("   ")
}

/// Picker-style rendering with arrows hinting that Left/Right change it.
pub(crate) fn picker(value: &str, active: bool) -> String {
    if active {
        format!("< {value} >")
    } else {
        value.to_string()
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl ConfirmDelete {
    /// Build the confirmation state from the record being considered.
    pub(crate) fn from(record: &BiodataRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}
