//! Table output formatting for CLI commands
//!
//! Provides formatted table output for chunks, models and answer sources using
//! comfy-table. Honors `NO_COLOR` and dumb terminals.

use crate::domain::models::{SourceReference, TextChunk};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::errors::truncate_chars;

/// Characters of chunk content shown per row
const PREVIEW_CHARS: usize = 60;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format chunks as a table
    pub fn format_chunks(&self, chunks: &[TextChunk]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Source", "#", "Chars", "Preview"]));

        for chunk in chunks {
            let preview = truncate_chars(&chunk.content().replace('\n', " "), PREVIEW_CHARS);
            table.add_row(vec![
                Cell::new(chunk.source()),
                Cell::new(chunk.position()),
                Cell::new(chunk.char_len()),
                Cell::new(preview),
            ]);
        }

        table.to_string()
    }

    /// Format installed models, marking the configured ones
    pub fn format_models(&self, models: &[(String, Option<&'static str>)]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Model", "Role"]));

        for (name, role) in models {
            let role_cell = match role {
                Some(role) if self.use_colors => Cell::new(role).fg(Color::Green),
                Some(role) => Cell::new(role),
                None => Cell::new("-"),
            };
            table.add_row(vec![Cell::new(name), role_cell]);
        }

        table.to_string()
    }

    /// Format the chunks an answer was drawn from
    pub fn format_sources(&self, sources: &[SourceReference]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Source", "#", "Similarity", "Excerpt"]));

        for source in sources {
            let similarity = format!("{:.3}", source.similarity);
            let similarity_cell = if self.use_colors {
                Cell::new(similarity).fg(similarity_color(source.similarity))
            } else {
                Cell::new(similarity)
            };
            table.add_row(vec![
                Cell::new(&source.source),
                Cell::new(source.position),
                similarity_cell,
                Cell::new(truncate_chars(&source.excerpt.replace('\n', " "), PREVIEW_CHARS)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

fn similarity_color(similarity: f32) -> Color {
    if similarity >= 0.7 {
        Color::Green
    } else if similarity >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Check if the terminal supports colors
pub fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    console::colors_enabled()
}
