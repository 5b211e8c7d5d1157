//! Report generation for proximity tables
//!
//! Writes tables and listings as plain text (optionally with ANSI heat-map
//! backgrounds) or as JSON for automation.

use std::io::{self, Write};

use serde::Serialize;

use crate::entity::capitalize_first;
use crate::heat::HeatMapper;
use crate::proximity::ProximityTable;
use crate::view::table_to_view;

const CELL_WIDTH: usize = 7;
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const RESET: &str = "\x1b[0m";
const BLACK_TEXT: &str = "\x1b[30m";

/// Write a proximity table as aligned text
///
/// With `colored`, each cell gets a 24-bit ANSI background from the heat map.
pub fn write_table<W: Write>(
    table: &ProximityTable,
    heat: &HeatMapper,
    colored: bool,
    writer: &mut W,
) -> io::Result<()> {
    let view = table_to_view(table, heat);

    match view.topic.as_deref() {
        Some(topic) => writeln!(
            writer,
            "Proximity to '{}' within topic '{}'",
            view.main_language,
            capitalize_first(topic)
        )?,
        None => writeln!(writer, "Proximity to '{}' by topic", view.main_language)?,
    }
    writeln!(writer, "{}", RULE)?;

    if view.languages.is_empty() {
        writeln!(writer, "No proximity data for '{}'.", view.main_language)?;
        return Ok(());
    }

    let name_width = view
        .rows
        .iter()
        .map(|r| r.display_name.chars().count())
        .chain(std::iter::once(view.key_header.len()))
        .max()
        .unwrap_or(0);

    write!(writer, "{:<width$}", view.key_header, width = name_width)?;
    for language in &view.languages {
        write!(writer, " {:>width$}", language, width = CELL_WIDTH)?;
    }
    writeln!(writer)?;

    for row in &view.rows {
        if row.is_average {
            writeln!(writer)?;
        }
        write!(writer, "{:<width$}", row.display_name, width = name_width)?;
        for cell in &row.cells {
            let text = format!("{:>width$}", cell.text, width = CELL_WIDTH);
            match (&cell.value, colored) {
                (Some(value), true) => {
                    let average = table.baseline(&cell.language);
                    match average {
                        Some(average) => {
                            let rgb = heat.rgb_for(*value, average);
                            write!(
                                writer,
                                " {}{}{}{}",
                                rgb.ansi_background(),
                                BLACK_TEXT,
                                text,
                                RESET
                            )?;
                        }
                        None => write!(writer, " {}", text)?,
                    }
                }
                _ => write!(writer, " {}", text)?,
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write a proximity table as pretty-printed JSON
pub fn write_table_json<W: Write>(
    table: &ProximityTable,
    heat: &HeatMapper,
    writer: &mut W,
) -> io::Result<()> {
    write_json(&table_to_view(table, heat), writer)
}

/// Write any serialisable value as pretty-printed JSON followed by a newline
pub fn write_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(io::Error::other)?;
    writeln!(writer)
}

/// Write a titled list of names, one per line, capitalized
pub fn write_list<W: Write>(title: &str, names: &[String], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} ({})", title, names.len())?;
    writeln!(writer, "{}", RULE)?;
    for name in names {
        writeln!(writer, "  {}", capitalize_first(name))?;
    }
    Ok(())
}
