use std::io::{self, Write};

use weatherlet_core::{
    DeskletViewModel, DisplayValue, FooterView, HeaderState, MeasureConfig, MeasureRowView,
    OFFLINE_TEXT,
};

use super::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Header,
    Normal,
    Smaller,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLine {
    pub text: String,
    pub style: LineStyle,
}

impl PanelLine {
    fn new(text: String, style: LineStyle) -> Self {
        Self { text, style }
    }
}

/// Maps the published view onto panel rows: header, one row per measure, footer.
pub fn render(view: &DeskletViewModel) -> Vec<PanelLine> {
    let mut lines = Vec::with_capacity(view.rows.len() + 2);

    if let Some(header) = header_text(view) {
        lines.push(PanelLine::new(header, LineStyle::Header));
    }

    lines.extend(view.rows.iter().map(format_measure_row));

    if let Some(footer) = &view.footer {
        lines.push(format_footer(footer));
    }

    lines
}

/// Redraws the whole panel. Styling escapes are only used on a terminal.
pub fn draw(out: &mut impl Write, lines: &[PanelLine], ansi: bool) -> io::Result<()> {
    if ansi {
        write!(out, "{ANSI_CLEAR}")?;
    }
    for line in lines {
        match (ansi, line.style) {
            (true, LineStyle::Header) => writeln!(out, "{ANSI_BOLD}{}{ANSI_RESET}", line.text)?,
            (true, LineStyle::Smaller) => writeln!(out, "{ANSI_DIM}{}{ANSI_RESET}", line.text)?,
            _ => writeln!(out, "{}", line.text)?,
        }
    }
    if !ansi {
        writeln!(out)?;
    }
    out.flush()
}

fn header_text(view: &DeskletViewModel) -> Option<String> {
    match view.header {
        HeaderState::Normal => None,
        HeaderState::Offline => Some(OFFLINE_TEXT.to_string()),
        HeaderState::Error => Some(match &view.last_failure {
            Some(failure) => format!("{OFFLINE_TEXT} ({failure})"),
            None => OFFLINE_TEXT.to_string(),
        }),
    }
}

fn format_measure_row(row: &MeasureRowView) -> PanelLine {
    let measure = &row.measure;
    let style = if measure.smaller {
        LineStyle::Smaller
    } else {
        LineStyle::Normal
    };

    let label = label_text(measure);
    let text = match row.value.text() {
        // Separators span the whole row.
        None => align(&label, PANEL_WIDTH, measure.label_align_right)
            .trim_end()
            .to_string(),
        Some(value) => two_columns(
            &label,
            measure.label_align_right,
            value,
            measure.measure_align_right,
        ),
    };
    PanelLine::new(text, style)
}

fn format_footer(footer: &FooterView) -> PanelLine {
    let value = match &footer.value {
        DisplayValue::Separator => "",
        other => other.text().unwrap_or_default(),
    };
    PanelLine::new(
        two_columns(&footer.label, false, value, true),
        LineStyle::Smaller,
    )
}

fn label_text(measure: &MeasureConfig) -> String {
    if measure.indent {
        format!("{INDENT}{}", measure.label)
    } else {
        measure.label.clone()
    }
}

fn two_columns(label: &str, label_right: bool, value: &str, value_right: bool) -> String {
    let label_col = align(label, LABEL_WIDTH, label_right);
    let value_col = align(value, PANEL_WIDTH - LABEL_WIDTH - 1, value_right);
    format!("{label_col} {value_col}").trim_end().to_string()
}

fn align(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}
