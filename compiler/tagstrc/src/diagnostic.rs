//! Rewrite errors rendered with source context.

use std::ops::Range;

use ariadne::{Color, Config as ReportConfig, Label, Report, ReportKind, Source};
use tagstr_ir::Position;
use tagstr_rewrite::TransformError;

/// Character offset of `position` in `source`, clamped to the text.
pub fn char_offset(source: &str, position: Position) -> usize {
    let row = usize::try_from(position.row.saturating_sub(1)).unwrap_or(usize::MAX);
    let col = usize::try_from(position.col).unwrap_or(usize::MAX);
    let mut lines = source.split_inclusive('\n');
    let before: usize = lines.by_ref().take(row).map(|line| line.chars().count()).sum();
    let line_len = lines.next().map_or(0, |line| line.trim_end_matches(['\r', '\n']).chars().count());
    (before + col.min(line_len)).min(source.chars().count())
}

/// Short label for the highlighted span.
fn label_message(err: &TransformError) -> String {
    match err {
        TransformError::Malformed { message, .. } => message.clone(),
        TransformError::Literal { source, .. } => source.to_string(),
        TransformError::Tokenize(_) => "tokenizing stopped here".to_owned(),
        TransformError::Serialize(_) => "token overlaps the previous one".to_owned(),
        TransformError::Cursor(_) | TransformError::Io(_) => String::new(),
    }
}

/// Render `err` against the file it came from.
///
/// Errors without a position render as a single `error:` line.
pub fn render_transform_error(err: &TransformError, path: &str, source: &str, color: bool) -> String {
    let Some(position) = err.position() else {
        return format!("error: {path}: {err}\n");
    };

    let total = source.chars().count();
    let start = char_offset(source, position);
    let span: Range<usize> = start..(start + 1).min(total).max(start);

    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, path, start)
        .with_config(ReportConfig::default().with_color(color))
        .with_message(err.to_string())
        .with_label(
            Label::new((path, span))
                .with_message(label_message(err))
                .with_color(Color::Red),
        )
        .finish()
        .write((path, Source::from(source)), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("error: {path}:{position}: {err}\n"),
    }
}
