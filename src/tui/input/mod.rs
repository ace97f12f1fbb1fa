pub(crate) mod agenda;
pub(crate) mod detail;
pub(crate) mod editing;
pub(crate) mod modal;
pub(crate) mod navigate;
pub(crate) mod tree;

use crate::util::text::{next_grapheme_boundary, prev_grapheme_boundary};

// Single-line text editing shared by the prompt, the note entry, the
// inline title editor, and the statuses-editor rename.

pub(super) fn edit_insert(buffer: &mut String, cursor: &mut usize, c: char) {
    buffer.insert(*cursor, c);
    *cursor += c.len_utf8();
}

pub(super) fn edit_backspace(buffer: &mut String, cursor: &mut usize) {
    if let Some(start) = prev_grapheme_boundary(buffer, *cursor) {
        buffer.replace_range(start..*cursor, "");
        *cursor = start;
    }
}

pub(super) fn edit_left(buffer: &str, cursor: &mut usize) {
    if let Some(start) = prev_grapheme_boundary(buffer, *cursor) {
        *cursor = start;
    }
}

pub(super) fn edit_right(buffer: &str, cursor: &mut usize) {
    if let Some(end) = next_grapheme_boundary(buffer, *cursor) {
        *cursor = end;
    }
}
