pub mod catalog;
pub mod dashboard;
pub mod sign_in;
pub mod sign_up;

use ratatui::text::{Line, Span};

use crate::ui::styles;

/// One labelled form field: `Label: [value▌]`.
pub(crate) fn form_field<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("    "),
        Span::styled(format!("{:<10}[", label), styles::muted_style()),
        Span::styled(format!("{:<22}{}", value, cursor), styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Submit button, marked while focused.
pub(crate) fn form_button<'a>(label: &str, focused: bool, busy: bool) -> Line<'a> {
    let text = if busy {
        format!("  {}...  ", label)
    } else if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("              ["),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}

/// Password shown as asterisks, capped to the field width.
pub(crate) fn masked(password: &str) -> String {
    "*".repeat(password.chars().count().min(22))
}
