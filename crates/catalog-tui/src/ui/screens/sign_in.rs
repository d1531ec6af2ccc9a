use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, SignInFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;
use crate::utils::truncate_string;

use super::{form_button, form_field, masked};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.sign_in;
    let height = if form.error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(50, height, area);

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        form_field(
            "Username",
            truncate_string(&form.username, 22),
            form.focus == SignInFocus::Username,
        ),
        form_field(
            "Password",
            masked(&form.password),
            form.focus == SignInFocus::Password,
        ),
        Line::from(""),
        form_button("Sign in", form.focus == SignInFocus::Button, form.submitting),
        Line::from(""),
        Line::from(vec![
            Span::styled("    No account? Press ", styles::muted_style()),
            Span::styled("Ctrl+S", styles::help_key_style()),
            Span::styled(" to sign up", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Sign In ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
