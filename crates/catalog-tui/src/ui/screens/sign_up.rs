use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, SignUpFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;
use crate::utils::truncate_string;

use super::{form_button, form_field, masked};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.sign_up;
    let height = if form.error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(50, height, area);

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        form_field(
            "Full name",
            truncate_string(&form.full_name, 22),
            form.focus == SignUpFocus::FullName,
        ),
        form_field(
            "Email",
            truncate_string(&form.email, 22),
            form.focus == SignUpFocus::Email,
        ),
        form_field(
            "Username",
            truncate_string(&form.username, 22),
            form.focus == SignUpFocus::Username,
        ),
        form_field(
            "Password",
            masked(&form.password),
            form.focus == SignUpFocus::Password,
        ),
        Line::from(""),
        form_button("Create account", form.focus == SignUpFocus::Button, form.submitting),
        Line::from(""),
        Line::from(vec![
            Span::styled("    Have an account? Press ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to sign in", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Sign Up ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
