use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use catalog_core::auth::GuardView;
use catalog_core::routes::Route;

use crate::app::{App, AppState};

use super::screens::{catalog, dashboard, sign_in, sign_up};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Shell navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    let view = app.guard_view();
    let shell_visible =
        view == GuardView::Children && !app.router.current().is_public() && app.shell.is_visible(&app.scope());

    render_title_bar(frame, app, chunks[0]);
    if shell_visible {
        render_shell(frame, app, chunks[1]);
    }
    render_main_content(frame, app, view, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Catalog Admin";
    let route_hint = format!("{}  [?] Help", app.router.current().path());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + route_hint.len() + 2),
        )),
        Span::styled(route_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_shell(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, item) in app.shell.items(app.router.current()).iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", item.shortcut, item.label());
        if item.selected {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    // Logout action on the right
    let logout = "[L]ogout ";
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + logout.len());
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(logout, styles::highlight_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, view: GuardView, area: Rect) {
    match view {
        GuardView::Loading => render_loading(frame, area),
        GuardView::Nothing => {}
        GuardView::Children => match app.router.current() {
            Route::SignIn => sign_in::render(frame, app, area),
            Route::SignUp => sign_up::render(frame, app, area),
            Route::Home => dashboard::render(frame, app, area),
            Route::Authors => catalog::render_authors(frame, app, area),
            Route::Articles => catalog::render_articles(frame, app, area),
            Route::Institutions => catalog::render_institutions(frame, app, area),
            Route::Awards => catalog::render_awards(frame, app, area),
        },
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let area = centered_rect_fixed(24, 3, area);
    let paragraph = Paragraph::new(Line::from(Span::styled("Loading...", styles::muted_style())))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(styles::border_style(false)));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let route = app.router.current();
    let shortcuts = if route.is_public() {
        "[Tab] next field | [Ctrl+S] sign in/up | [Esc] back"
    } else {
        "[u]pdate | [L]ogout | [q]uit"
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None if app.is_authenticated() => " Signed in ".to_string(),
        None => " Not signed in ".to_string(),
    };
    let warning = if app.is_memory_only() {
        " Session is not being saved "
    } else {
        ""
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(warning.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::styled(warning, styles::warning_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line<'a>(keys: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", keys), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Catalog Admin", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-5", "Home, Authors, Articles, Institutions, Awards"),
        help_line("←/→", "Previous/next section"),
        help_line("↑/↓", "Move selection"),
        help_line("PgUp/PgDn", "Scroll a page"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("u", "Refresh catalog data"),
        help_line("L", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Sign in / sign up", styles::highlight_style())),
        help_line("Tab", "Next field"),
        help_line("Enter", "Next field or submit"),
        help_line("Ctrl+S", "Switch between sign-in and sign-up"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
