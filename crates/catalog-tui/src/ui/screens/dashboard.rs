use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)])
        .split(area);

    render_counts(frame, app, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_top_authors(frame, app, bottom[0]);
    render_recent_articles(frame, app, bottom[1]);
}

fn render_counts(frame: &mut Frame, app: &App, area: Rect) {
    let summary = &app.summary;
    let stat = |label: &'static str, value: usize| {
        vec![
            Span::styled(format!("  {}: ", label), styles::muted_style()),
            Span::styled(value.to_string(), styles::success_style()),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(stat("Authors", summary.author_count));
    spans.extend(stat("Articles", summary.article_count));
    spans.extend(stat("Institutions", summary.institution_count));
    spans.extend(stat("Awards", summary.award_count));
    if app.loading {
        spans.push(Span::styled("   (refreshing)", styles::muted_style()));
    }

    let block = Block::default()
        .title(" Catalog ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(spans)]).block(block);
    frame.render_widget(paragraph, area);
}

fn render_top_authors(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];
    for (i, author) in app.summary.top_authors.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {}. ", i + 1), styles::muted_style()),
            Span::raw(truncate_string(&author.name, 28)),
            Span::styled(format!("  {}", author.articles), styles::highlight_style()),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(" No articles yet", styles::muted_style())));
    }

    let block = Block::default()
        .title(" Top Authors ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent_articles(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];
    for article in &app.summary.recent_articles {
        let date = article
            .publication_date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "undated".to_string());
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<13}", date), styles::muted_style()),
            Span::raw(truncate_string(&article.title, 48)),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(" No articles yet", styles::muted_style())));
    }

    let block = Block::default()
        .title(" Recent Articles ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
