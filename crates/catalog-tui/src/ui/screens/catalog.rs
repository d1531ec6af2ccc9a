//! Read-only tables for the four catalog lists, each with a detail panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use catalog_core::routes::Route;

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_date, format_optional};

const PLACEHOLDER: &str = "-";

pub fn render_authors(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.selection(Route::Authors);
    let rows: Vec<Row> = app
        .authors
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.display_name()),
                Cell::from(format_optional(&a.institution_name, PLACEHOLDER)),
                Cell::from(format!("{:>3}", a.article_count())),
            ])
        })
        .collect();

    let detail = app.authors.get(selected).map(|a| {
        let mut lines = vec![
            Line::from(Span::styled(a.display_name(), styles::title_style())),
            Line::from(""),
            detail_row("Email", format_optional(&a.email, PLACEHOLDER)),
            detail_row("Institution", format_optional(&a.institution_name, PLACEHOLDER)),
            detail_row("Address", format_optional(&a.address, PLACEHOLDER)),
            detail_row(
                "Born",
                a.date_of_birth.as_deref().map(format_date).unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
            Line::from(""),
        ];
        if let Some(bio) = a.bio.as_deref().filter(|b| !b.trim().is_empty()) {
            lines.push(Line::from(Span::raw(bio.to_string())));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!("Articles ({})", a.article_count()),
            styles::highlight_style(),
        )));
        for title in a.article_titles() {
            lines.push(Line::from(format!("  {}", title)));
        }
        let awards = a.award_names();
        if !awards.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Awards ({})", awards.len()),
                styles::highlight_style(),
            )));
            for name in awards {
                lines.push(Line::from(format!("  {}", name)));
            }
        }
        lines
    });

    render_list_with_detail(
        frame,
        area,
        ListView {
            title: format!(" Authors ({}) ", app.authors.len()),
            header: ["Name", "Institution", "Art"],
            widths: [Constraint::Fill(3), Constraint::Fill(3), Constraint::Length(4)],
            rows,
            selected,
            loading: app.loading,
        },
        detail,
    );
}

pub fn render_articles(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.selection(Route::Articles);
    let rows: Vec<Row> = app
        .articles
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.title.clone()),
                Cell::from(format_optional(&a.category_name, PLACEHOLDER)),
                Cell::from(
                    a.published_on()
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                ),
            ])
        })
        .collect();

    let detail = app.articles.get(selected).map(|a| {
        let mut lines = vec![
            Line::from(Span::styled(a.title.clone(), styles::title_style())),
            Line::from(""),
            detail_row("Authors", format_optional(&a.authors, PLACEHOLDER)),
            detail_row("Category", format_optional(&a.category_name, PLACEHOLDER)),
            detail_row(
                "Published",
                a.publication_date.as_deref().map(format_date).unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
            Line::from(""),
        ];
        if let Some(content) = a.content.as_deref() {
            lines.push(Line::from(Span::raw(content.to_string())));
        }
        lines
    });

    render_list_with_detail(
        frame,
        area,
        ListView {
            title: format!(" Articles ({}) ", app.articles.len()),
            header: ["Title", "Category", "Published"],
            widths: [Constraint::Fill(4), Constraint::Fill(2), Constraint::Length(10)],
            rows,
            selected,
            loading: app.loading,
        },
        detail,
    );
}

pub fn render_institutions(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.selection(Route::Institutions);
    let rows: Vec<Row> = app
        .institutions
        .iter()
        .map(|i| {
            let members = app
                .authors
                .iter()
                .filter(|a| a.institution_id == Some(i.id))
                .count();
            Row::new(vec![
                Cell::from(i.name.clone()),
                Cell::from(format_optional(&i.country, PLACEHOLDER)),
                Cell::from(format!("{:>3}", members)),
            ])
        })
        .collect();

    let detail = app.institutions.get(selected).map(|i| {
        let mut lines = vec![
            Line::from(Span::styled(i.name.clone(), styles::title_style())),
            Line::from(""),
            detail_row("Country", format_optional(&i.country, PLACEHOLDER)),
            Line::from(""),
            Line::from(Span::styled("Authors", styles::highlight_style())),
        ];
        for author in app.authors.iter().filter(|a| a.institution_id == Some(i.id)) {
            lines.push(Line::from(format!("  {}", author.display_name())));
        }
        lines
    });

    render_list_with_detail(
        frame,
        area,
        ListView {
            title: format!(" Institutions ({}) ", app.institutions.len()),
            header: ["Name", "Country", "Aut"],
            widths: [Constraint::Fill(4), Constraint::Fill(2), Constraint::Length(4)],
            rows,
            selected,
            loading: app.loading,
        },
        detail,
    );
}

pub fn render_awards(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.selection(Route::Awards);
    let rows: Vec<Row> = app
        .awards
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.name.clone()),
                Cell::from(format_optional(&a.author_name, PLACEHOLDER)),
                Cell::from(
                    a.date_received
                        .as_deref()
                        .map(format_date)
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                ),
            ])
        })
        .collect();

    let detail = app.awards.get(selected).map(|a| {
        vec![
            Line::from(Span::styled(a.name.clone(), styles::title_style())),
            Line::from(""),
            detail_row("Recipient", format_optional(&a.author_name, PLACEHOLDER)),
            detail_row(
                "Received",
                a.date_received.as_deref().map(format_date).unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
            Line::from(""),
            Line::from(format_optional(&a.description, "")),
        ]
    });

    render_list_with_detail(
        frame,
        area,
        ListView {
            title: format!(" Awards ({}) ", app.awards.len()),
            header: ["Award", "Recipient", "Received"],
            widths: [Constraint::Fill(3), Constraint::Fill(3), Constraint::Length(12)],
            rows,
            selected,
            loading: app.loading,
        },
        detail,
    );
}

struct ListView<'a> {
    title: String,
    header: [&'static str; 3],
    widths: [Constraint; 3],
    rows: Vec<Row<'a>>,
    selected: usize,
    loading: bool,
}

fn detail_row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", format!("{}:", label)), styles::muted_style()),
        Span::raw(value),
    ])
}

fn render_list_with_detail(
    frame: &mut Frame,
    area: Rect,
    view: ListView<'_>,
    detail: Option<Vec<Line<'static>>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let empty = view.rows.is_empty();
    let header = Row::new(view.header.map(Cell::from))
        .style(styles::title_style())
        .height(1);

    let table = Table::new(view.rows, view.widths)
        .header(header)
        .block(
            Block::default()
                .title(view.title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !empty {
        state.select(Some(view.selected));
    }
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let content = match detail {
        Some(lines) => lines,
        None if view.loading => vec![Line::from(Span::styled("Loading...", styles::muted_style()))],
        None => vec![Line::from(Span::styled("Nothing to show", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[1]);
}
