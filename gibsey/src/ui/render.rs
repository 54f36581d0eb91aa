//! Render orchestration for the reader TUI

use gibsey_core::{DescriptionSource, VaultId, ViewSnapshot};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::theme::{to_color, ReaderTheme};
use crate::ui::widgets::{LedgerWidget, NavItem, NavListWidget, QueryBox, RevealWidget};

const EMPTY_VAULT: &str = "No pages saved.";

/// Which list has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Chapters,
    Characters,
    Vault,
}

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let view = app.view();
    let theme = ReaderTheme::from_theme(&view.theme);
    let area = frame.area();

    let [title_area, body, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(area);

    let [left, centre, right] = Layout::horizontal([
        Constraint::Length(28),
        Constraint::Min(30),
        Constraint::Length(30),
    ])
    .areas(body);

    let [reveal_area, ledger_area, input_area] = Layout::vertical([
        Constraint::Percentage(55),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(centre);

    let [characters_area, vault_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(right);

    render_title_bar(frame, &view, &theme, title_area);
    render_chapters(frame, app, &view, &theme, left);
    render_reveal(frame, app, &view, &theme, reveal_area);

    let ledger = LedgerWidget::new(&view.queries, &theme)
        .scroll(app.ledger_scroll)
        .has_character(view.selection.character.is_some());
    frame.render_widget(ledger, ledger_area);

    render_input(frame, app, &view, &theme, input_area);
    render_characters(frame, app, &view, &theme, characters_area);
    render_vault(frame, app, &view, &theme, vault_area);
    render_status_bar(frame, app, &theme, status_area);

    if let Some(Overlay::Help) = app.overlay() {
        render_help_overlay(frame, &theme, area);
    }
}

fn render_title_bar(frame: &mut Frame, view: &ViewSnapshot, theme: &ReaderTheme, area: Rect) {
    let mut spans = vec![Span::styled(
        " GIBSEY ",
        theme.accent_style().add_modifier(Modifier::BOLD),
    )];

    if let Some(chapter) = &view.selection.chapter {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(chapter.title.clone(), theme.accent_style()));
        spans.push(Span::raw(" "));
    }
    if let Some(symbol) = &view.theme.symbol {
        spans.push(Span::styled(format!("[{}]", symbol.as_str()), theme.system_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chapters(frame: &mut Frame, app: &App, view: &ViewSnapshot, theme: &ReaderTheme, area: Rect) {
    let active = view.selection.chapter.as_ref().map(|c| c.id);
    let items = app
        .controller
        .catalog()
        .chapters()
        .iter()
        .map(|c| NavItem {
            label: c.title.clone(),
            color: Some(to_color(c.color)),
            active: Some(c.id) == active,
        })
        .collect();

    let widget = NavListWidget::new("Chapters", items, theme)
        .cursor(app.chapter_cursor)
        .focused(app.focused_panel == FocusedPanel::Chapters);
    frame.render_widget(widget, area);
}

fn render_characters(frame: &mut Frame, app: &App, view: &ViewSnapshot, theme: &ReaderTheme, area: Rect) {
    let active = view.selection.character.as_ref().map(|c| c.id);
    let items = app
        .controller
        .catalog()
        .characters()
        .iter()
        .map(|c| NavItem {
            label: c.name.clone(),
            color: Some(to_color(c.color)),
            active: Some(c.id) == active,
        })
        .collect();

    let widget = NavListWidget::new("Characters", items, theme)
        .cursor(app.character_cursor)
        .focused(app.focused_panel == FocusedPanel::Characters);
    frame.render_widget(widget, area);
}

fn render_vault(frame: &mut Frame, app: &App, view: &ViewSnapshot, theme: &ReaderTheme, area: Rect) {
    let items = view
        .vault
        .iter()
        .map(|e| NavItem {
            label: e.label.clone(),
            color: None,
            active: false,
        })
        .collect();

    let widget = NavListWidget::new("Vault", items, theme)
        .cursor(app.vault_cursor)
        .focused(app.focused_panel == FocusedPanel::Vault)
        .empty_text(EMPTY_VAULT);
    frame.render_widget(widget, area);
}

fn render_reveal(frame: &mut Frame, app: &App, view: &ViewSnapshot, theme: &ReaderTheme, area: Rect) {
    let header = match view.description {
        Some(DescriptionSource::Character(id)) => app
            .controller
            .catalog()
            .character(id)
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        Some(DescriptionSource::Page(page)) => {
            let saved = view.vault.iter().any(|e| e.id == VaultId::for_page(page));
            format!("← Page {page} → {}", if saved { "★" } else { "☆" })
        }
        None => String::new(),
    };

    frame.render_widget(RevealWidget::new(&view.reveal, theme).header(&header), area);
}

fn render_input(frame: &mut Frame, app: &App, view: &ViewSnapshot, theme: &ReaderTheme, area: Rect) {
    let addressee = view.selection.character.as_ref().map(|c| c.name.as_str());
    let widget = QueryBox::new(&app.draft, theme)
        .addressee(addressee)
        .typing(app.input_mode == InputMode::Insert);
    frame.render_widget(widget, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, theme: &ReaderTheme, area: Rect) {
    let mode = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Insert => " INSERT ",
    };

    let mut spans = vec![
        Span::styled(mode, Style::default().fg(theme.accent).add_modifier(Modifier::REVERSED)),
        Span::raw(" "),
    ];
    match app.status_message() {
        Some(message) => spans.push(Span::styled(message.to_string(), theme.text_style())),
        None => spans.push(Span::styled(
            "Tab focus  Enter select  i ask  n/p page  v vault  ? help",
            theme.system_style(),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A fixed-size rectangle centred in `area`, clamped to fit.
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

fn render_help_overlay(frame: &mut Frame, theme: &ReaderTheme, area: Rect) {
    let popup_area = centered_rect_fixed(52, 20, area);
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Gibsey - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation:", heading)),
        Line::from("  Tab / Shift-Tab   Cycle chapters, characters, vault"),
        Line::from("  j/k or ↑/↓        Move within the focused list"),
        Line::from("  Enter             Select (or open a vault entry)"),
        Line::from("  PgUp/PgDn, wheel  Scroll the query list"),
        Line::from(""),
        Line::from(Span::styled("Reading:", heading)),
        Line::from("  n/p or →/←        Next / previous page"),
        Line::from("  v                 Save or remove this page"),
        Line::from("  x                 Clear the character"),
        Line::from(""),
        Line::from(Span::styled("Questions:", heading)),
        Line::from("  i                 Ask the selected character"),
        Line::from("  Enter / Esc       Submit / stop typing"),
        Line::from(""),
        Line::from("  q or Ctrl-C       Quit"),
        Line::from(Span::styled("Press Esc to close", theme.system_style())),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}
