use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
};
use crate::categories::{format_category_name, ALL};
use crate::controller::{RenderController, NO_PRODUCTS};
use crate::models::{Control, DisplayRecord, RegionState};
use crate::theme::Theme;
use crate::utils::{contains, first_visible_row, grid_columns, grid_rows, CARD_HEIGHT, CARD_WIDTH};

const DETAILS_LABEL: &str = "[Details]";
const ADD_LABEL: &str = "[Add]";
const MODAL_ADD_LABEL: &str = "[Add to Cart]";
const CLOSE_LABEL: &str = "[Close]";

/// What the last frame put on screen, for mouse hit-testing.
#[derive(Debug, Default)]
pub struct View {
    hits: Vec<(Rect, Control)>,
    pub columns: usize,
    /// Detail dialog area while it is open.
    pub overlay: Option<Rect>,
}

impl View {
    pub fn control_at(&self, x: u16, y: u16) -> Option<&Control> {
        self.hits
            .iter()
            .find(|(area, _)| contains(*area, x, y))
            .map(|(_, control)| control)
    }

    fn push(&mut self, area: Rect, bounds: Rect, control: Control) {
        let clipped = area.intersection(bounds);
        if !clipped.is_empty() {
            self.hits.push((clipped, control));
        }
    }
}

/// Draws the whole storefront and returns the clickable controls.
pub fn render(f: &mut Frame, controller: &RenderController, theme: &Theme) -> View {
    let mut view = View::default();
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // categories
            Constraint::Min(1),    // product grid
            Constraint::Length(3), // footer
        ])
        .split(area);

    render_header(f, chunks[0], controller.cart_count(), theme);
    render_categories(f, chunks[1], controller, theme, &mut view);
    render_products(f, chunks[2], controller, theme, &mut view);

    let footer = Paragraph::new(
        "←/→/↑/↓ or h/j/k/l Navigate | Tab/Shift+Tab Category | 0 All | 1-9 Pick | <Enter> Details | a Add to cart | Esc Close | q Quit",
    )
    .block(Block::default().borders(Borders::ALL))
    .style(theme.footer);
    f.render_widget(footer, chunks[3]);

    if let Some(record) = controller.detail_record() {
        // the overlay captures all clicks while open
        view.hits.clear();
        render_detail(f, area, &record, controller.detail_scroll(), theme, &mut view);
    }

    if let Some(text) = controller.toast() {
        render_toast(f, area, chunks[3].y, text, theme);
    }

    view
}

fn render_header(f: &mut Frame, area: Rect, cart_count: u64, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.blurred_border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(20)])
        .split(inner);

    f.render_widget(Paragraph::new(Span::styled("Storefront", theme.brand)), halves[0]);

    let mut cart = vec![Span::styled("Cart ", Style::default().fg(theme.text))];
    if cart_count > 0 {
        cart.push(Span::styled(format!(" {} ", cart_count), theme.cart_badge));
    }
    f.render_widget(Paragraph::new(Line::from(cart)).alignment(Alignment::Right), halves[1]);
}

fn render_categories(f: &mut Frame, area: Rect, controller: &RenderController, theme: &Theme, view: &mut View) {
    let block = Block::default()
        .title("Categories")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.blurred_border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match controller.category_region() {
        RegionState::Loading => {
            f.render_widget(Paragraph::new("Loading categories...").style(theme.placeholder), inner);
        }
        RegionState::Failed(message) => {
            f.render_widget(Paragraph::new(message.as_str()).style(theme.error), inner);
        }
        RegionState::Ready => {
            let index = controller.categories();
            let entries = std::iter::once(ALL).chain(index.categories().iter().map(String::as_str));
            let mut spans = Vec::new();
            let mut x = inner.x;
            for category in entries {
                let style = if index.is_active(category) {
                    theme.category_active
                } else {
                    theme.category_inactive
                };
                let span = Span::styled(format!(" {} ", format_category_name(category)), style);
                let width = span.width() as u16;
                view.push(Rect::new(x, inner.y, width, 1), inner, Control::Category(category.to_string()));
                spans.push(span);
                spans.push(Span::raw(" "));
                x = x.saturating_add(width + 1);
            }
            f.render_widget(Paragraph::new(Line::from(spans)), inner);
        }
    }
}

fn render_products(f: &mut Frame, area: Rect, controller: &RenderController, theme: &Theme, view: &mut View) {
    let records = controller.visible_records();
    let title = match &records {
        Some(records) => format!(
            "Products: {} ({})",
            format_category_name(controller.categories().active()),
            records.len()
        ),
        None => "Products".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.focus_border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = grid_columns(inner.width);
    view.columns = columns;

    let records = match (controller.product_region(), records) {
        (RegionState::Failed(message), _) => {
            let para = Paragraph::new(message.as_str()).style(theme.error).alignment(Alignment::Center);
            f.render_widget(para, inner);
            return;
        }
        (_, None) => {
            let para = Paragraph::new("Loading products...").style(theme.placeholder).alignment(Alignment::Center);
            f.render_widget(para, inner);
            return;
        }
        (_, Some(records)) => records,
    };

    if records.is_empty() {
        let para = Paragraph::new(NO_PRODUCTS).style(theme.placeholder).alignment(Alignment::Center);
        f.render_widget(para, inner);
        return;
    }

    let cursor = controller.cursor();
    let first_row = first_visible_row(cursor / columns, grid_rows(inner.height));
    let visible_cards = grid_rows(inner.height) * columns;

    for (slot, (i, record)) in records
        .iter()
        .enumerate()
        .skip(first_row * columns)
        .take(visible_cards)
        .enumerate()
    {
        let col = (slot % columns) as u16;
        let row = (slot / columns) as u16;
        let card = Rect::new(
            inner.x + col * CARD_WIDTH,
            inner.y + row * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(inner);
        if card.is_empty() {
            continue;
        }
        render_card(f, card, record, i == cursor, theme, view);
    }
}

fn star_spans(stars: &[bool; 5], theme: &Theme) -> Vec<Span<'static>> {
    stars
        .iter()
        .map(|filled| {
            if *filled {
                Span::styled("★", theme.star_filled)
            } else {
                Span::styled("☆", theme.star_disabled)
            }
        })
        .collect()
}

fn render_card(f: &mut Frame, area: Rect, record: &DisplayRecord, focused: bool, theme: &Theme, view: &mut View) {
    let border = if focused { theme.focus_border } else { theme.blurred_border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1), // category badge
        Constraint::Length(1), // rating
        Constraint::Length(2), // title
        Constraint::Length(1), // price
        Constraint::Min(0),
        Constraint::Length(1), // actions
    ])
    .split(inner);

    let badge = Span::styled(format!("[{}]", record.category_label), theme.category_badge);
    f.render_widget(Paragraph::new(badge), rows[0]);

    let mut rating = vec![Span::styled(format!("{} ", record.rate), theme.rating_value)];
    rating.extend(star_spans(&record.card_stars, theme));
    rating.push(Span::styled(format!(" ({})", record.review_count), theme.review_count));
    f.render_widget(Paragraph::new(Line::from(rating)), rows[1]);

    let title_style = if focused {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let title = Paragraph::new(record.title.as_str()).style(title_style).wrap(Wrap { trim: true });
    f.render_widget(title, rows[2]);

    f.render_widget(Paragraph::new(Span::styled(format!("${}", record.price), theme.price)), rows[3]);

    let actions = rows[5];
    let details_width = DETAILS_LABEL.len() as u16;
    let add_x = actions.x + details_width + 2;
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(DETAILS_LABEL, theme.button),
            Span::raw("  "),
            Span::styled(ADD_LABEL, theme.button_primary),
        ])),
        actions,
    );
    view.push(Rect::new(actions.x, actions.y, details_width, 1), actions, Control::Details(record.id));
    view.push(Rect::new(add_x, actions.y, ADD_LABEL.len() as u16, 1), actions, Control::AddToCart(record.id));
}

fn render_detail(f: &mut Frame, area: Rect, record: &DisplayRecord, scroll: u16, theme: &Theme, view: &mut View) {
    let popup_area = centered_rect(70, 80, area);
    view.overlay = Some(popup_area);
    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled("Details", theme.popup_title))
        .borders(Borders::ALL)
        .style(theme.popup_border);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::vertical([
        Constraint::Length(1), // id + category
        Constraint::Length(2), // title
        Constraint::Length(1), // rating
        Constraint::Length(1), // price
        Constraint::Length(1), // image
        Constraint::Length(1), // description header
        Constraint::Min(1),    // description
        Constraint::Length(1), // actions
    ])
    .split(inner);

    let badges = Line::from(vec![
        Span::styled(format!(" ID: {} ", record.id), theme.id_badge),
        Span::raw("  "),
        Span::styled(format!("[{}]", record.category_label), theme.category_badge),
    ]);
    f.render_widget(Paragraph::new(badges), rows[0]);

    let title = Paragraph::new(record.full_title.as_str())
        .style(theme.popup_text.add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: true });
    f.render_widget(title, rows[1]);

    let mut rating = star_spans(&record.modal_stars, theme);
    rating.push(Span::styled(format!(" {}", record.rate), theme.rating_value));
    rating.push(Span::styled(format!(" ({} reviews)", record.review_count), theme.review_count));
    f.render_widget(Paragraph::new(Line::from(rating)), rows[2]);

    f.render_widget(Paragraph::new(Span::styled(format!("${}", record.price), theme.price)), rows[3]);

    let image = Line::from(vec![
        Span::styled("Image: ", Style::default().fg(theme.text_secondary)),
        Span::styled(record.image.as_str(), Style::default().fg(theme.text_secondary).add_modifier(Modifier::UNDERLINED)),
    ]);
    f.render_widget(Paragraph::new(image), rows[4]);

    f.render_widget(Paragraph::new(Span::styled("Description:", theme.popup_title)), rows[5]);
    let description = Paragraph::new(record.description.as_str())
        .style(theme.popup_text)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(description, rows[6]);

    let actions = rows[7];
    let add_width = MODAL_ADD_LABEL.len() as u16;
    let close_x = actions.x + add_width + 2;
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(MODAL_ADD_LABEL, theme.button_primary),
            Span::raw("  "),
            Span::styled(CLOSE_LABEL, theme.button),
        ])),
        actions,
    );
    view.push(Rect::new(actions.x, actions.y, add_width, 1), actions, Control::ModalAddToCart(record.id));
    view.push(Rect::new(close_x, actions.y, CLOSE_LABEL.len() as u16, 1), actions, Control::CloseDetail);
}

fn render_toast(f: &mut Frame, area: Rect, bottom: u16, text: &str, theme: &Theme) {
    let width = (Span::raw(text).width() as u16 + 4).min(area.width);
    let height = 3u16.min(bottom);
    let toast_area = Rect::new(area.right().saturating_sub(width), bottom.saturating_sub(height), width, height);
    f.render_widget(Clear, toast_area);
    let para = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(theme.toast);
    f.render_widget(para, toast_area);
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100-percent_y)/2), Constraint::Percentage(percent_y), Constraint::Percentage((100-percent_y)/2)]).split(r)[1];
    Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100-percent_x)/2), Constraint::Percentage(percent_x), Constraint::Percentage((100-percent_x)/2)]).split(vertical)[1]
}
