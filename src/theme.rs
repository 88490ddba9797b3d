use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,

    // Specific components
    pub brand: Style,
    pub cart_badge: Style,
    pub category_active: Style,
    pub category_inactive: Style,
    pub category_badge: Style,
    pub id_badge: Style,
    pub rating_value: Style,
    pub star_filled: Style,
    pub star_disabled: Style,
    pub review_count: Style,
    pub price: Style,
    pub button: Style,
    pub button_primary: Style,
    pub error: Style,
    pub placeholder: Style,
    pub toast: Style,
    pub footer: Style,
    pub popup_title: Style,
    pub popup_border: Style,
    pub popup_text: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let primary = Color::Rgb(87, 13, 248);
        let star = Color::Rgb(251, 146, 60);
        Self {
            focus_border: Color::Cyan,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,

            brand: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            cart_badge: Style::default().fg(Color::White).bg(primary).add_modifier(Modifier::BOLD),
            category_active: Style::default().fg(Color::White).bg(primary).add_modifier(Modifier::BOLD),
            category_inactive: Style::default().fg(Color::Gray),
            category_badge: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            id_badge: Style::default().fg(Color::White).bg(primary),
            rating_value: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            star_filled: Style::default().fg(star),
            star_disabled: Style::default().fg(Color::DarkGray),
            review_count: Style::default().fg(Color::DarkGray),
            price: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            button: Style::default().fg(Color::Cyan),
            button_primary: Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::DarkGray),
            toast: Style::default().fg(Color::Black).bg(Color::Green),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
            popup_text: Style::default().fg(Color::White),
        }
    }
}
