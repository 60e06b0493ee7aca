use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub timestamp_style: Style,
    pub placeholder_style: Style,

    // Chrome
    pub title_style: Style,
    pub border_style: Style,
    pub focused_border_style: Style,
    pub loading_indicator_style: Style,
    pub status_style: Style,

    // Sidebar
    pub sidebar_item_style: Style,
    pub sidebar_current_style: Style,
    pub sidebar_highlight_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_prefix_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            timestamp_style: Style::default().fg(Color::DarkGray),
            placeholder_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::Gray),
            border_style: Style::default().fg(Color::DarkGray),
            focused_border_style: Style::default().fg(Color::Cyan),
            loading_indicator_style: Style::default().fg(Color::Yellow),
            status_style: Style::default().fg(Color::Yellow),

            sidebar_item_style: Style::default().fg(Color::Gray),
            sidebar_current_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            sidebar_highlight_style: Style::default().add_modifier(Modifier::REVERSED),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_prefix_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Black),
            timestamp_style: Style::default().fg(Color::Gray),
            placeholder_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default().fg(Color::DarkGray),
            border_style: Style::default().fg(Color::Gray),
            focused_border_style: Style::default().fg(Color::Blue),
            loading_indicator_style: Style::default().fg(Color::Magenta),
            status_style: Style::default().fg(Color::Red),

            sidebar_item_style: Style::default().fg(Color::DarkGray),
            sidebar_current_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            sidebar_highlight_style: Style::default().add_modifier(Modifier::REVERSED),

            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Look up a theme by name, falling back to the dark theme.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("light") => Self::light(),
            _ => Self::dark_default(),
        }
    }
}
