use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Subtle,
    Ticker,
    Result,
    Hint,
    Error,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold(),
        StyleType::Subtle => style(text).dim(),
        StyleType::Ticker => style(text).cyan().bold(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Hint => style(text).yellow(),
        StyleType::Error => style(text).red().bold(),
    };
    styled.to_string()
}

/// Renders a selector as `From: < USD >`.
pub fn selector(label: &str, value: &str) -> String {
    format!("{label}: {}", style_text(&format!("< {value} >"), StyleType::Title))
}

/// A horizontal rule of `width` columns.
pub fn separator(width: usize) -> String {
    style_text(&"─".repeat(width), StyleType::Subtle)
}
