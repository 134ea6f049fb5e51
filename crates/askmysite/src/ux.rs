use askmysite_core::model::{ChatbotConfig, Message, Role};
use console::{Style, StyledObject, style};

/// Kind of terminal text, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    User,
    Assistant,
    /// Status lines, like the session token or empty history notice.
    Footer,
}

pub fn style_text(text: &str, kind: TextKind) -> StyledObject<&str> {
    let style_obj = match kind {
        TextKind::User => Style::new().blue().bold(),
        TextKind::Assistant => Style::new().white().bright(),
        TextKind::Footer => Style::new().white().dim(),
    };
    style_obj.apply_to(text)
}

/// Formats a conversation entry as `role: content`.
pub fn format_message(message: &Message) -> String {
    let kind = match message.role {
        Role::User => TextKind::User,
        Role::Assistant => TextKind::Assistant,
    };
    let label = format!("{}:", message.role.as_str());
    format!("{} {}", style_text(&label, kind), message.content)
}

pub fn format_config(config: &ChatbotConfig) -> String {
    let mut lines = vec![
        format!("Chatbot:   {}", config.chatbot_name),
        format!("Site:      {} ({})", config.site_name, config.site_url),
        format!("Welcome:   {}", config.welcome_message),
        format!("Business:  {}", config.business_profile),
    ];
    if let Some(profile) = &config.assistant_profile {
        lines.push(format!("Assistant: {profile}"));
    }
    lines.push(format!("Color:     {}", config.primary_color));
    lines.push(format!("Position:  {}", config.position.as_str()));
    if let Some(avatar) = &config.avatar_url {
        lines.push(format!("Avatar:    {avatar}"));
    }
    lines.join("\n")
}

/// Prints a formatted error message to stderr.
pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error:#}");
}
