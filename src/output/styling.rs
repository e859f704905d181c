use console::{style, StyledObject};

/// Terminal styles keyed by what the text means rather than its color
pub fn title(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

pub fn muted(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn pending(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn ok(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn failed(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().red()
}
