use std::time::{Duration, Instant};

use crate::app::Mode;

/// Severity of a transient status message; controls color and how long the
/// message stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn display_for(self) -> Duration {
        match self {
            Severity::Info => Duration::from_secs(3),
            Severity::Success => Duration::from_secs(2),
            Severity::Warning => Duration::from_secs(5),
            Severity::Error => Duration::from_secs(7),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub severity: Severity,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(content: String, severity: Severity) -> Self {
        Self {
            content,
            severity,
            expires_at: Instant::now() + severity.display_for(),
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Interface state outside the text engine: the UI mode, the vim-style mode
/// banner, the `:` command line and the transient status message.
pub struct UiState {
    mode: Mode,
    mode_banner: &'static str,
    status: Option<StatusMessage>,
    command_buffer: String,
    should_quit: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            mode_banner: "",
            status: None,
            command_buffer: String::new(),
            should_quit: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_banner(&self) -> &str {
        self.mode_banner
    }

    pub fn enter_normal_mode(&mut self) {
        self.mode = Mode::Normal;
        self.mode_banner = "";
    }

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
        self.mode_banner = "-- INSERT --";
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.mode_banner = "";
        self.command_buffer.clear();
    }

    pub fn enter_help(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_save_prompt(&mut self) {
        self.mode = Mode::SavePrompt;
        self.mode_banner = "";
    }

    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    pub fn push_to_command_buffer(&mut self, c: char) {
        self.command_buffer.push(c);
    }

    pub fn pop_from_command_buffer(&mut self) {
        self.command_buffer.pop();
    }

    /// Empties the command line and returns what it held.
    pub fn take_command_buffer(&mut self) -> String {
        std::mem::take(&mut self.command_buffer)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_info(&mut self, content: impl Into<String>) {
        self.status = Some(StatusMessage::new(content.into(), Severity::Info));
    }

    pub fn set_success(&mut self, content: impl Into<String>) {
        self.status = Some(StatusMessage::new(content.into(), Severity::Success));
    }

    pub fn set_warning(&mut self, content: impl Into<String>) {
        self.status = Some(StatusMessage::new(content.into(), Severity::Warning));
    }

    pub fn set_error(&mut self, content: impl Into<String>) {
        self.status = Some(StatusMessage::new(content.into(), Severity::Error));
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Drops the status message once its display time has passed. Called
    /// once per event-loop cycle.
    pub fn update(&mut self) {
        if self.status.as_ref().is_some_and(|m| m.expired()) {
            self.status = None;
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_normal_mode() {
        let state = UiState::new();
        assert!(matches!(state.mode(), Mode::Normal));
        assert_eq!(state.mode_banner(), "");
        assert_eq!(state.command_buffer(), "");
        assert!(!state.should_quit());
    }

    #[test]
    fn mode_transitions_set_the_banner() {
        let mut state = UiState::new();

        state.enter_insert_mode();
        assert!(matches!(state.mode(), Mode::Insert));
        assert_eq!(state.mode_banner(), "-- INSERT --");

        state.enter_normal_mode();
        assert!(matches!(state.mode(), Mode::Normal));
        assert_eq!(state.mode_banner(), "");
    }

    #[test]
    fn entering_command_mode_clears_the_buffer() {
        let mut state = UiState::new();
        state.push_to_command_buffer('w');
        state.enter_command_mode();
        assert_eq!(state.command_buffer(), "");
    }

    #[test]
    fn command_buffer_edits() {
        let mut state = UiState::new();
        state.push_to_command_buffer('w');
        state.push_to_command_buffer('q');
        assert_eq!(state.command_buffer(), "wq");
        state.pop_from_command_buffer();
        assert_eq!(state.command_buffer(), "w");
        assert_eq!(state.take_command_buffer(), "w");
        assert_eq!(state.command_buffer(), "");
    }

    #[test]
    fn status_messages_carry_severity() {
        let mut state = UiState::new();
        state.set_error("boom");
        let status = state.status().unwrap();
        assert_eq!(status.content, "boom");
        assert_eq!(status.severity, Severity::Error);

        state.set_success("ok");
        assert_eq!(state.status().unwrap().severity, Severity::Success);
    }

    #[test]
    fn update_keeps_unexpired_messages() {
        let mut state = UiState::new();
        state.set_info("hello");
        state.update();
        assert!(state.status().is_some());
    }

    #[test]
    fn quit_flag_sticks() {
        let mut state = UiState::new();
        state.quit();
        assert!(state.should_quit());
    }
}
