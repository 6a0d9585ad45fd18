use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::command_processor::CommandProcessor;
use crate::config::Config;
use crate::file_manager::FileManager;
use crate::highlight::Highlighter;
use crate::ui_state::UiState;
use textcore::Editor;

/// Interface mode. `Normal` and `Insert` mirror the editor's own modal
/// state; the rest are overlays owned by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
    Help,
    SavePrompt,
}

pub struct App {
    pub editor: Editor,
    pub config: Config,
    pub ui_state: UiState,
    pub file_manager: FileManager,
    pub command_processor: CommandProcessor,
    pub highlighter: Highlighter,
    // Pending first key of a two-key command, e.g. the first `d` of `dd`.
    last_key: Option<char>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut editor = Editor::new();
        editor.set_scroll_margin(config.editor.scroll_margin);
        editor.set_history_limit(config.editor.history_limit);
        let highlighter = Highlighter::new(&config.theme.syntax_theme);

        Self {
            editor,
            config,
            ui_state: UiState::new(),
            file_manager: FileManager::new(),
            command_processor: CommandProcessor::new(),
            highlighter,
            last_key: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.ui_state.mode()
    }

    pub fn is_modified(&self) -> bool {
        self.editor.is_modified()
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit()
    }

    pub fn file_path(&self) -> Option<&std::path::PathBuf> {
        self.file_manager.current_path()
    }

    /// Quit entry point for the application shell: prompts when there are
    /// unsaved changes, quits directly otherwise.
    pub fn request_quit(&mut self) {
        if self.is_modified() {
            self.ui_state
                .set_warning("Save changes before exit? (y/n/c)");
            self.ui_state.enter_save_prompt();
        } else {
            self.ui_state.quit();
        }
    }

    pub fn update_status(&mut self) {
        self.ui_state.update();
    }

    fn enter_insert_mode(&mut self) {
        self.editor.enter_insert_mode();
        self.ui_state.enter_insert_mode();
    }

    fn enter_normal_mode(&mut self) {
        self.editor.enter_normal_mode();
        self.ui_state.enter_normal_mode();
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match self.ui_state.mode() {
            Mode::Normal => self.handle_normal_mode_key(key),
            Mode::Insert => self.handle_insert_mode_key(key),
            Mode::Command => self.handle_command_key(key).await,
            Mode::Help => self.handle_help_key(key),
            Mode::SavePrompt => self.handle_save_prompt_key(key).await,
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) -> Result<()> {
        // Any key other than `d` breaks a pending `dd`.
        if key.code != KeyCode::Char('d') {
            self.last_key = None;
        }

        match key.code {
            // Vim-style movement
            KeyCode::Char('h') | KeyCode::Left => self.editor.move_left(),
            KeyCode::Char('j') | KeyCode::Down => self.editor.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.editor.move_up(),
            KeyCode::Char('l') | KeyCode::Right => self.editor.move_right(),
            KeyCode::Char('0') | KeyCode::Home => self.editor.move_to_line_start(),
            KeyCode::Char('$') | KeyCode::End => self.editor.move_to_line_end(),

            // Insert mode entries
            KeyCode::Char('i') => self.enter_insert_mode(),
            KeyCode::Char('a') => {
                self.editor.move_right();
                self.enter_insert_mode();
            }
            KeyCode::Char('o') => {
                self.editor.enter_insert_mode();
                self.editor.move_to_line_end();
                self.editor.line_break()?;
                self.ui_state.enter_insert_mode();
            }
            KeyCode::Char('O') => {
                self.editor.enter_insert_mode();
                self.editor.move_to_line_start();
                self.editor.line_break()?;
                self.editor.move_up();
                self.ui_state.enter_insert_mode();
            }

            // Deletion
            KeyCode::Char('x') => self.editor.delete_char()?,
            KeyCode::Char('d') => {
                if self.last_key == Some('d') {
                    self.editor.delete_line()?;
                    self.ui_state.set_success("Line deleted");
                    self.last_key = None;
                } else {
                    self.last_key = Some('d');
                }
            }

            // Undo / redo
            KeyCode::Char('u') => {
                if self.editor.undo() {
                    self.ui_state.set_success("Undone");
                } else {
                    self.ui_state.set_warning("Nothing to undo");
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.editor.redo() {
                    self.ui_state.set_success("Redone");
                } else {
                    self.ui_state.set_warning("Nothing to redo");
                }
            }

            // Overlays
            KeyCode::Char(':') => self.ui_state.enter_command_mode(),
            KeyCode::Char('?') => self.ui_state.enter_help(),

            _ => {}
        }
        Ok(())
    }

    fn handle_insert_mode_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.enter_normal_mode(),
            KeyCode::Char(c) => self.editor.insert_char(c)?,
            KeyCode::Enter => self.editor.line_break()?,
            KeyCode::Backspace => self.editor.backspace()?,
            KeyCode::Delete => self.editor.delete_char()?,

            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),

            _ => {}
        }
        Ok(())
    }

    async fn handle_command_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => {
                let command = self.ui_state.take_command_buffer();
                let mut should_quit = false;
                match self
                    .command_processor
                    .execute_command(
                        &command,
                        &mut self.editor,
                        &mut self.file_manager,
                        &mut should_quit,
                    )
                    .await
                {
                    Ok(message) if !message.is_empty() => {
                        if message.contains("written") {
                            self.ui_state.set_success(message);
                        } else {
                            self.ui_state.set_info(message);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => self.ui_state.set_error(e.to_string()),
                }
                if should_quit {
                    self.ui_state.quit();
                }
                self.enter_normal_mode();
            }
            KeyCode::Esc => {
                self.ui_state.take_command_buffer();
                self.enter_normal_mode();
            }
            KeyCode::Char(c) => self.ui_state.push_to_command_buffer(c),
            KeyCode::Backspace => self.ui_state.pop_from_command_buffer(),
            _ => {}
        }
        Ok(())
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            self.enter_normal_mode();
        }
        Ok(())
    }

    async fn handle_save_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.file_manager.save_file(&mut self.editor).await {
                    Ok(_) => self.ui_state.quit(),
                    Err(e) => {
                        self.ui_state.set_error(format!("Save failed: {e}"));
                        self.enter_normal_mode();
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.ui_state.quit(),
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => {
                self.ui_state.clear_status();
                self.enter_normal_mode();
            }
            _ => {}
        }
        Ok(())
    }
}
