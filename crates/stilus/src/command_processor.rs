use anyhow::Result;
use std::path::PathBuf;

use crate::file_manager::FileManager;
use textcore::Editor;

/// Executes ex-style `:` commands against the editor session.
pub struct CommandProcessor;

impl CommandProcessor {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute_command(
        &self,
        command: &str,
        editor: &mut Editor,
        file_manager: &mut FileManager,
        should_quit: &mut bool,
    ) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some(&name) = parts.first() else {
            return Ok(String::new());
        };

        match name {
            "w" => {
                if let Some(&path) = parts.get(1) {
                    file_manager.save_file_as(PathBuf::from(path), editor).await
                } else if file_manager.has_file() {
                    file_manager.save_file(editor).await
                } else {
                    Err(anyhow::anyhow!("E32: No file name"))
                }
            }
            "q" => {
                if editor.is_modified() {
                    Ok("No write since last change (use :q! to override)".to_string())
                } else {
                    *should_quit = true;
                    Ok(String::new())
                }
            }
            "q!" => {
                *should_quit = true;
                Ok(String::new())
            }
            "wq" => {
                let written = if file_manager.has_file() {
                    file_manager.save_file(editor).await?
                } else {
                    return Err(anyhow::anyhow!("E32: No file name"));
                };
                *should_quit = true;
                Ok(written)
            }
            "e" => {
                let Some(&path) = parts.get(1) else {
                    return Err(anyhow::anyhow!("E471: Argument required"));
                };
                let content = file_manager.open_file(PathBuf::from(path)).await?;
                editor.set_content(&content);
                Ok(format!("\"{path}\" {}L", editor.line_count()))
            }
            _ => Err(anyhow::anyhow!("E492: Not an editor command: {name}")),
        }
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    async fn run(
        command: &str,
        editor: &mut Editor,
        file_manager: &mut FileManager,
    ) -> (Result<String>, bool) {
        let cp = CommandProcessor::new();
        let mut should_quit = false;
        let result = cp
            .execute_command(command, editor, file_manager, &mut should_quit)
            .await;
        (result, should_quit)
    }

    #[tokio::test]
    async fn quit_refuses_with_unsaved_changes() {
        let mut editor = Editor::new();
        let mut fm = FileManager::new();

        let (result, quit) = run("q", &mut editor, &mut fm).await;
        assert!(result.is_ok());
        assert!(quit);

        editor.enter_insert_mode();
        editor.insert_char('a').unwrap();
        let (result, quit) = run("q", &mut editor, &mut fm).await;
        assert!(result.unwrap().contains("No write since last change"));
        assert!(!quit);

        let (result, quit) = run("q!", &mut editor, &mut fm).await;
        assert!(result.is_ok());
        assert!(quit);
    }

    #[tokio::test]
    async fn write_without_a_file_name_fails() {
        let mut editor = Editor::new();
        let mut fm = FileManager::new();
        let (result, _) = run("w", &mut editor, &mut fm).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn edit_loads_the_file_and_write_saves_it() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "initial content").unwrap();

        let mut editor = Editor::new();
        let mut fm = FileManager::new();

        let cmd = format!("e {}", temp_file.path().display());
        let (result, _) = run(&cmd, &mut editor, &mut fm).await;
        assert!(result.is_ok());
        assert_eq!(editor.text(), "initial content");

        editor.enter_insert_mode();
        editor.insert_char('!').unwrap();
        let (result, _) = run("w", &mut editor, &mut fm).await;
        assert!(result.is_ok());
        assert!(!editor.is_modified());
        assert_eq!(
            std::fs::read_to_string(temp_file.path()).unwrap(),
            "!initial content"
        );
    }

    #[tokio::test]
    async fn write_and_quit_does_both() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut editor = Editor::from_str("content");
        let mut fm = FileManager::new();

        let cmd = format!("w {}", temp_file.path().display());
        let (result, _) = run(&cmd, &mut editor, &mut fm).await;
        assert!(result.is_ok());

        editor.enter_insert_mode();
        editor.insert_char('x').unwrap();
        let (result, quit) = run("wq", &mut editor, &mut fm).await;
        assert!(result.is_ok());
        assert!(quit);
        assert!(!editor.is_modified());
    }

    #[tokio::test]
    async fn unknown_commands_are_rejected() {
        let mut editor = Editor::new();
        let mut fm = FileManager::new();
        let (result, _) = run("frobnicate", &mut editor, &mut fm).await;
        assert!(result.unwrap_err().to_string().contains("E492"));
    }

    #[tokio::test]
    async fn empty_command_is_a_noop() {
        let mut editor = Editor::new();
        let mut fm = FileManager::new();
        let (result, quit) = run("   ", &mut editor, &mut fm).await;
        assert_eq!(result.unwrap(), "");
        assert!(!quit);
    }
}
