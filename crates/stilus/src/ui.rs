use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Mode};
use crate::ui_state::Severity;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Editor area
            Constraint::Length(2), // Status area
        ])
        .split(f.size());

    draw_title_bar(f, app, chunks[0]);

    if matches!(app.mode(), Mode::Help) {
        draw_help(f, chunks[1]);
    } else {
        draw_editor(f, app, chunks[1]);
    }

    draw_status_area(f, app, chunks[2]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let name = match app.file_path() {
        Some(path) => path.display().to_string(),
        None => String::from("[No Name]"),
    };
    let modified = if app.is_modified() { " [Modified]" } else { "" };
    let title = format!("  Stilus -- {name}{modified}");

    let title_bar = Paragraph::new(title)
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(title_bar, area);
}

fn draw_editor(f: &mut Frame, app: &mut App, area: Rect) {
    app.editor.set_view_height(area.height as usize);

    let number_width = if app.config.editor.line_numbers {
        line_number_width(app.editor.line_count())
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(number_width), Constraint::Min(0)])
        .split(area);

    let visible = app.editor.visible_lines();
    let top_row = app.editor.top_row();

    if app.config.editor.line_numbers {
        let numbers: Vec<Line> = (0..visible.len())
            .map(|i| Line::from(format!("{:>width$} ", top_row + i + 1, width = number_width as usize - 1)))
            .collect();
        let widget = Paragraph::new(numbers).style(Style::default().fg(Color::DarkGray));
        f.render_widget(widget, chunks[0]);
    }

    let lines = if app.config.editor.syntax_highlighting {
        app.highlighter
            .highlight(&visible, app.file_path().map(|p| p.as_path()))
    } else {
        visible.iter().map(|l| Line::from(l.clone())).collect()
    };
    let content = Paragraph::new(lines).style(Style::default().fg(Color::White));
    f.render_widget(content, chunks[1]);

    place_cursor(f, app, chunks[1]);
}

// The engine's column is a character offset; the terminal cursor needs a
// display-cell offset, so wide characters count for their rendered width.
fn place_cursor(f: &mut Frame, app: &App, area: Rect) {
    let cursor = app.editor.display_cursor();
    let top_row = app.editor.top_row();
    if cursor.row < top_row || cursor.row >= top_row + area.height as usize {
        return;
    }

    let visible = app.editor.visible_lines();
    let line = &visible[cursor.row - top_row];
    let x_offset: usize = line
        .chars()
        .take(cursor.col)
        .filter_map(UnicodeWidthChar::width)
        .sum();

    let x = area.x + (x_offset as u16).min(area.width.saturating_sub(1));
    let y = area.y + (cursor.row - top_row) as u16;
    f.set_cursor(x, y);
}

fn line_number_width(line_count: usize) -> u16 {
    let digits = line_count.to_string().len().max(3);
    digits as u16 + 1
}

fn draw_status_area(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    // First row: the command line while it is open, shortcuts otherwise.
    if matches!(app.mode(), Mode::Command) {
        let input = Paragraph::new(format!(":{}", app.ui_state.command_buffer()))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(input, chunks[0]);
    } else {
        let bold = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let shortcuts = Line::from(vec![
            Span::styled(":", bold),
            Span::raw(" Command  "),
            Span::styled("i", bold),
            Span::raw(" Insert  "),
            Span::styled("?", bold),
            Span::raw(" Help  "),
            Span::styled("hjkl", bold),
            Span::raw(" Move"),
        ]);
        let bar = Paragraph::new(shortcuts).style(Style::default().bg(Color::DarkGray));
        f.render_widget(bar, chunks[0]);
    }

    // Second row: transient status or the mode banner, plus the position.
    let (content, style) = match app.ui_state.status() {
        Some(message) => (
            message.content.clone(),
            Style::default().fg(severity_color(message.severity)),
        ),
        None => (
            app.ui_state.mode_banner().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(chunks[1]);

    f.render_widget(Paragraph::new(content).style(style), halves[0]);

    let cursor = app.editor.display_cursor();
    let position = Paragraph::new(format!("{},{}", cursor.row + 1, cursor.col + 1))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(position, halves[1]);
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::White,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            " HELP -- Key Bindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(" Modes:"),
        Line::from("  i       Insert before cursor"),
        Line::from("  a       Insert after cursor"),
        Line::from("  o / O   Open line below / above"),
        Line::from("  Esc     Back to normal mode"),
        Line::from("  :       Command line"),
        Line::from(""),
        Line::from(" Movement (normal mode):"),
        Line::from("  h j k l Left, down, up, right"),
        Line::from("  0 / $   Line start / end"),
        Line::from(""),
        Line::from(" Editing (normal mode):"),
        Line::from("  x       Delete character under cursor"),
        Line::from("  dd      Delete line"),
        Line::from("  u       Undo"),
        Line::from("  Ctrl-R  Redo"),
        Line::from(""),
        Line::from(" Commands:"),
        Line::from("  :w [file]   Write"),
        Line::from("  :q          Quit (if no changes)"),
        Line::from("  :q!         Quit without saving"),
        Line::from("  :wq         Write and quit"),
        Line::from("  :e file     Edit file"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc to close help",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Left);
    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &mut App) -> ratatui::buffer::Buffer {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn draws_title_content_and_position() {
        let mut app = App::new(Config::default());
        app.editor.set_content("hello\nworld");
        let text = buffer_text(&render(&mut app));
        assert!(text.contains("Stilus -- [No Name]"));
        assert!(text.contains("hello"));
        assert!(text.contains("world"));
        assert!(text.contains("1,1"));
    }

    #[test]
    fn line_numbers_can_be_disabled() {
        let mut config = Config::default();
        config.editor.line_numbers = false;
        let mut app = App::new(config);
        app.editor.set_content("solo");
        let text = buffer_text(&render(&mut app));
        assert!(!text.contains("  1 "));
    }

    #[test]
    fn help_mode_shows_the_key_table() {
        let mut app = App::new(Config::default());
        app.ui_state.enter_help();
        let text = buffer_text(&render(&mut app));
        assert!(text.contains("HELP -- Key Bindings"));
    }

    #[test]
    fn number_width_grows_with_the_document() {
        assert_eq!(line_number_width(5), 4);
        assert_eq!(line_number_width(999), 4);
        assert_eq!(line_number_width(1000), 5);
    }
}
