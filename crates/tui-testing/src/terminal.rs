//! Virtual terminal for headless testing.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::Terminal;

/// A virtual terminal for testing TUI applications.
pub struct TestTerminal {
    terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// Create a new test terminal with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create terminal");
        Self { terminal }
    }

    /// Get the current terminal size.
    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    /// Draw to the terminal.
    pub fn draw<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f).expect("Failed to draw to terminal");
    }

    /// Get a reference to the current buffer.
    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Get the buffer content as a string, one line per row.
    pub fn to_string(&self) -> String {
        let area = self.buffer().area;
        (0..area.height)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Assert that the buffer contains the given substring.
    pub fn assert_contains(&self, needle: &str) {
        let content = self.to_string();
        if !content.contains(needle) {
            panic!("Buffer does not contain \"{}\":\n{}", needle, content);
        }
    }

    /// Assert that the buffer does not contain the given substring.
    pub fn assert_not_contains(&self, needle: &str) {
        let content = self.to_string();
        if content.contains(needle) {
            panic!("Buffer unexpectedly contains \"{}\":\n{}", needle, content);
        }
    }

    /// Get the content of a specific line with trailing spaces trimmed.
    pub fn line(&self, line_num: u16) -> String {
        if line_num >= self.buffer().area.height {
            return String::new();
        }
        self.row_text(line_num).trim_end().to_string()
    }

    /// Find the first cell where `needle` starts.
    pub fn find(&self, needle: &str) -> Option<(u16, u16)> {
        let area = self.buffer().area;
        (0..area.height).find_map(|row| {
            let text = self.row_text(row);
            let byte = text.find(needle)?;
            let column = text[..byte].chars().count() as u16;
            Some((area.x + column, area.y + row))
        })
    }

    /// Foreground color of a cell.
    pub fn fg(&self, x: u16, y: u16) -> Option<Color> {
        self.buffer().cell((x, y)).map(|c| c.fg)
    }

    /// Resize the terminal.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal.backend_mut().resize(width, height);
    }

    fn row_text(&self, row: u16) -> String {
        let buffer = self.buffer();
        let area = buffer.area;
        let y = area.y + row;
        let mut result = String::new();
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        result
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
