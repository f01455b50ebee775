use ratatui::style::Color;

use crate::model::item::PriorityBand;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub indicator_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1A, 0x1B, 0x26),
            text: Color::Rgb(0xC0, 0xCA, 0xF5),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFF, 0x9E, 0x64),
            dim: Color::Rgb(0x56, 0x5F, 0x89),
            red: Color::Rgb(0xF7, 0x76, 0x8E),
            yellow: Color::Rgb(0xE0, 0xAF, 0x68),
            green: Color::Rgb(0x9E, 0xCE, 0x6A),
            cyan: Color::Rgb(0x7D, 0xCF, 0xFF),
            purple: Color::Rgb(0xBB, 0x9A, 0xF7),
            blue: Color::Rgb(0x7A, 0xA2, 0xF7),
            selection_bg: Color::Rgb(0x29, 0x2E, 0x42),
            indicator_bg: Color::Rgb(0x3B, 0x42, 0x61),
        }
    }
}

impl Theme {
    /// Color for a priority band badge
    pub fn priority_color(&self, band: PriorityBand) -> Color {
        match band {
            PriorityBand::High => self.red,
            PriorityBand::Medium => self.yellow,
            PriorityBand::Low => self.blue,
        }
    }

    /// Color for a due date relative to today
    pub fn due_color(&self, overdue: bool, due_today: bool) -> Color {
        if overdue {
            self.red
        } else if due_today {
            self.yellow
        } else {
            self.cyan
        }
    }
}
