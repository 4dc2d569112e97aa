//! Colored line output, when stdout is a terminal that can show it.

use std::io::Write;

#[cfg(unix)]
mod unix {
    pub fn use_color() -> bool {
        unsafe {
            libc::isatty(/* stdout */ 1) == 1
        }
    }
}

#[cfg(unix)]
pub use unix::*;

#[cfg(windows)]
mod windows {
    use windows_sys::Win32::System::Console::*;

    pub fn use_color() -> bool {
        unsafe {
            let handle = GetStdHandle(STD_OUTPUT_HANDLE);
            let mut mode = 0;
            // Note: GetConsoleMode itself fails when not attached to a console.
            let ok = GetConsoleMode(handle, &mut mode) != 0;
            if ok {
                // Enable terminal processing so escape codes are interpreted.
                // Ignore errors.
                _ = SetConsoleMode(handle, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
            }
            ok
        }
    }
}

#[cfg(windows)]
pub use windows::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    pub fn use_color() -> bool {
        false
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// SGR code for the bright variant.
    fn code(self) -> u8 {
        90 + self as u8
    }
}

/// Prints lines to stdout.
#[derive(Clone, Debug)]
pub struct Console {
    color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Console { color }
    }

    /// A console that colors output only if stdout is a terminal.
    pub fn detect() -> Self {
        Self::new(use_color())
    }

    pub fn format(&self, color: Option<Color>, msg: &str) -> String {
        match color {
            Some(c) if self.color => format!("\x1b[{}m{}\x1b[0m", c.code(), msg),
            _ => msg.to_string(),
        }
    }

    pub fn print(&self, msg: &str) {
        self.write(None, msg);
    }

    pub fn print_color(&self, color: Color, msg: &str) {
        self.write(Some(color), msg);
    }

    fn write(&self, color: Option<Color>, msg: &str) {
        let line = self.format(color, msg);
        let mut stdout = std::io::stdout().lock();
        // Ignore errors, e.g. stdout closed early by a pager.
        let _ = writeln!(stdout, "{}", line);
    }

    pub fn black(&self, msg: &str) {
        self.print_color(Color::Black, msg)
    }
    pub fn red(&self, msg: &str) {
        self.print_color(Color::Red, msg)
    }
    pub fn green(&self, msg: &str) {
        self.print_color(Color::Green, msg)
    }
    pub fn yellow(&self, msg: &str) {
        self.print_color(Color::Yellow, msg)
    }
    pub fn blue(&self, msg: &str) {
        self.print_color(Color::Blue, msg)
    }
    pub fn magenta(&self, msg: &str) {
        self.print_color(Color::Magenta, msg)
    }
    pub fn cyan(&self, msg: &str) {
        self.print_color(Color::Cyan, msg)
    }
    pub fn white(&self, msg: &str) {
        self.print_color(Color::White, msg)
    }
}
