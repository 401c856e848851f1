//! ANSI decoration for generated source written to a terminal.

const RESET: &str = "\x1b[0m";

/// Color palette applied to generated code fragments. When disabled,
/// every method returns its input unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(self, s: &str, code: &str) -> String {
        if self.enabled {
            // Re-open the color across nested resets so wrapping
            // colored text keeps the outer color.
            format!("{code}{}{RESET}", s.replace(RESET, code))
        } else {
            s.to_string()
        }
    }

    #[must_use]
    pub fn blue(self, s: &str) -> String {
        self.paint(s, "\x1b[94m")
    }

    #[must_use]
    pub fn gray(self, s: &str) -> String {
        self.paint(s, "\x1b[97m")
    }

    #[must_use]
    pub fn green(self, s: &str) -> String {
        self.paint(s, "\x1b[92m")
    }

    #[must_use]
    pub fn orange(self, s: &str) -> String {
        self.paint(s, "\x1b[93m")
    }

    #[must_use]
    pub fn red(self, s: &str) -> String {
        self.paint(s, "\x1b[91m")
    }
}
