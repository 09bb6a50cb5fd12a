/// Total width of a rendered panel row, in characters.
pub const PANEL_WIDTH: usize = 40;
/// Width of the label column; the value column takes the rest.
pub const LABEL_WIDTH: usize = 20;
pub const INDENT: &str = "  ";

pub const ANSI_CLEAR: &str = "\x1b[2J\x1b[H";
pub const ANSI_BOLD: &str = "\x1b[1m";
pub const ANSI_DIM: &str = "\x1b[2m";
pub const ANSI_RESET: &str = "\x1b[0m";
