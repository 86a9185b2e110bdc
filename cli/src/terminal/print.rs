use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Target of raw terminal output. The formatter prints these events without a symbol.
pub const PRINT_TARGET: &str = "lanmap::print";

/// Key column of host and interface trees.
const TREE_KEY_WIDTH: usize = 7;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    tracing::info!(target: PRINT_TARGET, raw_msg = msg);
}

/// `left` and `right` fill characters around `title`, `TOTAL_WIDTH` columns in total.
fn rule(title: &str, fill: &str) -> (String, String) {
    let room: usize = TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(title));
    (fill.repeat(room / 2), fill.repeat(room - room / 2))
}

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    let title: String = format!("⟦ LANMAP v{} ⟧", env!("CARGO_PKG_VERSION"));
    let (left, right) = rule(&title, "═");
    print(&format!(
        "{}{}{}",
        left.bright_black(),
        title.bright_green().bold(),
        right.bright_black()
    ));
    centerln(&format!("{}", "routers · printers · set-top boxes · smart TVs".color(colors::SECONDARY)));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let title: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let (left, right) = rule(&title, "─");
    print(&format!(
        "{}{}{}",
        left.bright_black(),
        title.bright_green(),
        right.bright_black()
    ));
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).bright_black().to_string());
}

/// `key....: value` with dots padding `key` to `key_width`.
pub fn aligned_line(key: &str, key_width: usize, value: ColoredString) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    print(&format!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    ));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

/// One branch per row under the last [`tree_head`].
pub fn tree_rows(rows: &[(String, ColoredString)]) {
    for (i, (key, value)) in rows.iter().enumerate() {
        let branch: &str = match i + 1 == rows.len() {
            true => "└─",
            false => "├─",
        };
        print(&tree_row(branch, key, value));
    }
}

fn tree_row(branch: &str, key: &str, value: &ColoredString) -> String {
    let dots: String = ".".repeat(TREE_KEY_WIDTH.saturating_sub(key.len()));
    format!(
        " {} {}{}{} {}",
        branch.bright_black(),
        key.color(colors::TEXT_DEFAULT),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    )
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}{space}"));
}

const EMPTY_SUBNET: &str = r#"
            .-------.      .  .  .  .  .  .      .-------.
            | o   o |  ~~  .               .  ~~ | ?   ? |
            '---+---'      .  .  .  .  .  .      '---+---'
           _____|_____                          _____|_____
"#;

/// Shown when a scan or listing comes back empty.
pub fn no_results() {
    print(&EMPTY_SUBNET.color(colors::SEPARATOR).to_string());
    centerln(&"nothing answered on this network".red().bold().to_string());
}

pub fn end_of_program() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_fills_to_total_width() {
        let title = "⟦ NETWORK DISCOVERY ⟧";
        let (left, right) = rule(title, "─");
        let width = left.chars().count() + UnicodeWidthStr::width(title) + right.chars().count();
        assert_eq!(width, TOTAL_WIDTH);
    }

    #[test]
    fn tree_row_pads_short_keys() {
        colored::control::set_override(false);
        let row = tree_row("└─", "IPv4", &"192.168.1.1".normal());
        assert_eq!(row, " └─ IPv4...: 192.168.1.1");
    }
}
