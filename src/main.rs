//! Arenatris — falling-block arena game in the terminal.

mod app;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref()).unwrap_or_default();
    let mut app = App::new(args, theme);
    let summary = app.run()?;
    println!(
        "Final score: {} ({} lines, {} pieces)",
        summary.score, summary.lines_cleared, summary.pieces_locked
    );
    Ok(())
}

/// Falling-block arena game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "arenatris",
    version,
    about = "Falling-block arena game in the terminal. Shift, rotate and drop pieces; full rows clear and score lines².",
    long_about = "Arenatris is a terminal falling-block game.\n\n\
        Pieces appear at the top centre of the arena. Move and rotate them, then drop them \
        onto the stack. Every full row is removed; clearing n rows at once scores n².\n\
        The game ends when a new piece does not fit at the top.\n\n\
        CONTROLS:\n  Left/Right h/l  Move      Up k/i   Rotate CW   u/z   Rotate CCW\n  \
        Down j          Down (drops when resting)   Space/Enter  Drop   q/Esc  Quit\n\n\
        With --text the game reads numbered commands (0-6) from stdin and prints ASCII frames."
)]
pub struct Args {
    /// Arena width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: i32,

    /// Arena height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: i32,

    /// Seed for the piece sequence; random when not set.
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Plain line mode: numbered commands on stdin, ASCII frames on stdout.
    #[arg(long)]
    pub text: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let args = Args::try_parse_from(["arenatris"]).unwrap();
        assert_eq!((args.width, args.height), (10, 20));
        assert!(args.seed.is_none());
        assert!(!args.text);
    }

    #[test]
    fn flags_parse() {
        let args =
            Args::try_parse_from(["arenatris", "--width", "6", "--height", "6", "-s", "42", "--text"])
                .unwrap();
        assert_eq!((args.width, args.height), (6, 6));
        assert_eq!(args.seed, Some(42));
        assert!(args.text);
    }
}
