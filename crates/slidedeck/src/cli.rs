use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::theme::THEME_NAMES;

#[derive(Parser)]
#[command(name = "slidedeck")]
#[command(author, version, about)]
#[command(long_about = "A keyboard and touch driven markdown slideshow.\n\n\
    Examples:\n  \
    slidedeck talk.md                 Present fullscreen\n  \
    slidedeck talk.md --windowed      Present in a window\n  \
    slidedeck talk.md --theme cyber   Override the deck theme\n  \
    slidedeck export talk.md          Write one PNG per slide")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown deck to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Theme to use instead of the deck's own
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(THEME_NAMES))]
    pub theme: Option<String>,

    /// Where Ctrl+P writes the print capture
    #[arg(long, value_name = "PATH")]
    pub print_to: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Export every slide as a PNG image
    Export {
        /// Markdown deck to export
        file: PathBuf,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (defaults.theme, defaults.start_slide, print.output)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Export {
                file,
                output_dir,
                width,
                height,
            }) => crate::commands::export::run(file, output_dir, width, height),
            Some(Commands::Version) => {
                println!("slidedeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::app::run(crate::app::RunOptions {
                        file,
                        windowed: self.windowed,
                        start_slide: self.slide,
                        theme: self.theme,
                        print_to: self.print_to,
                    })
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_present_flags() {
        let cli = Cli::try_parse_from([
            "slidedeck", "deck.md", "--windowed", "--slide", "3", "--theme", "cyber", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("deck.md")));
        assert!(cli.windowed);
        assert_eq!(cli.slide, Some(3));
        assert_eq!(cli.theme.as_deref(), Some("cyber"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["slidedeck", "deck.md", "--theme", "neon"]).is_err());
    }

    #[test]
    fn test_export_subcommand() {
        let cli = Cli::try_parse_from(["slidedeck", "export", "deck.md", "-o", "out"]).unwrap();
        match cli.command {
            Some(Commands::Export {
                file,
                output_dir,
                width,
                height,
            }) => {
                assert_eq!(file, PathBuf::from("deck.md"));
                assert_eq!(output_dir, PathBuf::from("out"));
                assert_eq!((width, height), (1920, 1080));
            }
            _ => panic!("expected export subcommand"),
        }
    }
}
