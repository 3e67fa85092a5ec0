use clap::{ArgAction, Parser, Subcommand};
use rcptcheck::{DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, ParseMode};

#[derive(Parser)]
#[command(name = "rcptcheck-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// format: human|json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// mode de syntaxe: strict|relaxed
    #[arg(long, default_value = "strict")]
    pub mode: String,

    /// nom utilisé pour EHLO/HELO (par défaut le nom d'hôte)
    #[arg(long)]
    pub helo: Option<String>,

    /// enveloppe MAIL FROM (par défaut $USER@<helo>)
    #[arg(long = "from")]
    pub mail_from: Option<String>,

    /// timeout de connexion (secondes, 0 = aucun)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// code de réponse supplémentaire considéré comme valide (répétable)
    #[arg(long = "accept")]
    pub accept: Vec<i32>,

    /// port SMTP
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// -v: info, -vv: debug (RUST_LOG prend le pas)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// teste une ou plusieurs adresses
    Check { emails: Vec<String> },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn parsed_mode(&self) -> ParseMode {
        mode_from_str(&self.mode)
    }
}

pub fn mode_from_str(s: &str) -> ParseMode {
    match s {
        "relaxed" => ParseMode::Relaxed,
        _ => ParseMode::Strict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_subcommand_with_repeated_accept() {
        let cli = <Cli as Parser>::try_parse_from([
            "rcptcheck-cli",
            "--accept",
            "252",
            "--accept",
            "553",
            "--mode",
            "relaxed",
            "check",
            "a@b.test",
            "c@d.test",
        ])
        .expect("valid arguments");
        assert_eq!(cli.accept, vec![252, 553]);
        assert_eq!(cli.parsed_mode(), ParseMode::Relaxed);
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cli.port, DEFAULT_PORT);
        match cli.cmd {
            Some(Commands::Check { emails }) => assert_eq!(emails, ["a@b.test", "c@d.test"]),
            None => panic!("missing subcommand"),
        }
    }

    #[test]
    fn unknown_mode_falls_back_to_strict() {
        assert_eq!(mode_from_str("loose"), ParseMode::Strict);
    }
}
