mod args;
mod logging;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use rcptcheck::{Identity, Verifier, VerifierConfig};

use args::{Cli, Commands};
use output::CheckRow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let emails: Vec<String> = if cli.stdin {
        io::stdin()
            .lock()
            .lines()
            .map(|line| line.context("read stdin"))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect()
    } else if let Some(Commands::Check { emails }) = &cli.cmd {
        emails.clone()
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    let identity = Identity::from_host(cli.helo.as_deref(), cli.mail_from.as_deref());
    tracing::debug!(fqdn = %identity.fqdn, sender = %identity.sender, "identity");

    let mut config = VerifierConfig {
        port: cli.port,
        ..VerifierConfig::default()
    };
    config.set_timeout_secs(cli.timeout);
    config.accept_codes(cli.accept.iter().copied());

    let mut verifier = Verifier::new(identity)
        .context("DNS resolver initialisation")?
        .with_config(config)
        .with_parse_mode(cli.parsed_mode());

    let mut rows = Vec::with_capacity(emails.len());
    for email in &emails {
        let result = verifier.verify(email);
        let last = verifier.last_outcome().unwrap_or((0, ""));
        rows.push(CheckRow::from_result(email.trim(), result, last));
    }

    output::emit(&rows, &cli.format)?;

    // codes de sortie : 0 tout accepté, 2 au moins un refus, 1 fatal
    if rows.iter().any(|r| !r.accepted) {
        std::process::exit(2);
    }
    Ok(())
}
