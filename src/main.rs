use bank_ledger::{
    cli::Session,
    config::Config,
    input,
    ledger::Ledger,
    output,
    store::{AutoSave, JsonFileStore},
};

use anyhow::Context;
use clap::Parser;
use std::{fs::File, io, path::Path};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr, stdout belongs to the menu.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let store = JsonFileStore::new(&config.data_file);
    info!(path = %store.path().display(), "opening ledger");

    // From here on, the ledger is saved however we exit.
    let mut ledger = AutoSave::new(Ledger::open(&store), &store);

    if let Some(path) = &config.import {
        import(&mut ledger, path)?;
    }

    Session::new(
        &mut ledger,
        io::stdin().lock(),
        io::stdout().lock(),
        &config.currency_symbol,
    )
    .run()
    .context("interactive session failed")?;

    if let Some(path) = &config.export {
        if let Err(err) = export(&ledger, path) {
            error!(%err, "failed to export accounts");
            eprintln!("Error exporting accounts: {err:#}");
        }
    }

    match ledger.finish() {
        Ok(()) => println!("Data saved successfully. Goodbye!"),
        Err(err) => {
            error!(%err, "failed to save the ledger");
            eprintln!("Error saving data: {err}");
        }
    }

    Ok(())
}

/// Open every account listed in the CSV file at `path`.
/// Bad rows and invalid accounts are reported and skipped.
fn import(ledger: &mut Ledger, path: &Path) -> anyhow::Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut specs = Vec::new();
    for (row, result) in input::parse(file).into_iter().enumerate() {
        match result {
            Ok(spec) => specs.push(spec),
            Err(err) => warn!(row = row + 1, %err, "skipping row"),
        }
    }

    let report = ledger.create_accounts_batch(specs);
    println!(
        "Imported {} accounts from {} ({} skipped).",
        report.created.len(),
        path.display(),
        report.failures.len()
    );

    Ok(())
}

fn export(ledger: &Ledger, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    output::write(file, ledger.accounts())?;
    info!(path = %path.display(), "accounts exported");

    Ok(())
}
