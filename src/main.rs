extern crate env_logger;
#[macro_use]
extern crate log;
use std::io::{prelude::*, stdout, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;

use fuzzless::{Location, Pager, PagerConfig, RecordStore, StoreError, Viewport};

mod cli;

use cli::{Cli, Commands};

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    info!("fuzzless v{}", cli::VERSION);

    match &cli.command {
        Commands::View {
            file,
            config,
            width,
            height,
            at,
            scroll,
            revcomp,
        } => {
            let mut options = match config {
                Some(path) => PagerConfig::from_path(path)?,
                None => PagerConfig::default(),
            };
            if let Some(width) = width {
                options.width = *width;
            }

            let mut pager =
                Pager::open(file, &options).with_context(|| format!("Unable to open file {file}"))?;

            for record in revcomp {
                pager
                    .reverse_complement(*record)
                    .with_context(|| format!("Unable to reverse complement record {record}"))?;
            }

            let mut view = Viewport::new(Location::new(at.record, at.line), *height);
            view.scroll_by(&mut pager, *scroll, false);

            let mut writer = BufWriter::new(stdout());
            for row in view.render(&mut pager) {
                writeln!(writer, "{}", row.text.trim_end())?;
            }
            writer.flush()?;

            pager.close();
        }
        Commands::Count { file, max_records } => {
            let max_records = max_records.unwrap_or(fuzzless::config::DEFAULT_MAX_RECORDS);
            let mut store = RecordStore::open(file, 1, max_records)
                .with_context(|| format!("Unable to open file {file}"))?;

            let mut index: isize = 0;
            let count = loop {
                match store.ensure(index) {
                    Ok(()) => index += 1,
                    Err(StoreError::Exhausted { total, .. }) => break total,
                    Err(StoreError::CeilingExceeded { max_records, .. }) => {
                        warn!("Stopped counting at the limit of {max_records} records");
                        break max_records;
                    }
                    Err(e @ StoreError::Malformed { .. }) => {
                        warn!("Counting stopped early: {e}");
                        break store.len();
                    }
                    Err(e) => return Err(e).context("Unable to count records"),
                }

                if index % 50000 == 0 {
                    info!("Processed: {index}")
                }
            };

            println!("{count}");
            store.close();
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
