use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mdconform::{
    compare, load_sections, CompareOptions, Config, HarnessError, PulldownRenderer, Stats,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Flavor {
    Commonmark,
    Gfm,
}

impl Flavor {
    fn config(self) -> Config {
        match self {
            Flavor::Commonmark => Config::COMMONMARK,
            Flavor::Gfm => Config::GFM,
        }
    }
}

/// Run a Markdown conformance corpus against the bundled renderer.
#[derive(Debug, Parser)]
#[command(name = "mdconform", version)]
struct Args {
    /// Which corpus to run.
    #[arg(long, value_enum, default_value = "commonmark")]
    flavor: Flavor,

    /// Directory holding `<prefix>_tests.json` corpus files.
    #[arg(long, env = "MDCONFORM_CORPUS_DIR", default_value = "corpus")]
    corpus_dir: PathBuf,

    /// Only run this section.
    #[arg(long)]
    section: Option<String>,

    /// Only run this example number.
    #[arg(long)]
    example: Option<u32>,

    /// Print diagnostics for failing and erroring examples.
    #[arg(long)]
    verbose: bool,

    /// Print diagnostics for loose matches.
    #[arg(long)]
    verbose_loose: bool,

    /// Abort on the first render fault.
    #[arg(long)]
    fail_fast: bool,

    /// Print counts instead of percentages.
    #[arg(long)]
    raw: bool,

    /// Extensions enabled for every example (comma separated).
    #[arg(long, value_delimiter = ',')]
    extensions: Vec<String>,

    /// Write per-example outcomes as JSON to this path.
    #[arg(long)]
    update_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("mdconform: {err}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every selected example passed.
fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config = args.flavor.config();
    let sections = load_sections(&args.corpus_dir, &config)?;
    let options = CompareOptions {
        throw_on_render_error: args.fail_fast,
        verbose_on_fail: args.verbose,
        verbose_on_loose_match: args.verbose_loose,
        default_extensions: args.extensions.into_iter().collect::<BTreeSet<_>>(),
    };

    let mut stats = Stats::new();
    for (name, cases) in &sections {
        if args.section.as_ref().is_some_and(|s| s != name) {
            continue;
        }
        for case in cases {
            if args.example.is_some_and(|n| n != case.example) {
                continue;
            }
            let result = compare(&PulldownRenderer, &config, case, &options)
                .map_err(|err: HarnessError| format!("example {}: {err}", case.example))?;
            stats.record_result(&result);
        }
    }

    print!("{}", stats.summary(args.raw));

    if let Some(path) = &args.update_file {
        fs::write(path, stats.to_json()?)?;
        tracing::info!(path = %path.display(), "wrote stats file");
    }

    let total = stats.total();
    Ok(total.fail == 0 && total.error == 0)
}
