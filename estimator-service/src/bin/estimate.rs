use std::{env, fs, sync::Arc};

use anyhow::{bail, Context, Result};
use estimator_service::{cli, clock::SystemClock, config::AppConfig, observability};

fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: estimate <hourly|timestamped> <form.toml>");
    }
    let form_path = &args[2];

    // Load configuration (ESTIMATOR_CONFIG points at the model artifacts).
    let cfg = AppConfig::load()?;

    let contents =
        fs::read_to_string(form_path).with_context(|| format!("failed to read form {form_path}"))?;

    let text = cli::run(&cfg, &args[1], &contents, Arc::new(SystemClock))?;
    print!("{text}");

    Ok(())
}
