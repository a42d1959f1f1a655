use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod params;
mod util;

use ga_report_builder::client::{access_token, HttpReportingClient, ReportingClient};

use crate::cli::{normalize, Cli};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: assemble and materialize
  let request = params::build_request(&cfg)?.request_object()?;

  if !cfg.execute {
    println!("{}", serde_json::to_string_pretty(&request)?);
    return Ok(());
  }

  // Phase 3: transport
  let token = access_token().context("Missing token. Set GA_ACCESS_TOKEN")?;
  let client = match &cfg.endpoint {
    Some(url) => HttpReportingClient::with_endpoint(url.clone(), token),
    None => HttpReportingClient::new(token),
  };

  let response = client.execute(&request)?;
  println!("{}", serde_json::to_string_pretty(&response)?);

  Ok(())
}
