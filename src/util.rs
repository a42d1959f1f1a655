// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for calendar-month date bounds and man page rendering
// role: utilities/helpers
// outputs: YYYY-MM-DD bounds for a month; man page text
// invariants: month_bounds end date is the last calendar day of the month (leap years included)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::CommandFactory;

/// First and last day of a `YYYY-MM` month, formatted for the API.
pub fn month_bounds(ym: &str) -> Result<(String, String)> {
  let start = NaiveDate::parse_from_str(&format!("{}-01", ym.trim()), "%Y-%m-%d")
    .with_context(|| format!("invalid month '{}', expected YYYY-MM", ym))?;

  let (y, m) = if start.month() == 12 {
    (start.year() + 1, 1)
  } else {
    (start.year(), start.month() + 1)
  };

  let end = NaiveDate::from_ymd_opt(y, m, 1)
    .and_then(|next| next.pred_opt())
    .with_context(|| format!("month '{}' is out of range", ym))?;

  Ok((start.format("%Y-%m-%d").to_string(), end.format("%Y-%m-%d").to_string()))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
