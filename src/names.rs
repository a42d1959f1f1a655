// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Map human-readable field names and view identifiers to the reporting API's canonical identifiers
// role: names/canonicalization
// outputs: NameResolver trait and the default `ga:`-namespacing resolver
// invariants: Pure and total; canonical input is returned unchanged (idempotent)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;

pub const FIELD_PREFIX: &str = "ga:";

/// Canonicalizes names before they enter a request.
pub trait NameResolver {
  /// Human field name → canonical dimension/metric identifier.
  fn resolve(&self, name: &str) -> String;

  /// Normalize an account/view identifier.
  fn resolve_view(&self, id: &str) -> String;
}

/// Default resolver: `"page path"`, `"page_path"` and `"pagePath"` all become `"ga:pagePath"`.
///
/// Names already carrying the `ga:` prefix are only trimmed, so `"ga:CTR"` and
/// `"ga:calcMetric_my_metric"` pass through as written.
///
/// View ids are returned bare (`"ga:123"` → `"123"`), which is what the v4 API expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixNameResolver;

static RE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_\-]+").unwrap());

fn lower_camel(name: &str) -> String {
  let mut out = String::with_capacity(name.len());

  for (i, word) in RE_SEPARATORS.split(name).filter(|w| !w.is_empty()).enumerate() {
    if i == 0 {
      let mut chars = word.chars();
      if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
        out.push_str(chars.as_str());
      }
    } else {
      let mut chars = word.chars();
      if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
      }
    }
  }

  out
}

impl NameResolver for PrefixNameResolver {
  fn resolve(&self, name: &str) -> String {
    let name = name.trim();
    if name.starts_with(FIELD_PREFIX) {
      return name.to_string();
    }

    format!("{}{}", FIELD_PREFIX, lower_camel(name))
  }

  fn resolve_view(&self, id: &str) -> String {
    let id = id.trim();
    id.strip_prefix(FIELD_PREFIX).unwrap_or(id).to_string()
  }
}
