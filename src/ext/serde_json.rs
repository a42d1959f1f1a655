// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Nested JSON fetching via dotted paths (object keys and array indices) with typed extraction
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper for typed extraction with defaults
// invariants: No panics; missing paths yield None; to_or_default returns T::default on failure
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// A located JSON value (or nothing), awaiting typed extraction.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  pub fn exists(&self) -> bool {
    self.inner.is_some()
  }
}

/// Fetch nested values via dotted paths like `reports.0.data.rows`.
///
/// A numeric segment indexes into an array; any other segment is an object key.
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      let next = match (cur, key.parse::<usize>()) {
        (serde_json::Value::Array(items), Ok(i)) => items.get(i),
        _ => cur.get(key),
      };

      match next {
        Some(n) => cur = n,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fetch_keys_and_indices() {
    let v: serde_json::Value = serde_json::json!({
      "reports": [{ "nextPageToken": "10", "data": { "rowCount": 3 } }],
      "0": "key not index"
    });

    assert_eq!(v.fetch("reports.0.nextPageToken").to::<String>().as_deref(), Some("10"));
    assert_eq!(v.fetch("reports.0.data.rowCount").to::<i64>(), Some(3));
    assert_eq!(v.fetch("0").to::<String>().as_deref(), Some("key not index"));
    assert!(!v.fetch("reports.1").exists());
    assert!(v.fetch("").exists());
  }

  #[test]
  fn fetch_to_or_default() {
    let v: serde_json::Value = serde_json::json!({});
    let rows: Vec<String> = v.fetch("reports.0.data.rows").to_or_default();
    assert!(rows.is_empty());
  }
}
