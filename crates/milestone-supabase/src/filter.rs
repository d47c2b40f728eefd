//! Encoding of PostgREST horizontal filters.
//!
//! Values are always double-quoted inside `in.(...)` lists so identifiers
//! containing reserved characters (`,` `.` `:` `(` `)`) survive intact.

/// `eq.<value>`
pub fn eq(value: &str) -> String { format!("eq.{value}") }

/// `in.("a","b")`
pub fn in_list(values: &[String]) -> String {
  let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
  format!("in.({})", quoted.join(","))
}

fn quote(value: &str) -> String {
  let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
  format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn eq_filter() {
    assert_eq!(eq("abc123"), "eq.abc123");
    assert_eq!(eq("true"), "eq.true");
  }

  #[test]
  fn in_filter_quotes_every_value() {
    let ids = vec!["p1".to_owned(), "a,b".to_owned(), "q\"x".to_owned()];
    assert_eq!(in_list(&ids), r#"in.("p1","a,b","q\"x")"#);
  }
}
