//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Remove a surrounding markdown code fence (```lang ... ```), if any, and trim.
/// Text without a leading fence is only trimmed, so the function is idempotent.
pub fn strip_code_fences(s: &str) -> String {
  let s = s.trim();
  if let Some(rest) = s.strip_prefix("```") {
    // Drop the info string ("json", "python", ...) on the opening line.
    let body = match rest.split_once('\n') {
      Some((_, body)) => body,
      None => rest,
    };
    let body = body.trim();
    let body = body.strip_suffix("```").unwrap_or(body);
    return body.trim().to_string();
  }
  s.to_string()
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `s` (char-aware, never splits a code point).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
  match s.char_indices().nth(max_chars) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

/// Lowercase identifier fragment: every run of non-alphanumeric chars becomes one `_`.
/// "React and CSS" → "react_and_css", "CI/CD" → "ci_cd".
pub fn ident_slug(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut pending_sep = false;
  for ch in s.chars() {
    if ch.is_ascii_alphanumeric() {
      if pending_sep && !out.is_empty() {
        out.push('_');
      }
      pending_sep = false;
      out.push(ch.to_ascii_lowercase());
    } else {
      pending_sep = true;
    }
  }
  if out.is_empty() { "topic".to_string() } else { out }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  let head = truncate_chars(s, max);
  if head.len() == s.len() { s.to_string() } else { format!("{}… ({} bytes total)", head, s.len()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{a} and {a} vs {b}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and x vs y");
  }

  #[test]
  fn strip_code_fences_handles_language_tag() {
    assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
    assert_eq!(strip_code_fences("```\ndef f():\n    pass\n```  "), "def f():\n    pass");
  }

  #[test]
  fn strip_code_fences_is_idempotent_on_plain_text() {
    let once = strip_code_fences("  def f():\n    return 1\n");
    assert_eq!(once, "def f():\n    return 1");
    assert_eq!(strip_code_fences(&once), once);
  }

  #[test]
  fn normalize_ws_collapses_runs() {
    assert_eq!(normalize_ws("  Add   a\tcache \n"), "Add a cache");
  }

  #[test]
  fn truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("abc", 10), "abc");
  }

  #[test]
  fn ident_slug_produces_identifier_fragments() {
    assert_eq!(ident_slug("Kubernetes"), "kubernetes");
    assert_eq!(ident_slug("React and CSS"), "react_and_css");
    assert_eq!(ident_slug("CI/CD"), "ci_cd");
    assert_eq!(ident_slug("Next.js"), "next_js");
    assert_eq!(ident_slug("///"), "topic");
  }
}
