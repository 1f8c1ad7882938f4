//! Small utility helpers used across modules.

/// Maximum accepted pseudo length (characters, not bytes).
pub const MAX_PSEUDO_LEN: usize = 50;

/// Trim and validate a player pseudo.
/// Returns `None` when the trimmed pseudo is empty or longer than
/// [`MAX_PSEUDO_LEN`] characters.
pub fn clean_pseudo(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() || trimmed.chars().count() > MAX_PSEUDO_LEN {
    return None;
  }
  Some(trimmed.to_string())
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request payloads. Cuts on a char boundary.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}
