//! Question bank loading: semicolon-delimited lines into `Question` records.
//!
//! File format (UTF-8, one question per line):
//!   `prompt;correct;wrong1;wrong2;wrong3`
//! Lines that do not split into exactly 5 fields are skipped with a warning,
//! never surfaced as errors. Re-parsing an unchanged source yields identical
//! records (ids are assigned in input order).

use tracing::{info, instrument, warn};

use crate::domain::Question;

/// prompt + 4 answer choices.
const FIELDS_PER_LINE: usize = 5;

/// Parse question lines, assigning ids from `first_id` in input order.
/// The first answer field is the correct choice; it keeps no positional
/// meaning after loading (choices are shuffled per presentation).
pub fn parse_questions(text: &str, first_id: u32) -> Vec<Question> {
  let mut out = Vec::new();
  let mut next_id = first_id;
  for (lineno, raw) in text.lines().enumerate() {
    let line = raw.trim();
    if line.is_empty() {
      continue;
    }
    let parts: Vec<&str> = line.split(';').collect();
    if parts.len() != FIELDS_PER_LINE {
      warn!(target: "quiz", line = lineno + 1, fields = parts.len(), "Skipping malformed question line");
      continue;
    }
    out.push(Question {
      id: next_id,
      text: parts[0].to_string(),
      choices: parts[1..].iter().map(|s| s.to_string()).collect(),
      correct: parts[1].to_string(),
    });
    next_id += 1;
  }
  out
}

/// Read and parse a question file.
#[instrument(level = "info")]
pub fn load_questions(path: &str) -> std::io::Result<Vec<Question>> {
  let text = std::fs::read_to_string(path)?;
  let questions = parse_questions(&text, 0);
  info!(target: "quiz", %path, count = questions.len(), "Question file loaded");
  Ok(questions)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_valid_line() {
    let qs = parse_questions("2+2?;4;3;5;22\n", 0);
    assert_eq!(qs.len(), 1);
    let q = &qs[0];
    assert_eq!(q.id, 0);
    assert_eq!(q.text, "2+2?");
    assert_eq!(q.choices, vec!["4", "3", "5", "22"]);
    assert_eq!(q.correct, "4");
    assert!(q.choices.contains(&q.correct));
  }

  #[test]
  fn skips_malformed_lines_silently() {
    let text = "only;four;fields;here\n\
                good;a;b;c;d\n\
                one;too;many;fields;in;line\n\
                \n\
                another good one;w;x;y;z\n";
    let qs = parse_questions(text, 0);
    assert_eq!(qs.len(), 2);
    assert_eq!(qs[0].text, "good");
    assert_eq!(qs[1].text, "another good one");
    // Ids stay dense over valid lines only.
    assert_eq!(qs[0].id, 0);
    assert_eq!(qs[1].id, 1);
  }

  #[test]
  fn reparsing_is_idempotent() {
    let text = "q1;a;b;c;d\nq2;e;f;g;h\n";
    let first = parse_questions(text, 0);
    let second = parse_questions(text, 0);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
      assert_eq!(a.id, b.id);
      assert_eq!(a.text, b.text);
      assert_eq!(a.choices, b.choices);
      assert_eq!(a.correct, b.correct);
    }
  }

  #[test]
  fn id_numbering_continues_from_first_id() {
    let qs = parse_questions("q;a;b;c;d\n", 7);
    assert_eq!(qs[0].id, 7);
  }

  #[test]
  fn loading_a_missing_file_errors() {
    assert!(load_questions("/definitely/not/here.txt").is_err());
  }
}
