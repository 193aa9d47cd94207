//! Abbreviated input: accept any prefix that identifies one candidate.
//!
//! # Invariants
//! - Matching is case-insensitive.
//! - An input equal to a candidate selects it even when it also prefixes
//!   other candidates.
//! - The prompt only returns on a unique match, a stop word, or end of
//!   input; every other answer prints a diagnostic and asks again.

use super::prompt::Prompter;
use log::debug;
use std::io::{self, BufRead, Write};

/// Outcome of matching one input against a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbbreviationMatch<'a> {
    Unique(&'a str),
    NoMatch,
    /// Every candidate the input prefixes, in candidate order.
    Ambiguous(Vec<&'a str>),
}

/// Matches `input` as a case-insensitive prefix of `candidates`.
pub fn match_abbreviation<'a>(input: &str, candidates: &[&'a str]) -> AbbreviationMatch<'a> {
    let needle = input.to_lowercase();

    if let Some(exact) = candidates
        .iter()
        .copied()
        .find(|candidate| candidate.to_lowercase() == needle)
    {
        return AbbreviationMatch::Unique(exact);
    }

    let matches: Vec<&'a str> = candidates
        .iter()
        .copied()
        .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [] => AbbreviationMatch::NoMatch,
        [only] => AbbreviationMatch::Unique(*only),
        _ => AbbreviationMatch::Ambiguous(matches),
    }
}

/// Prompts until the answer identifies exactly one candidate.
///
/// Returns `Ok(None)` at end of input or when the trimmed answer equals one
/// of `stop_words` exactly.
pub fn prompt_abbreviated<'a, R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    prompt: &str,
    candidates: &[&'a str],
    stop_words: &[&str],
) -> io::Result<Option<&'a str>> {
    loop {
        let Some(line) = prompter.ask(prompt)? else {
            return Ok(None);
        };
        let answer = line.trim();
        if stop_words.iter().any(|word| *word == answer) {
            return Ok(None);
        }

        match match_abbreviation(answer, candidates) {
            AbbreviationMatch::Unique(candidate) => return Ok(Some(candidate)),
            AbbreviationMatch::NoMatch => {
                debug!("event=abbrev_retry module=logbook reason=no_match");
                prompter.say(&format!(
                    "no match for `{answer}`; expected one of: {}",
                    candidates.join(", ")
                ))?;
            }
            AbbreviationMatch::Ambiguous(matches) => {
                debug!(
                    "event=abbrev_retry module=logbook reason=ambiguous matches={}",
                    matches.len()
                );
                prompter.say(&format!("`{answer}` is ambiguous: {}", matches.join(", ")))?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{match_abbreviation, prompt_abbreviated, AbbreviationMatch};
    use crate::logbook::prompt::Prompter;

    const LIFTS: [&str; 4] = ["squat", "bench press", "Bench Dip", "deadlift"];

    #[test]
    fn unique_prefix_matches_case_insensitively() {
        assert_eq!(
            match_abbreviation("SQ", &LIFTS),
            AbbreviationMatch::Unique("squat")
        );
        assert_eq!(
            match_abbreviation("bench p", &LIFTS),
            AbbreviationMatch::Unique("bench press")
        );
    }

    #[test]
    fn shared_prefix_is_ambiguous_and_unknown_is_no_match() {
        assert_eq!(
            match_abbreviation("be", &LIFTS),
            AbbreviationMatch::Ambiguous(vec!["bench press", "Bench Dip"])
        );
        assert_eq!(
            match_abbreviation("row", &LIFTS),
            AbbreviationMatch::NoMatch
        );
        assert_eq!(match_abbreviation("x", &[]), AbbreviationMatch::NoMatch);
    }

    #[test]
    fn exact_candidate_wins_over_longer_candidates() {
        let candidates = ["press", "press behind neck"];
        assert_eq!(
            match_abbreviation("Press", &candidates),
            AbbreviationMatch::Unique("press")
        );
    }

    #[test]
    fn prompt_reasks_until_unique_match() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new("be\nrow\nd\n".as_bytes(), &mut output);

        let chosen = prompt_abbreviated(&mut prompter, "lift? ", &LIFTS, &[])
            .expect("scripted input should be readable");
        assert_eq!(chosen, Some("deadlift"));
        drop(prompter);

        let transcript = String::from_utf8(output).expect("utf-8 transcript");
        assert_eq!(transcript.matches("lift? ").count(), 3);
        assert!(transcript.contains("`be` is ambiguous: bench press, Bench Dip"));
        assert!(transcript.contains("no match for `row`"));
    }

    #[test]
    fn prompt_returns_none_on_stop_word_or_eof() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new("quit\n".as_bytes(), &mut output);
        let stopped = prompt_abbreviated(&mut prompter, "? ", &LIFTS, &["quit"])
            .expect("stop word should end the prompt");
        assert_eq!(stopped, None);
        let at_eof = prompt_abbreviated(&mut prompter, "? ", &LIFTS, &["quit"])
            .expect("end of input should end the prompt");
        assert_eq!(at_eof, None);
    }

    #[test]
    fn stop_words_are_matched_exactly() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new("QUIT\nsq\n".as_bytes(), &mut output);
        let chosen = prompt_abbreviated(&mut prompter, "? ", &["squat"], &["quit"])
            .expect("scripted input should be readable");
        assert_eq!(chosen, Some("squat"));
        drop(prompter);

        let transcript = String::from_utf8(output).expect("utf-8 transcript");
        assert_eq!(transcript.matches("? ").count(), 2);
    }
}
