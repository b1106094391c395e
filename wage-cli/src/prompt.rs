//! Interactive prompts for raise overrides.
//!
//! The prompter only collects text. Validation happens in `wage_core`, so a
//! bad answer produces the same error whether it was typed or passed as a
//! flag.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use wage_core::{Level, Track, Year};

/// Reads answers from `input`, writing questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Raw raise parameters, each either given up front or asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaiseAnswers {
    pub track: String,
    pub level: String,
    pub rates: Vec<(Year, String)>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(
        input: R,
        output: W,
    ) -> Self {
        Self { input, output }
    }

    /// Writes `question` and returns the trimmed answer.
    pub fn ask(
        &mut self,
        question: &str,
    ) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            bail!(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed while waiting for: {}", question.trim_end())
            ));
        }
        Ok(answer.trim().to_string())
    }

    /// Fills in whatever raise parameters were not supplied.
    ///
    /// Asks for the level first, then the track, then one rate per year. A
    /// level or track answer is checked as soon as it is given.
    pub fn raise_answers(
        &mut self,
        track: Option<String>,
        level: Option<String>,
        years: &[Year],
        rates: Vec<String>,
    ) -> Result<RaiseAnswers> {
        let level = match level {
            Some(level) => level,
            None => {
                let answer = self.ask("Level (premaster, intermediate, candidate): ")?;
                answer.parse::<Level>()?;
                answer
            }
        };
        let track = match track {
            Some(track) => track,
            None => {
                let answer = self.ask("Which Rate? (astro, base): ")?;
                answer.parse::<Track>()?;
                answer
            }
        };

        let rates = if rates.is_empty() {
            years
                .iter()
                .map(|&year| Ok((year, self.ask(&format!("{year} Rate (e.g. 3 for 3%): "))?)))
                .collect::<Result<Vec<_>>>()?
        } else if rates.len() == years.len() {
            years.iter().copied().zip(rates).collect()
        } else {
            bail!(
                "number of years ({}) and rates ({}) to update must be the same",
                years.len(),
                rates.len()
            );
        };

        Ok(RaiseAnswers {
            track,
            level,
            rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_writes_question_and_trims_answer() {
        let mut prompter = prompter("  astro \n");

        let answer = prompter.ask("Which Rate? (astro, base): ").unwrap();

        assert_eq!(answer, "astro");
        assert_eq!(prompter.output, b"Which Rate? (astro, base): ");
    }

    #[test]
    fn test_ask_fails_on_closed_input() {
        let mut prompter = prompter("");

        let err = prompter.ask("Level: ").unwrap_err();

        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_raise_answers_prompts_for_everything_missing() {
        let mut prompter = prompter("Candidate\nastro\n3\n2.5\n");

        let answers = prompter
            .raise_answers(None, None, &[2026, 2027], Vec::new())
            .unwrap();

        assert_eq!(
            answers,
            RaiseAnswers {
                track: "astro".to_string(),
                level: "Candidate".to_string(),
                rates: vec![(2026, "3".to_string()), (2027, "2.5".to_string())],
            }
        );
        let transcript = String::from_utf8(prompter.output).unwrap();
        assert_eq!(
            transcript,
            "Level (premaster, intermediate, candidate): \
             Which Rate? (astro, base): \
             2026 Rate (e.g. 3 for 3%): \
             2027 Rate (e.g. 3 for 3%): "
        );
    }

    #[test]
    fn test_raise_answers_uses_supplied_values_without_prompting() {
        let mut prompter = prompter("");

        let answers = prompter
            .raise_answers(
                Some("base".to_string()),
                Some("premaster".to_string()),
                &[2025],
                vec!["4".to_string()],
            )
            .unwrap();

        assert_eq!(answers.rates, vec![(2025, "4".to_string())]);
        assert!(prompter.output.is_empty());
    }

    #[test]
    fn test_raise_answers_rejects_bad_level_before_asking_track() {
        let mut prompter = prompter("professor\nastro\n");

        let err = prompter
            .raise_answers(None, None, &[2025], Vec::new())
            .unwrap_err();

        assert!(err.to_string().contains("entered level not valid"));
        let transcript = String::from_utf8(prompter.output).unwrap();
        assert!(!transcript.contains("Which Rate?"));
    }

    #[test]
    fn test_raise_answers_rejects_rate_count_mismatch() {
        let mut prompter = prompter("");

        let result = prompter.raise_answers(
            Some("astro".to_string()),
            Some("premaster".to_string()),
            &[2025, 2026],
            vec!["3".to_string()],
        );

        assert!(result.is_err());
    }
}
