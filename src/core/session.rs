use crate::adapters::sqlite::SqliteListingStore;
use crate::core::resolver::LocationResolver;
use crate::domain::model::FieldValue;
use crate::domain::ports::ListingSource;
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const GREETING: &str = "Hallöchen!";
pub const DISTRICTS_INTRO: &str = "Wir haben Appartements in folgenden Stadtteilen:";
pub const PROMPT: &str = "Wo möchtest du denn übernachten?";
pub const NOT_UNDERSTOOD: &str = "Entschuldigung, das habe ich leider nicht verstanden...";
pub const NOTHING_FOUND: &str = "Tut mir Leid, ich konnte leider nichts finden!";
pub const FAREWELL: &str = "Tschüss!";

pub const QUERY_KEY: &str = "neighbourhood_group";
pub const QUERY_COLUMNS: [&str; 3] = ["name", "neighbourhood", "price"];

pub const DEFAULT_EXIT_WORDS: [&str; 4] = ["tschüss", "tschuess", "exit", "quit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Reported {
        district: String,
        found: usize,
        shown: usize,
    },
    NoMatch,
    NoResults {
        district: String,
    },
    Exit,
    EndOfInput,
}

/// One conversation with the user: greet, ask, resolve, look up, report.
pub struct Session<S: ListingSource> {
    resolver: LocationResolver,
    source: S,
    top_n: usize,
    exit_words: Vec<String>,
}

impl Session<SqliteListingStore> {
    /// Fails before any output when the store file does not exist.
    pub fn start(
        store_path: impl Into<PathBuf>,
        resolver: LocationResolver,
        top_n: usize,
    ) -> Result<Self> {
        let store = SqliteListingStore::open_existing(store_path)?;
        tracing::info!("Using listings store {}", store.path().display());
        Ok(Self::new(resolver, store, top_n))
    }
}

impl<S: ListingSource> Session<S> {
    pub fn new(resolver: LocationResolver, source: S, top_n: usize) -> Self {
        Self {
            resolver,
            source,
            top_n,
            exit_words: DEFAULT_EXIT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn with_exit_words(mut self, exit_words: &[String]) -> Self {
        self.exit_words = exit_words.iter().map(|w| w.trim().to_lowercase()).collect();
        self
    }

    pub fn greet<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}\n", GREETING)?;
        writeln!(out, "{}", DISTRICTS_INTRO)?;
        writeln!(out, "{}", self.resolver.table().districts().join(", "))?;
        Ok(())
    }

    /// 讀一行輸入並轉成小寫；輸入結束時回傳 None
    fn prompt<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<Option<String>> {
        writeln!(out, "\n{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_lowercase()))
    }

    /// Resolves, queries and reports for an already lowercased sentence.
    pub fn answer<W: Write>(&self, sentence: &str, out: &mut W) -> Result<TurnOutcome> {
        let Some(district) = self.resolver.resolve(sentence) else {
            tracing::info!("No district recognised in user input");
            writeln!(out, "\n{}", NOT_UNDERSTOOD)?;
            return Ok(TurnOutcome::NoMatch);
        };

        let results = self.source.query(QUERY_KEY, district, &QUERY_COLUMNS)?;
        tracing::info!("Found {} listings in {}", results.len(), district);

        if results.is_empty() {
            writeln!(out, "{}", NOTHING_FOUND)?;
            return Ok(TurnOutcome::NoResults {
                district: district.to_string(),
            });
        }

        writeln!(
            out,
            "Ich habe {} passende Wohnungen in {} gefunden.\n",
            results.len(),
            district
        )?;
        writeln!(out, "Hier sind die {} besten Ergebnisse:\n", self.top_n)?;

        let mut shown = 0;
        for row in results.iter().take(self.top_n) {
            writeln!(
                out,
                "\"{}\", {}. Das Apartment kostet {}€.",
                cell(row, 0),
                cell(row, 1),
                cell(row, 2)
            )?;
            shown += 1;
        }

        Ok(TurnOutcome::Reported {
            district: district.to_string(),
            found: results.len(),
            shown,
        })
    }

    /// Single pass: one utterance per session.
    pub fn run_once<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<TurnOutcome> {
        self.greet(out)?;
        match self.prompt(input, out)? {
            Some(sentence) => self.answer(&sentence, out),
            None => Ok(TurnOutcome::EndOfInput),
        }
    }

    /// Repeats prompt and answer until an exit word or end of input.
    pub fn run_loop<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Vec<TurnOutcome>> {
        self.greet(out)?;

        let mut outcomes = Vec::new();
        loop {
            let Some(sentence) = self.prompt(input, out)? else {
                outcomes.push(TurnOutcome::EndOfInput);
                break;
            };

            if self.exit_words.iter().any(|w| w == sentence.trim()) {
                writeln!(out, "{}", FAREWELL)?;
                outcomes.push(TurnOutcome::Exit);
                break;
            }

            outcomes.push(self.answer(&sentence, out)?);
        }

        tracing::debug!("Conversation ended after {} turns", outcomes.len());
        Ok(outcomes)
    }
}

fn cell(row: &[FieldValue], index: usize) -> String {
    row.get(index).map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patterns::PatternTable;
    use crate::domain::model::Row;
    use crate::utils::error::BotError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Cursor;

    struct MockSource {
        rows: HashMap<String, Vec<Row>>,
        calls: RefCell<Vec<(String, String, Vec<String>)>>,
    }

    impl MockSource {
        fn new() -> Self {
            Self {
                rows: HashMap::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn with_listings(mut self, district: &str, count: usize) -> Self {
            let rows = (1..=count)
                .map(|i| {
                    vec![
                        FieldValue::Text(format!("Wohnung {}", i)),
                        FieldValue::from("Alexanderplatz"),
                        FieldValue::Integer(40 + i as i64),
                    ]
                })
                .collect();
            self.rows.insert(district.to_string(), rows);
            self
        }
    }

    impl ListingSource for MockSource {
        fn query(&self, key: &str, value: &str, columns: &[&str]) -> Result<Vec<Row>> {
            self.calls.borrow_mut().push((
                key.to_string(),
                value.to_string(),
                columns.iter().map(|c| c.to_string()).collect(),
            ));
            Ok(self.rows.get(value).cloned().unwrap_or_default())
        }
    }

    struct FailingSource;

    impl ListingSource for FailingSource {
        fn query(&self, _key: &str, _value: &str, _columns: &[&str]) -> Result<Vec<Row>> {
            Err(BotError::MissingTable {
                table: "listings".to_string(),
            })
        }
    }

    fn session<S: ListingSource>(source: S, top_n: usize) -> Session<S> {
        let resolver = LocationResolver::new(PatternTable::berlin().unwrap());
        Session::new(resolver, source, top_n)
    }

    fn run(session: &Session<MockSource>, input: &str) -> (TurnOutcome, String) {
        let mut out = Vec::new();
        let outcome = session
            .run_once(&mut Cursor::new(input.as_bytes()), &mut out)
            .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_greeting_lists_districts() {
        let session = session(MockSource::new(), 10);
        let (_, transcript) = run(&session, "xyzzy\n");
        assert!(transcript.starts_with(
            "Hallöchen!\n\nWir haben Appartements in folgenden Stadtteilen:\n\
             Charlottenburg-Wilm., Friedrichshain-Kreuzberg, Lichtenberg, Marzahn - Hellersdorf, \
             Mitte, Neukölln, Pankow, Reinickendorf, Spandau, Steglitz - Zehlendorf, \
             Tempelhof - Schöneberg, Treptow - Köpenick\n\nWo möchtest du denn übernachten?\n"
        ));
    }

    #[test]
    fn test_report_formats_rows() {
        let session = session(MockSource::new().with_listings("Mitte", 3), 10);
        let (outcome, transcript) = run(&session, "Ich mag MITTE\n");

        assert_eq!(
            outcome,
            TurnOutcome::Reported {
                district: "Mitte".to_string(),
                found: 3,
                shown: 3
            }
        );
        assert!(transcript.contains(
            "Ich habe 3 passende Wohnungen in Mitte gefunden.\n\nHier sind die 10 besten Ergebnisse:\n\n"
        ));
        assert!(transcript.contains("\"Wohnung 1\", Alexanderplatz. Das Apartment kostet 41€.\n"));
        assert!(transcript.ends_with("\"Wohnung 3\", Alexanderplatz. Das Apartment kostet 43€.\n"));
    }

    #[test]
    fn test_query_uses_district_and_fixed_columns() {
        let session = session(MockSource::new(), 10);
        run(&session, "kreuzberg\n");

        let calls = session.source.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "neighbourhood_group");
        assert_eq!(calls[0].1, "Friedrichshain-Kreuzberg");
        assert_eq!(calls[0].2, vec!["name", "neighbourhood", "price"]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let session = session(MockSource::new().with_listings("Mitte", 5), 2);
        let (outcome, transcript) = run(&session, "mitte\n");

        assert_eq!(
            outcome,
            TurnOutcome::Reported {
                district: "Mitte".to_string(),
                found: 5,
                shown: 2
            }
        );
        assert_eq!(transcript.matches("Das Apartment kostet").count(), 2);
        assert!(transcript.contains("Wohnung 2"));
        assert!(!transcript.contains("Wohnung 3"));
    }

    #[test]
    fn test_no_match_skips_query() {
        let session = session(MockSource::new(), 10);
        let (outcome, transcript) = run(&session, "xyzzy\n");

        assert_eq!(outcome, TurnOutcome::NoMatch);
        assert!(transcript.ends_with("\nEntschuldigung, das habe ich leider nicht verstanden...\n"));
        assert!(session.source.calls.borrow().is_empty());
    }

    #[test]
    fn test_no_results_apologises() {
        let session = session(MockSource::new(), 10);
        let (outcome, transcript) = run(&session, "spandau bitte\n");

        assert_eq!(
            outcome,
            TurnOutcome::NoResults {
                district: "Spandau".to_string()
            }
        );
        assert!(transcript.ends_with("Tut mir Leid, ich konnte leider nichts finden!\n"));
    }

    #[test]
    fn test_end_of_input() {
        let session = session(MockSource::new(), 10);
        let (outcome, _) = run(&session, "");
        assert_eq!(outcome, TurnOutcome::EndOfInput);
    }

    #[test]
    fn test_store_failure_propagates() {
        let session = session(FailingSource, 10);
        let mut out = Vec::new();
        let err = session
            .run_once(&mut Cursor::new(b"mitte\n".to_vec()), &mut out)
            .unwrap_err();
        assert!(matches!(err, BotError::MissingTable { .. }));
    }

    #[test]
    fn test_loop_until_exit_word() {
        let session = session(MockSource::new().with_listings("Mitte", 1), 10);
        let mut out = Vec::new();
        let outcomes = session
            .run_loop(&mut Cursor::new("mitte\natlantis\nTSCHÜSS\npankow\n".as_bytes().to_vec()), &mut out)
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], TurnOutcome::Reported { found: 1, .. }));
        assert_eq!(outcomes[1], TurnOutcome::NoMatch);
        assert_eq!(outcomes[2], TurnOutcome::Exit);

        let transcript = String::from_utf8(out).unwrap();
        assert_eq!(transcript.matches("Hallöchen!").count(), 1);
        assert_eq!(transcript.matches("Wo möchtest du denn übernachten?").count(), 3);
        assert!(transcript.ends_with("Tschüss!\n"));
    }

    #[test]
    fn test_loop_stops_at_end_of_input() {
        let session = session(MockSource::new(), 10)
            .with_exit_words(&["ende".to_string()]);
        let mut out = Vec::new();
        let outcomes = session
            .run_loop(&mut Cursor::new(b"exit\n".to_vec()), &mut out)
            .unwrap();

        assert_eq!(outcomes, vec![TurnOutcome::NoMatch, TurnOutcome::EndOfInput]);
    }
}
