use crate::word::Word;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

/// Word list shipped by most Debian-based systems.
pub const SYSTEM_DICTIONARY: &str = "/etc/dictionaries-common/words";

fn words_of_length<'a>(
    tokens: impl Iterator<Item = &'a str> + 'a,
    length: usize,
) -> impl Iterator<Item = Word> + 'a {
    tokens.filter_map(move |token| Word::new(token, length).ok())
}

/// Whitespace-separated words of exactly `length` lowercase letters, in order.
///
/// Capitalised entries, possessives and anything with digits or accents are
/// dropped rather than normalised.
#[must_use]
pub fn load_wordbank_from_str(data: &str, length: usize) -> Vec<Word> {
    words_of_length(data.split_whitespace(), length).collect()
}

/// # Errors
/// Returns an I/O error if the file cannot be opened or read.
pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P, length: usize) -> io::Result<Vec<Word>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    let mut scanned = 0usize;
    for line in reader.lines() {
        let line = line?;
        scanned += 1;
        words.extend(words_of_length(line.split_whitespace(), length));
    }
    info!(
        "Loaded {} words of length {} from {} ({} lines scanned)",
        words.len(),
        length,
        path.display(),
        scanned
    );
    Ok(words)
}

/// Resolves the candidate pool: an explicit file must load, otherwise the
/// system dictionary is tried before falling back to the embedded list.
///
/// # Errors
/// Returns an I/O error only when `explicit` is given and cannot be read.
pub fn load_default_wordbank(explicit: Option<&Path>, length: usize) -> io::Result<Vec<Word>> {
    if let Some(path) = explicit {
        return load_wordbank_from_file(path, length);
    }
    match load_wordbank_from_file(SYSTEM_DICTIONARY, length) {
        Ok(words) if !words.is_empty() => Ok(words),
        Ok(_) => {
            debug!("{SYSTEM_DICTIONARY} has no words of length {length}, using embedded list");
            Ok(load_wordbank_from_str(EMBEDDED_WORDBANK, length))
        }
        Err(e) => {
            debug!("Could not read {SYSTEM_DICTIONARY} ({e}), using embedded list");
            Ok(load_wordbank_from_str(EMBEDDED_WORDBANK, length))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_str_filters_length_and_case() {
        let data = "crane\nSlate\ntrace's\ncranes\ncr4ne\n  grate  \nabc\nspite";
        let words = load_wordbank_from_str(data, 5);
        let texts: Vec<&str> = words.iter().map(Word::as_str).collect();
        assert_eq!(texts, vec!["crane", "grate", "spite"]);
    }

    #[test]
    fn test_load_from_str_splits_on_any_whitespace() {
        let words = load_wordbank_from_str("crane slate\ttrace\r\ncrate", 5);
        assert_eq!(words.len(), 4);
    }

    #[test]
    fn test_load_from_str_keeps_duplicates_in_order() {
        let words = load_wordbank_from_str("slate\ncrane\nslate", 5);
        let texts: Vec<&str> = words.iter().map(Word::as_str).collect();
        assert_eq!(texts, vec!["slate", "crane", "slate"]);
    }

    #[test]
    fn test_load_from_str_other_lengths() {
        let words = load_wordbank_from_str("planet\ncrane\nstream", 6);
        let texts: Vec<&str> = words.iter().map(Word::as_str).collect();
        assert_eq!(texts, vec!["planet", "stream"]);
    }

    #[test]
    fn test_embedded_wordbank_is_clean() {
        let words = load_wordbank_from_str(EMBEDDED_WORDBANK, 5);
        assert!(words.len() > 400);
        assert_eq!(words.len(), EMBEDDED_WORDBANK.lines().count());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("wordle_assistant_wordbank_unit.txt");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "apple").unwrap();
            writeln!(file, "Grape").unwrap();
            writeln!(file, "lemon melon").unwrap();
        }
        let words = load_wordbank_from_file(&path, 5).unwrap();
        let texts: Vec<&str> = words.iter().map(Word::as_str).collect();
        assert_eq!(texts, vec!["apple", "lemon", "melon"]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = load_wordbank_from_file("/nonexistent/wordle/words.txt", 5);
        assert!(result.is_err());
        let result = load_default_wordbank(Some(Path::new("/nonexistent/wordle/words.txt")), 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_wordbank_never_empty_for_five_letters() {
        let words = load_default_wordbank(None, 5).unwrap();
        assert!(!words.is_empty());
    }
}
