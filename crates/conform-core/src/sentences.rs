//! Rule-based sentence splitting.
//!
//! The splitter is a fixed sequence of textual substitutions. Dots that must
//! not end a sentence (abbreviations, decimals, web domains, ellipses,
//! acronyms) are swapped for a placeholder, every remaining `.`, `?` and `!`
//! gets a stop marker, the placeholders are restored and the text is cut on
//! the markers. The order of the steps matters.
//!
//! This is deliberately separate from the tokenizer's own sentence
//! segmentation (see [`crate::tokenizer`]); the two can disagree.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

const PRD: &str = "<prd>";
const STOP: &str = "<stop>";

const ALPHABETS: &str = "([A-Za-z])";
const SUFFIXES: &str = "(Inc|Ltd|Jr|Sr|Co)";
const STARTERS: &str = r"(Dr|Mgr|Ing|Prof|Doc|Mr|Mrs|Ms|On\s|Ona\s|To\s|Oni\s|Ony\s|Jeho\s|Náš\s|Naša\s|My\s|Ale\s|Avšak\s|Ten\s|Tá\s|Tento\s|Táto\s|Kdekoľvek\s|Pokiaľ ide o\s|Preto\s|Napríklad\s|Stručne povedané\s|V dôsledku toho\s|Na druhej strane\s|Vzhľadom na\s)";
const ACRONYMS: &str = "([A-Z][.][A-Z][.](?:[A-Z][.])?)";

lazy_static! {
    static ref PREFIXES: Regex = Regex::new(
        "(Dr|Mgr|Ing|PhDr|RNDr|MUDr|JUDr|PaedDr|Doc|Prof|Bc|Mr|St|Mrs|Ms|atď|resp|napr|tzv|vid|pozn)[.]"
    ).unwrap();

    static ref WEBSITES: Regex = Regex::new("[.](com|net|org|io|gov|edu|me|sk|cz)").unwrap();

    static ref DECIMALS: Regex = Regex::new("([0-9])[.]([0-9])").unwrap();

    static ref MULTIPLE_DOTS: Regex = Regex::new(r"\.{2,}").unwrap();

    static ref INITIAL_BETWEEN_SPACES: Regex =
        Regex::new(&format!(r"\s{ALPHABETS}[.] ")).unwrap();

    static ref ACRONYM_THEN_STARTER: Regex =
        Regex::new(&format!("{ACRONYMS} {STARTERS}")).unwrap();

    static ref THREE_LETTER_CHAIN: Regex =
        Regex::new(&format!("{ALPHABETS}[.]{ALPHABETS}[.]{ALPHABETS}[.]")).unwrap();

    static ref TWO_LETTER_CHAIN: Regex =
        Regex::new(&format!("{ALPHABETS}[.]{ALPHABETS}[.]")).unwrap();

    static ref SUFFIX_THEN_STARTER: Regex =
        Regex::new(&format!(" {SUFFIXES}[.] {STARTERS}")).unwrap();

    static ref SUFFIX: Regex = Regex::new(&format!(" {SUFFIXES}[.]")).unwrap();

    static ref INITIAL: Regex = Regex::new(&format!(" {ALPHABETS}[.]")).unwrap();
}

fn substitute(text: String, pattern: &Regex, replacement: &str) -> String {
    pattern.replace_all(&text, replacement).into_owned()
}

/// Split text into trimmed sentences.
///
/// Only the very last segment is dropped when it is empty; empty segments
/// in the middle are kept. Empty input yields no sentences.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut text = format!(" {text}  ").replace('\n', " ");

    text = substitute(text, &PREFIXES, "${1}<prd>");
    text = substitute(text, &WEBSITES, "<prd>${1}");
    text = substitute(text, &DECIMALS, "${1}<prd>${2}");
    text = MULTIPLE_DOTS
        .replace_all(&text, |caps: &Captures<'_>| {
            format!("{}{}", PRD.repeat(caps[0].len()), STOP)
        })
        .into_owned();
    if text.contains("Ph.D") {
        text = text.replace("Ph.D.", "Ph<prd>D<prd>");
    }
    text = substitute(text, &INITIAL_BETWEEN_SPACES, " ${1}<prd> ");
    text = substitute(text, &ACRONYM_THEN_STARTER, "${1}<stop> ${2}");
    text = substitute(text, &THREE_LETTER_CHAIN, "${1}<prd>${2}<prd>${3}<prd>");
    text = substitute(text, &TWO_LETTER_CHAIN, "${1}<prd>${2}<prd>");
    text = substitute(text, &SUFFIX_THEN_STARTER, " ${1}<stop> ${2}");
    text = substitute(text, &SUFFIX, " ${1}<prd>");
    text = substitute(text, &INITIAL, " ${1}<prd>");

    // Closing quotes go before the terminal punctuation.
    if text.contains('\u{201c}') {
        text = text.replace(".\u{201d}", "\u{201d}.");
    }
    if text.contains('"') {
        text = text.replace(".\"", "\".");
    }
    if text.contains('!') {
        text = text.replace("!\"", "\"!");
    }
    if text.contains('?') {
        text = text.replace("?\"", "\"?");
    }

    text = text.replace('.', ".<stop>");
    text = text.replace('?', "?<stop>");
    text = text.replace('!', "!<stop>");
    text = text.replace(PRD, ".");

    let mut sentences: Vec<String> = text.split(STOP).map(|s| s.trim().to_string()).collect();
    if sentences.last().is_some_and(|s| s.is_empty()) {
        sentences.pop();
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_decimal_are_not_boundaries() {
        let sentences = split_into_sentences("Dr. Smith went home. He left at 5.5 p.m.");
        assert_eq!(sentences, vec!["Dr. Smith went home.", "He left at 5.5 p.m."]);
    }

    #[test]
    fn test_basic_punctuation() {
        let sentences = split_into_sentences("Hello world. How are you? I am fine!");
        assert_eq!(sentences, vec!["Hello world.", "How are you?", "I am fine!"]);
    }

    #[test]
    fn test_empty_input_has_no_sentences() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences("   ").is_empty());
    }

    #[test]
    fn test_unterminated_text_is_one_sentence() {
        assert_eq!(split_into_sentences("no punctuation here"), vec!["no punctuation here"]);
    }

    #[test]
    fn test_newlines_are_flattened() {
        let sentences = split_into_sentences("First line.\nSecond line.");
        assert_eq!(sentences, vec!["First line.", "Second line."]);
    }

    #[test]
    fn test_ellipsis_ends_sentence_once() {
        let sentences = split_into_sentences("Wait... What happened?");
        assert_eq!(sentences, vec!["Wait...", "What happened?"]);
    }

    #[test]
    fn test_web_domain_is_protected() {
        let sentences = split_into_sentences("Visit example.com today. Thanks.");
        assert_eq!(sentences, vec!["Visit example.com today.", "Thanks."]);
    }

    #[test]
    fn test_closing_quote_moves_before_period() {
        let sentences = split_into_sentences("He said \"hello.\" Then left.");
        assert_eq!(sentences, vec!["He said \"hello\".", "Then left."]);
    }

    #[test]
    fn test_phd_is_protected() {
        let sentences = split_into_sentences("She has a Ph.D. in math. He does not.");
        assert_eq!(sentences, vec!["She has a Ph.D. in math.", "He does not."]);
    }

    #[test]
    fn test_acronym_followed_by_starter_is_boundary() {
        let sentences = split_into_sentences("He moved to the U.S. On arrival he rested.");
        assert_eq!(sentences, vec!["He moved to the U.S.", "On arrival he rested."]);
    }

    #[test]
    fn test_acronym_inside_sentence_is_protected() {
        let sentences = split_into_sentences("The U.S. economy grew. Markets rose.");
        assert_eq!(sentences, vec!["The U.S. economy grew.", "Markets rose."]);
    }

    #[test]
    fn test_slovak_title_is_protected() {
        let sentences = split_into_sentences("Prof. Novák prišiel. Začal prednášku.");
        assert_eq!(sentences, vec!["Prof. Novák prišiel.", "Začal prednášku."]);
    }

    #[test]
    fn test_each_terminal_mark_splits() {
        assert_eq!(split_into_sentences("Really?!"), vec!["Really?", "!"]);
    }
}
