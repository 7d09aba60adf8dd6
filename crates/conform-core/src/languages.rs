//! ISO 639-1 codes and their display names in the instructions' language.

/// Supported response languages, in table order.
pub const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("en", "Angličtina"),
    ("es", "Španielčina"),
    ("pt", "Portugalčina"),
    ("ar", "Arabčina"),
    ("hi", "Hindčina"),
    ("fr", "Francúzština"),
    ("ru", "Ruština"),
    ("de", "Nemčina"),
    ("ja", "Japončina"),
    ("it", "Taliančina"),
    ("bn", "Bengálčina"),
    ("uk", "Ukrajiničina"),
    ("th", "Thajčina"),
    ("ur", "Urdčina"),
    ("ta", "Tamilčina"),
    ("te", "Telugčina"),
    ("bg", "Bulharčina"),
    ("ko", "Kórejčina"),
    ("pl", "Poľčina"),
    ("he", "Hebrejčina"),
    ("fa", "Perziančina"),
    ("vi", "Vietnamčina"),
    ("ne", "Nepálčina"),
    ("sw", "Svahilčina"),
    ("kn", "Kannada"),
    ("mr", "Maráthčina"),
    ("gu", "Gudžarátčina"),
    ("pa", "Pandžábčina"),
    ("ml", "Malajálčina"),
    ("fi", "Fínčina"),
    ("sk", "Slovenčina"),
];

/// Display name for a code, if the code is supported.
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// All supported codes, in table order.
pub fn language_codes() -> impl Iterator<Item = &'static str> {
    LANGUAGE_CODES.iter().map(|(code, _)| *code)
}
