use deunicode::deunicode_char;

/// Unicode dash variants folded to a plain hyphen
const DASHES: &[char] = &[
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}',
    '\u{2212}', '\u{FE58}', '\u{FE63}', '\u{FF0D}',
];

fn unify_dash(ch: char) -> char {
    if DASHES.contains(&ch) {
        '-'
    } else {
        ch
    }
}

/// Combining diacritical marks left over from decomposed (NFD) text
fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036F}' | '\u{1AB0}'..='\u{1AFF}' | '\u{1DC0}'..='\u{1DFF}' | '\u{FE20}'..='\u{FE2F}')
}

/// Transliteration for accented Latin letters; other scripts are left alone
fn fold_latin(ch: char) -> Option<&'static str> {
    if ('\u{00C0}'..='\u{024F}').contains(&ch) {
        deunicode_char(ch)
    } else {
        None
    }
}

/// Normalize text for affiliation matching: lowercase, fold accents and dashes,
/// collapse every run of non-alphanumeric characters into one space, trim.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut gap = false;
    let mut buf = [0u8; 4];

    for ch in text.chars().filter(|c| !is_combining_mark(*c)).map(unify_dash) {
        let piece: &str = match fold_latin(ch) {
            Some(folded) => folded,
            None => ch.encode_utf8(&mut buf),
        };
        for c in piece.chars().flat_map(char::to_lowercase) {
            if c.is_alphanumeric() {
                if gap && !out.is_empty() {
                    out.push(' ');
                }
                gap = false;
                out.push(c);
            } else {
                gap = true;
            }
        }
    }

    out
}
