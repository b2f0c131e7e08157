//! Text helpers shared by the quiz services
//!
//! Answer-letter mapping (`A` ↔ index 0) and the stem-key derivation used to
//! deduplicate questions across generation passes.

/// Punctuation that may terminate a question stem.
const TERMINAL_PUNCTUATION: [char; 6] = ['?', '!', '.', ',', ':', ';'];

/// Map an answer-letter token to a 0-based index (`A` → 0, `b` → 1).
///
/// Non-alphabetic characters are ignored, so `"A)"` resolves like `"A"`.
/// Tokens with more or fewer than one letter do not resolve.
pub fn letter_to_index(token: &str) -> Option<usize> {
    let mut letters = token.chars().filter(|c| c.is_ascii_alphabetic());
    let first = letters.next()?;
    if letters.next().is_some() {
        return None;
    }
    Some((first.to_ascii_uppercase() as u8 - b'A') as usize)
}

/// Map a 0-based index to its answer letter (`0` → `A`). Indices beyond `Z`
/// do not resolve.
pub fn index_to_letter(index: usize) -> Option<char> {
    if index < 26 {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Derive the identity key of a question stem.
///
/// Two renderings of the same stem must collide: the key is lower-cased,
/// internal whitespace is collapsed to single spaces, and whitespace directly
/// before terminal punctuation is removed, so `"Alpha stem ?"` and
/// `"alpha  stem?"` produce the same key.
pub fn stem_key(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        for ch in word.chars() {
            collapsed.extend(ch.to_lowercase());
        }
    }

    let mut key = String::with_capacity(collapsed.len());
    for ch in collapsed.chars() {
        if TERMINAL_PUNCTUATION.contains(&ch) {
            while key.ends_with(' ') {
                key.pop();
            }
        }
        key.push(ch);
    }
    key
}
