//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Decoding of `&name;`, `&#NNN;` and `&#xHHH;` references. Only the named
//! references that show up in real documents are in the table; anything else
//! is left as literal text.

/// Named references recognised by the tokenizer, without the leading `&`.
const NAMED_REFERENCES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("copy", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("trade", "\u{2122}"),
    ("hellip", "\u{2026}"),
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("laquo", "\u{00AB}"),
    ("raquo", "\u{00BB}"),
    ("middot", "\u{00B7}"),
    ("bull", "\u{2022}"),
    ("times", "\u{00D7}"),
    ("divide", "\u{00F7}"),
    ("euro", "\u{20AC}"),
];

/// A decoded reference and how many input characters it spans after the `&`.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Decoded {
    pub(super) text: String,
    pub(super) consumed: usize,
}

/// Try to decode a character reference starting right after an `&`.
///
/// Returns `None` when the input does not form a reference, in which case the
/// `&` is emitted literally ("flush code points consumed as a character
/// reference").
pub(super) fn decode(rest: &[char]) -> Option<Decoded> {
    match rest.first() {
        Some('#') => decode_numeric(rest),
        Some(c) if c.is_ascii_alphanumeric() => decode_named(rest),
        _ => None,
    }
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// NOTE: The semicolon is required. The spec's legacy no-semicolon forms
/// are not supported.
fn decode_named(rest: &[char]) -> Option<Decoded> {
    let name: String = rest
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if rest.get(name.len()) != Some(&';') {
        return None;
    }
    NAMED_REFERENCES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, value)| Decoded {
            text: (*value).to_string(),
            consumed: name.len() + 1,
        })
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
fn decode_numeric(rest: &[char]) -> Option<Decoded> {
    let (radix, digits_start) = match rest.get(1) {
        Some('x' | 'X') => (16, 2),
        _ => (10, 1),
    };
    let digits: String = rest[digits_start..]
        .iter()
        .take_while(|c| c.is_digit(radix))
        .collect();
    if digits.is_empty() {
        // "absence-of-digits-in-numeric-character-reference parse error"
        return None;
    }
    let mut consumed = digits_start + digits.len();
    if rest.get(consumed) == Some(&';') {
        consumed += 1;
    }

    // [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    // "If the number is 0x00 ... greater than 0x10FFFF ... a surrogate, ...
    // set the character reference code to 0xFFFD."
    let c = u32::from_str_radix(&digits, radix)
        .ok()
        .filter(|&code| code != 0)
        .and_then(char::from_u32)
        .unwrap_or('\u{FFFD}');
    Some(Decoded {
        text: c.to_string(),
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn named_reference_requires_semicolon() {
        assert_eq!(
            decode(&chars("amp; rest")),
            Some(Decoded {
                text: "&".to_string(),
                consumed: 4
            })
        );
        assert_eq!(decode(&chars("amp rest")), None);
        assert_eq!(decode(&chars("unknown;")), None);
    }

    #[test]
    fn numeric_references() {
        assert_eq!(decode(&chars("#65;")).map(|d| d.text), Some("A".to_string()));
        assert_eq!(decode(&chars("#x41")).map(|d| d.consumed), Some(3));
        assert_eq!(decode(&chars("#0;")).map(|d| d.text), Some("\u{FFFD}".to_string()));
        assert_eq!(decode(&chars("#xD800;")).map(|d| d.text), Some("\u{FFFD}".to_string()));
        assert_eq!(decode(&chars("#;")), None);
    }
}
