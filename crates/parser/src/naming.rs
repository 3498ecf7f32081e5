//! Synthesized type names

/// Upper-case the first letter of every word
///
/// ASCII letters, digits and `_` continue a word and any other ASCII
/// character starts a new one; outside ASCII only whitespace separates words.
/// Word starts take their title-case form (`ǆ` becomes `ǅ`, not `Ǆ`). The rest
/// of each word is left untouched, so camelCase property names keep their
/// inner capitals.
///
/// # Examples
/// ```
/// use crd2schema_parser::title_case;
///
/// assert_eq!(title_case("spec"), "Spec");
/// assert_eq!(title_case("nodeSelector"), "NodeSelector");
/// assert_eq!(title_case("cert-manager"), "Cert-Manager");
/// ```
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;

    for ch in s.chars() {
        if at_word_start {
            result.push(to_title(ch));
        } else {
            result.push(ch);
        }
        at_word_start = is_separator(ch);
    }

    result
}

fn is_separator(ch: char) -> bool {
    if ch.is_ascii() {
        return !(ch.is_ascii_alphanumeric() || ch == '_');
    }
    ch.is_whitespace()
}

/// Single-character title case
///
/// Title case equals upper case except for the Latin digraphs and the Greek
/// letters with iota subscript. Characters whose upper case spans several
/// characters are kept as they are.
fn to_title(ch: char) -> char {
    let title = match ch as u32 {
        0x01C4..=0x01C6 => Some(0x01C5),
        0x01C7..=0x01C9 => Some(0x01C8),
        0x01CA..=0x01CC => Some(0x01CB),
        0x01F1..=0x01F3 => Some(0x01F2),
        cp @ (0x1F80..=0x1F87 | 0x1F90..=0x1F97 | 0x1FA0..=0x1FA7) => Some(cp + 8),
        cp @ (0x1F88..=0x1F8F | 0x1F98..=0x1F9F | 0x1FA8..=0x1FAF) => Some(cp),
        0x1FB3 | 0x1FBC => Some(0x1FBC),
        0x1FC3 | 0x1FCC => Some(0x1FCC),
        0x1FF3 | 0x1FFC => Some(0x1FFC),
        _ => None,
    };
    if let Some(title) = title.and_then(char::from_u32) {
        return title;
    }

    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// Name of a property's type nested under `parent`
pub fn property_type_name(parent: &str, property: &str) -> String {
    format!("{}{}", parent, title_case(property))
}

/// Name of the `index`th `oneOf` alternative under `parent`
pub fn one_of_type_name(parent: &str, index: usize) -> String {
    format!("{}OneOf{}", parent, index)
}
