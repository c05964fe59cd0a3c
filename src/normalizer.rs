// Copyright (C) 2017 1aim GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Free functions that clean up raw textual input before parsing, and that
//! can also be used standalone to sanitize user-facing strings.

use crate::consts;
use crate::parser::helper::AsCharExt;
use nom::AsChar;

/// Converts a string into digits only, converting Latin letters into digits
/// using the standard phone keypad mapping and any other decimal digit
/// scripts into their ASCII value. Non-digit, non-letter characters are
/// dropped.
pub fn normalize(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    for ch in value.chars() {
        if let Some(digit) = ch.as_dec_digit() {
            result.push(digit);
        } else if let Some(&mapped) = consts::ALPHA_PHONE_MAPPINGS.get(&ch) {
            result.push(mapped);
        }
    }

    result
}

/// Converts a string into digits only, discarding letters entirely (as
/// opposed to [`normalize`], which maps them onto the keypad).
pub fn normalize_digits_only(value: &str) -> String {
    value.chars().filter_map(|ch| ch.as_dec_digit()).collect()
}

/// Converts the alpha characters in a number to their numeric equivalent,
/// preserving punctuation and whitespace untouched.
pub fn convert_alpha_characters_in_number(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    for ch in value.chars() {
        if let Some(&mapped) = consts::ALPHA_PHONE_MAPPINGS.get(&ch) {
            result.push(mapped);
        } else {
            result.push(ch);
        }
    }

    result
}

/// Attempts to extract a possible phone number from the string passed in.
/// Strips leading characters that could not start a phone number and any
/// trailing junk, including an alternate extension that would otherwise
/// make the input look like two concatenated numbers.
pub fn extract_possible_number(value: &str) -> String {
    crate::parser::helper::extract(value)
        .map(|(_, found)| found.to_owned())
        .unwrap_or_default()
}

/// Checks whether the string could plausibly represent a phone number,
/// i.e. it has at least 3 digits and otherwise looks like digits
/// interspersed with punctuation (optionally prefixed by a `+`).
pub fn is_viable_phone_number(value: &str) -> bool {
    if value.chars().filter(|ch| ch.is_dec_digit()).count() < 3 {
        return false;
    }

    !consts::VALID_PUNCTUATION.is_empty() && looks_like_a_phone_number(value)
}

fn looks_like_a_phone_number(value: &str) -> bool {
    let mut chars = value.chars().peekable();

    if let Some(&ch) = chars.peek() {
        if ch == consts::PLUS_SIGN || ch == '\u{FF0B}' {
            chars.next();
        }
    }

    let mut seen_digit = false;

    for ch in chars {
        if ch.is_dec_digit() || ch.as_dec_digit().is_some() {
            seen_digit = true;
        } else if ch.is_alphabetic() || is_recognized_punctuation(ch) {
            // allowed
        } else {
            return false;
        }
    }

    seen_digit
}

/// Checks whether the string has at least three alphabetic characters, i.e.
/// some of its phone-number digits are written as letters (e.g.
/// "1-800-FLOWERS").
pub fn is_alpha_number(value: &str) -> bool {
    is_viable_phone_number(value) && consts::VALID_ALPHA_PHONE.is_match(value)
}

fn is_recognized_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '-' | 'x'
            | '\u{2010}'..='\u{2015}'
            | '\u{2212}'
            | '\u{30FC}'
            | '\u{FF0D}'..='\u{FF0F}'
            | ' '
            | '\u{00A0}'
            | '\u{00AD}'
            | '\u{200B}'
            | '\u{2060}'
            | '\u{3000}'
            | '('
            | ')'
            | '\u{FF08}'
            | '\u{FF09}'
            | '\u{FF3B}'
            | '\u{FF3D}'
            | '.'
            | '['
            | ']'
            | '/'
            | '~'
            | '\u{2053}'
            | '\u{223C}'
            | '\u{FF5E}'
            | '#'
            | ','
            | ';'
            | ':'
            | '\u{200F}'
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_converts_letters_and_wide_digits() {
        assert_eq!(normalize("034-I-am-HUNGRY"), "034426486479");
        assert_eq!(normalize("４2０"), "420");
    }

    #[test]
    fn normalize_digits_only_drops_letters() {
        assert_eq!(normalize_digits_only("03-I-am-HUNGRY4"), "034");
    }

    #[test]
    fn convert_alpha_preserves_punctuation() {
        assert_eq!(convert_alpha_characters_in_number("1800-FLOWERS"), "1800-3569377");
    }

    #[test]
    fn extract_possible_number_strips_junk() {
        assert_eq!(extract_possible_number("Tel:0800-345-600"), "0800-345-600");
        assert_eq!(extract_possible_number("Num-...."), "");
    }

    #[test]
    fn is_viable_phone_number_requires_three_digits() {
        assert!(is_viable_phone_number("+1 650-253-0000"));
        assert!(!is_viable_phone_number("12"));
        assert!(!is_viable_phone_number("not a number at all"));
    }

    #[test]
    fn is_alpha_number_detects_keypad_letters() {
        assert!(is_alpha_number("1800 six-flags"));
        assert!(is_alpha_number("1800 SIX FLAGS"));
        assert!(!is_alpha_number("1800 123 1234"));
        assert!(!is_alpha_number("1 six-flags"));
    }
}
