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

//! Stateful, incremental formatter that emits a best-effort rendering of a
//! phone number as its digits arrive one at a time.

use std::borrow::Cow;

use crate::consts;
use crate::country;
use crate::metadata::{Database, Format, Metadata, DATABASE};
use crate::parser::helper::AsCharExt;

/// Incremental formatter for a phone number being typed one character at a
/// time.
pub struct AsYouType<'d> {
    database: &'d Database,
    region: Option<country::Id>,

    /// Raw digits entered so far, after leading `+`/country-code handling.
    national: String,

    /// Digits entered while still disambiguating the country calling code
    /// (only used when the input started with `+`).
    leading: String,

    /// Whether the input started with a `+` (or full-width plus) and a
    /// country calling code is being (or has been) extracted from it.
    expecting_country_code: bool,

    metadata: Option<&'d Metadata>,
    format: Option<&'d Format>,

    remembered: Option<usize>,
    current: String,
}

impl<'d> AsYouType<'d> {
    /// Create a new as-you-type formatter defaulting to the given region.
    pub fn new(region: country::Id) -> Self {
        Self::with_database(&DATABASE, region)
    }

    /// Create a new as-you-type formatter with a specific `Database`.
    pub fn with_database(database: &'d Database, region: country::Id) -> Self {
        let metadata = database.by_id(region.as_ref());

        AsYouType {
            database,
            region: Some(region),
            national: String::new(),
            leading: String::new(),
            expecting_country_code: false,
            metadata,
            format: None,
            remembered: None,
            current: String::new(),
        }
    }

    /// Reset the formatter back to its initial, empty state.
    pub fn clear(&mut self) {
        self.national.clear();
        self.leading.clear();
        self.expecting_country_code = false;
        self.metadata = self.region.and_then(|r| self.database.by_id(r.as_ref()));
        self.format = None;
        self.remembered = None;
        self.current.clear();
    }

    /// Feed a single character and return the current best-effort
    /// formatted string.
    pub fn input_digit(&mut self, ch: char) -> &str {
        self.input(ch, false)
    }

    /// As [`Self::input_digit`], additionally marking the position of the
    /// just-entered digit in the returned string.
    pub fn input_digit_and_remember_position(&mut self, ch: char) -> &str {
        self.input(ch, true)
    }

    /// The index in the last returned string corresponding to the digit
    /// most recently entered via [`Self::input_digit_and_remember_position`],
    /// or `-1` if none has been recorded.
    pub fn get_remembered_position(&self) -> isize {
        self.remembered.map(|p| p as isize).unwrap_or(-1)
    }

    fn input(&mut self, ch: char, remember: bool) -> &str {
        if ch == consts::PLUS_SIGN || ch == '\u{FF0B}' {
            if self.national.is_empty() && self.leading.is_empty() {
                self.expecting_country_code = true;
                self.metadata = None;
            }

            return self.render(remember, None);
        }

        let digit = match ch.as_dec_digit() {
            Some(digit) => digit,
            None => return &self.current,
        };

        if self.expecting_country_code {
            self.leading.push(digit);

            if let Ok(code) = self.leading.parse::<u16>() {
                if let Some(meta) = self.database.by_code(&code).and_then(|m| m.into_iter().next()) {
                    self.metadata = self.database.by_id(meta.id()).or(Some(meta));
                    self.expecting_country_code = false;
                    self.format = None;
                } else if self.leading.len() >= consts::MAX_LENGTH_FOR_COUNTRY_CODE {
                    // No code of this length exists; keep accumulating as
                    // raw digits rather than getting stuck forever.
                    self.expecting_country_code = false;
                    self.metadata = None;
                }
            }

            return self.render(remember, Some(digit));
        }

        self.national.push(digit);
        self.render(remember, Some(digit))
    }

    fn render(&mut self, remember: bool, last: Option<char>) -> &str {
        let mut out = String::new();

        if self.expecting_country_code || (!self.leading.is_empty() && self.metadata.is_none()) {
            out.push('+');
            out.push_str(&self.leading);
        } else {
            let mut shows_country_code = false;

            if let Some(meta) = self.metadata {
                if self.region.is_none() || !self.leading.is_empty() {
                    out.push('+');
                    out.push_str(&meta.country_code().to_string());
                    out.push(' ');
                    shows_country_code = true;
                }
            }

            out.push_str(&self.formatted_national(shows_country_code));
        }

        let position = if remember {
            last.and_then(|d| out.rfind(d)).or(Some(out.len().saturating_sub(1)))
        } else {
            None
        };

        self.current = out;
        self.remembered = position;

        &self.current
    }

    fn formatted_national(&mut self, shows_country_code: bool) -> String {
        let meta = match self.metadata {
            Some(meta) => meta,
            None => return self.national.clone(),
        };

        if self.national.len() < 3 {
            return self.national.clone();
        }

        let formats = if shows_country_code && !meta.international_formats().is_empty() {
            meta.international_formats()
        } else {
            meta.formats()
        };

        if self
            .format
            .map(|f| prefix_compatible(f, &self.national))
            .unwrap_or(false)
        {
            if let Some(rendered) = try_render(meta, self.format.unwrap(), &self.national) {
                return rendered;
            }
        }

        for candidate in formats {
            if !prefix_compatible(candidate, &self.national) {
                continue;
            }

            if let Some(rendered) = try_render(meta, candidate, &self.national) {
                self.format = Some(candidate);
                return rendered;
            }
        }

        self.format = None;
        self.national.clone()
    }
}

/// Whether the format's `leading_digits` patterns (if any) are compatible
/// with the digits entered so far.
fn prefix_compatible(format: &Format, national: &str) -> bool {
    let leading = format.leading_digits();

    leading.is_empty()
        || leading
            .last()
            .unwrap()
            .find(national)
            .map(|m| m.start() == 0)
            .unwrap_or(false)
}

/// Render `national` through `format`, either as a full match (the
/// committed, final-looking rendering) or as a partial grouping derived
/// from the same template while more digits are still expected.
fn try_render(meta: &Metadata, format: &Format, national: &str) -> Option<String> {
    if format
        .pattern()
        .find(national)
        .map(|m| m.start() == 0 && m.end() == national.len())
        .unwrap_or(false)
    {
        return Some(apply(meta, format, national));
    }

    // Not a full match yet: still group what we have using the template's
    // separators, so the output stays stable as more digits arrive.
    Some(partial_group(format.format(), national))
}

fn apply(meta: &Metadata, format: &Format, national: &str) -> String {
    let transform = format.national_prefix();

    format
        .pattern()
        .replace(
            national,
            &*if let Some(transform) = transform {
                let first = consts::FIRST_GROUP
                    .captures(format.format())
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str())
                    .unwrap_or("$1");

                let template = transform.replace(*consts::NP, meta.national_prefix().unwrap_or(""));
                let template = template.replace(*consts::FG, &*format!("${}", first));

                consts::FIRST_GROUP.replace(format.format(), &*template)
            } else {
                Cow::Borrowed(format.format())
            },
        )
        .into()
}

/// Groups raw digits using the number of literal separators implied by a
/// template like `"$1 $2 $3"`, splitting roughly evenly across the
/// remaining groups.
fn partial_group(template: &str, national: &str) -> String {
    let groups = template.matches('$').count().max(1);
    let per_group = national.len().div_ceil(groups).max(1);

    national
        .as_bytes()
        .chunks(per_group)
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::country;

    #[test]
    fn formats_us_number_incrementally() {
        let mut aut = AsYouType::new(country::US);

        for ch in "+16502530000".chars() {
            aut.input_digit(ch);
        }

        assert_eq!("+1 650-253-0000", aut.input_digit('\0'));
    }

    #[test]
    fn never_drops_digits() {
        let mut aut = AsYouType::new(country::US);
        let mut out = String::new();

        for ch in "6502530000".chars() {
            out = aut.input_digit(ch).to_string();
        }

        assert_eq!(10, out.chars().filter(|c| c.is_ascii_digit()).count());
    }

    #[test]
    fn clear_resets_state() {
        let mut aut = AsYouType::new(country::US);
        aut.input_digit('6');
        aut.input_digit('5');
        aut.clear();

        assert_eq!("", aut.input_digit('\0'));
    }
}
