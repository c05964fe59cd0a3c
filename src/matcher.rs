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

//! Compares two phone numbers (parsed or textual) to decide whether they
//! plausibly refer to the same line.

use crate::parser;
use crate::phone_number::PhoneNumber;
use crate::validator;

/// The result of comparing two phone numbers.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Match {
    /// One of the inputs could not be parsed as a phone number.
    NotANumber,

    /// Neither the country calling codes nor the national significant
    /// numbers agree closely enough to call this a match.
    NoMatch,

    /// The national significant numbers agree on at least the last 7
    /// digits, but not on more, and both the country calling code and
    /// extension status prevented a stronger verdict.
    ShortNsn,

    /// The national significant numbers (and extensions) agree, but at
    /// least one side has no country calling code to compare.
    Nsn,

    /// Country calling code, national significant number and extension
    /// all agree.
    Exact,
}

/// Something that can be coerced into a [`PhoneNumber`] for the purposes of
/// [`is_number_match`], either because it already is one or because it can
/// be parsed from text with no default region.
pub trait Matchable {
    fn into_number(self) -> Option<PhoneNumber>;
}

impl Matchable for PhoneNumber {
    fn into_number(self) -> Option<PhoneNumber> {
        Some(self)
    }
}

impl<'a> Matchable for &'a PhoneNumber {
    fn into_number(self) -> Option<PhoneNumber> {
        Some(self.clone())
    }
}

impl<'a> Matchable for &'a str {
    fn into_number(self) -> Option<PhoneNumber> {
        parser::parse(None, self).ok()
    }
}

impl Matchable for String {
    fn into_number(self) -> Option<PhoneNumber> {
        parser::parse(None, &self).ok()
    }
}

/// Compares two phone numbers, either already-parsed [`PhoneNumber`]s or
/// raw text (parsed here with no default region), and decides how closely
/// they match.
pub fn is_number_match<A: Matchable, B: Matchable>(first: A, second: B) -> Match {
    let first = match first.into_number() {
        Some(number) => number,
        None => return Match::NotANumber,
    };

    let second = match second.into_number() {
        Some(number) => number,
        None => return Match::NotANumber,
    };

    is_number_match_parsed(&first, &second)
}

fn is_number_match_parsed(first: &PhoneNumber, second: &PhoneNumber) -> Match {
    if first.extension().is_some() != second.extension().is_some() {
        return Match::NoMatch;
    }

    if let (Some(a), Some(b)) = (first.extension(), second.extension()) {
        if a.as_ref() != b.as_ref() {
            return Match::NoMatch;
        }
    }

    let first_code = first.code().value();
    let second_code = second.code().value();

    let first_nsn = national_significant_digits(first);
    let second_nsn = national_significant_digits(second);

    if first_code != 0 && second_code != 0 {
        if first_code == second_code && first_nsn == second_nsn {
            return Match::Exact;
        }

        return Match::NoMatch;
    }

    // At least one side has no country calling code: fall back to
    // comparing the national significant numbers directly.
    if first_nsn == second_nsn {
        return Match::Nsn;
    }

    if suffix_match(&first_nsn, &second_nsn) {
        return Match::ShortNsn;
    }

    Match::NoMatch
}

/// The national significant number, including any conventional leading
/// zeros (e.g. an Italian fixed-line number), so that two numbers differing
/// only in their leading-zero count don't compare equal.
fn national_significant_digits(number: &PhoneNumber) -> String {
    validator::national_significant_number(number)
}

/// True when the shorter of the two digit strings is a suffix of the
/// longer one, and the shared suffix is at least 7 digits long.
fn suffix_match(a: &str, b: &str) -> bool {
    const MIN_MATCH: usize = 7;

    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if shorter.len() < MIN_MATCH {
        return false;
    }

    longer.ends_with(shorter)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::country;

    #[test]
    fn leading_zero_count_is_significant() {
        let with_zero = parser::parse(Some(country::IT), "+39 0236618300").unwrap();
        let without_zero = parser::parse(Some(country::IT), "+39 236618300").unwrap();

        assert_eq!(Match::NoMatch, is_number_match(&with_zero, &without_zero));
    }

    #[test]
    fn exact_match_from_parsed_numbers() {
        let a = parser::parse(Some(country::US), "650 253 0000").unwrap();
        let b = parser::parse(Some(country::US), "+1 650-253-0000").unwrap();

        assert_eq!(Match::Exact, is_number_match(&a, &b));
    }

    #[test]
    fn exact_match_from_text() {
        assert_eq!(
            Match::Exact,
            is_number_match("+16502530000", "+1 650 253 0000")
        );
    }

    #[test]
    fn not_a_number() {
        assert_eq!(Match::NotANumber, is_number_match("not a number", "+16502530000"));
    }

    #[test]
    fn no_match_on_different_numbers() {
        assert_eq!(
            Match::NoMatch,
            is_number_match("+16502530000", "+16502530001")
        );
    }
}
