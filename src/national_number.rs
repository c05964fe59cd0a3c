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

use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The National (significant) Number, as defined in International
/// Telecommunication Union (ITU) Recommendation E.164, without any leading
/// zero.
///
/// In some countries, the national (significant) number starts with one or
/// more "0"s without this being a national prefix or trunk code of some
/// kind. For example, the leading zero in the national (significant) number
/// of an Italian phone number indicates the number is a fixed-line number.
/// There have been plans to migrate fixed-line numbers to start with the
/// digit two since December 2000, but it has not happened yet. See
/// http://en.wikipedia.org/wiki/%2B39 for more details.
///
/// These leading zeroes can be safely ignored (there is no need to set
/// them) for most countries. For the limited number of countries that
/// behave like Italy, if the leading zero(s) of a number would be retained
/// even when dialling internationally, the count of leading zeroes is kept
/// here so formatting can reconstruct them.
#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Hash, Debug)]
pub struct NationalNumber {
    pub(crate) value: u64,
    pub(crate) zeroes: u8,
}

impl NationalNumber {
    /// Create a new `NationalNumber` from its numeric value and the count
    /// of leading zeroes that were stripped off when parsing it (0 if the
    /// national significant number does not start with a zero).
    pub fn new(value: u64, zeroes: u8) -> Self {
        NationalNumber { value, zeroes }
    }

    /// The numeric value of the national significant number, without any
    /// leading zero.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether this number is conventionally written with one or more
    /// leading zeros (e.g. an Italian fixed-line number).
    pub fn is_italian_leading_zero(&self) -> bool {
        self.zeroes > 0
    }

    /// The number of leading zeros that should be prepended when rendering
    /// the national significant number (0 when there are none).
    pub fn zeroes(&self) -> u8 {
        self.zeroes
    }
}

impl fmt::Display for NationalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.zeroes {
            write!(f, "0")?;
        }

        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod test {
    use super::NationalNumber;

    #[test]
    fn renders_leading_zeroes() {
        assert_eq!("0690123456", NationalNumber::new(690123456, 1).to_string());
        assert_eq!("690123456", NationalNumber::new(690123456, 0).to_string());
    }
}
