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

//! Formats a number the way a mobile handset should dial it from a given
//! region, as opposed to how it would be printed on a business card.

use crate::country;
use crate::formatter::Mode;
use crate::metadata::{Database, DATABASE};
use crate::phone_number::PhoneNumber;
use crate::validator;

/// Returns the string a mobile device should dial, from `from_region`, to
/// reach `number`. Returns an empty string if `number` is flagged as
/// unreachable from outside its own region (e.g. some French toll-free
/// ranges) and `from_region` is not that region.
pub fn format_number_for_mobile_dialing(
    number: &PhoneNumber,
    from_region: country::Id,
    with_formatting: bool,
) -> String {
    format_number_for_mobile_dialing_with(&DATABASE, number, from_region, with_formatting)
}

/// As [`format_number_for_mobile_dialing`], using the given `Database`.
pub fn format_number_for_mobile_dialing_with(
    database: &Database,
    number: &PhoneNumber,
    from_region: country::Id,
    with_formatting: bool,
) -> String {
    let region = number.country().id();
    let same_region = region == Some(from_region);

    if !same_region && !validator::can_be_internationally_dialled(database, number) {
        return String::new();
    }

    // Dialling a number from within its own region normally uses the
    // national form; crossing a region boundary requires the country
    // calling code.
    let mode = if same_region {
        Mode::National
    } else {
        Mode::International
    };

    let rendered = number
        .format_with(database)
        .mode(mode)
        .to_string();

    if with_formatting {
        rendered
    } else {
        strip_formatting(&rendered)
    }
}

fn strip_formatting(value: &str) -> String {
    value.chars().filter(|&c| c.is_ascii_digit() || c == '+').collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{country, parser};

    #[test]
    fn same_region_uses_national_form() {
        let number = parser::parse(Some(country::US), "+1 6502530000").unwrap();

        assert_eq!(
            "(650) 253-0000",
            format_number_for_mobile_dialing(&number, country::US, true)
        );
        assert_eq!(
            "6502530000",
            format_number_for_mobile_dialing(&number, country::US, false)
        );
    }

    #[test]
    fn cross_region_uses_international_form() {
        let number = parser::parse(Some(country::US), "+1 6502530000").unwrap();

        assert_eq!(
            "+1 650-253-0000",
            format_number_for_mobile_dialing(&number, country::CA, true)
        );
        assert_eq!(
            "+16502530000",
            format_number_for_mobile_dialing(&number, country::CA, false)
        );
    }
}
