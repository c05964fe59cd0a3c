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

use either::*;

use crate::consts;
use crate::country;
use crate::metadata::{Database, Metadata, DATABASE};
use crate::parser;
use crate::parser::helper::Number as ParseNumber;
use crate::phone_number::{PhoneNumber, Type};

/// Possible outcomes when testing if a `PhoneNumber` is possible.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Validation {
    /// The number length matches that of valid numbers for this region.
    IsPossible,

    /// The number length matches that of local numbers for this region only
    /// (i.e. numbers that may be able to be dialled within an area, but do not
    /// have all the information to be dialled from anywhere inside or outside
    /// the country).
    IsPossibleLocalOnly,

    /// The number has an invalid country calling code.
    InvalidCountryCode,

    /// The number is shorter than all valid numbers for this region.
    TooShort,

    /// The number is longer than the shortest valid numbers for this region,
    /// shorter than the longest valid numbers for this region, and does not
    /// itself have a number length that matches valid numbers for this region.
    InvalidLength,

    /// The number is longer than all valid numbers for this region.
    TooLong,
}

impl Validation {
    /// Whether it's a possible number.
    pub fn is_possible(&self) -> bool {
        match *self {
            Validation::IsPossible | Validation::IsPossibleLocalOnly => true,

            _ => false,
        }
    }

    /// Whether it's an invalid number.
    pub fn is_invalid(&self) -> bool {
        match *self {
            Validation::InvalidCountryCode
            | Validation::TooShort
            | Validation::InvalidLength
            | Validation::TooLong => true,

            _ => false,
        }
    }

    /// Whether the length is invalid.
    pub fn is_invalid_length(&self) -> bool {
        match *self {
            Validation::TooShort | Validation::InvalidLength | Validation::TooLong => true,

            _ => false,
        }
    }
}

/// Check if the provided string is a viable phone number.
pub fn is_viable<S: AsRef<str>>(string: S) -> bool {
    let string = string.as_ref();

    if string.len() < consts::MIN_LENGTH_FOR_NSN {
        return false;
    }

    parser::valid::phone_number(string).is_ok()
}

/// Check if the phone number is valid.
pub fn is_valid(number: &PhoneNumber) -> bool {
    is_valid_with(&*DATABASE, number)
}

/// Check if the phone number is valid with the given `Database`.
pub fn is_valid_with(database: &Database, number: &PhoneNumber) -> bool {
    let code = number.country().code();
    let national = number.national.to_string();
    let source = try_opt!(false; source_for(database, code, &national));
    let meta = try_opt!(false; match source {
        Left(region) =>
            database.by_id(region.as_ref()),

        Right(code) =>
            database.by_code(&code).and_then(|m| m.into_iter().next()),
    });

    number_type(meta, &national) != Type::Unknown
}

/// Check whether the phone number's length is consistent with a possible
/// number for its region, without checking the national-number pattern
/// itself (unlike [`is_valid`]).
pub fn is_possible(number: &PhoneNumber) -> bool {
    is_possible_with(&*DATABASE, number)
}

/// As [`is_possible`], using the given `Database`.
pub fn is_possible_with(database: &Database, number: &PhoneNumber) -> bool {
    is_possible_with_reason(database, number).is_possible()
}

/// As [`is_possible_with`], returning the detailed [`Validation`] reason.
pub fn is_possible_with_reason(database: &Database, number: &PhoneNumber) -> Validation {
    let code = number.country().code();
    let national = number.national().to_string();

    let meta = try_opt!(
        Validation::InvalidCountryCode;
        database.by_code(&code).and_then(|m| m.into_iter().next())
    );

    length(
        meta,
        &ParseNumber {
            country: number.code().source(),
            national: national.into(),
            prefix: None,
            extension: None,
            carrier: None,
        },
        Type::Unknown,
    )
}

/// As [`is_possible`], but checking the number's length against a specific
/// [`Type`]'s descriptor instead of the region's general description.
pub fn is_possible_number_for_type(number: &PhoneNumber, kind: Type) -> bool {
    is_possible_number_for_type_with(&*DATABASE, number, kind)
}

/// As [`is_possible_number_for_type`], using the given `Database`.
pub fn is_possible_number_for_type_with(database: &Database, number: &PhoneNumber, kind: Type) -> bool {
    let code = number.country().code();
    let national = number.national().to_string();

    let meta = match database.by_code(&code).and_then(|m| m.into_iter().next()) {
        Some(meta) => meta,
        None => return false,
    };

    length(
        meta,
        &ParseNumber {
            country: number.code().source(),
            national: national.into(),
            prefix: None,
            extension: None,
            carrier: None,
        },
        kind,
    )
    .is_possible()
}

/// Whether the number can, in principle, be dialled internationally (i.e.
/// its region's metadata does not flag it as a no-international-dialling
/// number such as a French toll-free line).
pub fn can_be_internationally_dialled(database: &Database, number: &PhoneNumber) -> bool {
    let national = number.national().to_string();

    match number.metadata(database) {
        Some(meta) => match meta.descriptors().no_international() {
            Some(desc) => !desc.is_match(&national),
            None => true,
        },

        None => true,
    }
}

/// Drops trailing digits from an over-long number until its length becomes
/// possible for its region, or until a single digit remains. Returns `true`
/// if the number was (or was made) possible.
pub fn truncate_too_long_number(database: &Database, number: &mut PhoneNumber) -> bool {
    if is_possible_with(database, number) {
        return true;
    }

    let mut digits = number.national().value.to_string();

    while digits.len() > 1 {
        digits.truncate(digits.len() - 1);

        let candidate = PhoneNumber {
            code: *number.code(),
            national: crate::national_number::NationalNumber::new(
                digits.parse().unwrap(),
                number.national().zeroes,
            ),
            extension: number.extension().cloned(),
            carrier: number.carrier().cloned(),
            raw_input: None,
        };

        if is_possible_with(database, &candidate) {
            *number = candidate;
            return true;
        }
    }

    false
}

pub fn length(meta: &Metadata, number: &ParseNumber, kind: Type) -> Validation {
    let desc = if let Some(desc) = meta.descriptors().get(kind) {
        desc
    } else {
        return Validation::InvalidLength;
    };

    let length = number.national.len() as u16;
    let local = &desc.possible_local_length[..];
    let possible = if desc.possible_length.is_empty() {
        &meta.descriptors.general.possible_length[..]
    } else {
        &desc.possible_length[..]
    };

    if possible.is_empty() {
        return Validation::InvalidLength;
    }

    let minimum = possible[0];

    if local.contains(&length) {
        Validation::IsPossibleLocalOnly
    } else if length == minimum {
        Validation::IsPossible
    } else if length < minimum {
        Validation::TooShort
    } else if length > *possible.last().unwrap() {
        Validation::TooLong
    } else if possible.contains(&length) {
        Validation::IsPossible
    } else {
        Validation::InvalidLength
    }
}

/// The country calling code registered for `region`, or 0 if `region` is
/// not present in `database`.
pub fn country_code_for_region(database: &Database, region: country::Id) -> u16 {
    database
        .by_id(region.as_ref())
        .map(Metadata::country_code)
        .unwrap_or(0)
}

/// The national (trunk) prefix dialled before a national-format number in
/// `region`, if it has one.
pub fn ndd_prefix_for_region(database: &Database, region: country::Id) -> Option<String> {
    database
        .by_id(region.as_ref())
        .and_then(Metadata::national_prefix)
        .map(String::from)
}

/// Whether `region` shares the North American Numbering Plan's country
/// calling code (1).
pub fn is_nanpa_country(database: &Database, region: country::Id) -> bool {
    database
        .by_code(&1)
        .map(|regions| regions.iter().any(|m| m.id() == region.as_ref()))
        .unwrap_or(false)
}

/// Whether a national significant number dialled in the country calling
/// code's main region may conventionally retain leading zeros (e.g. Italy).
pub fn is_leading_zero_possible(database: &Database, country_code: u16) -> bool {
    database
        .by_code(&country_code)
        .and_then(|m| m.into_iter().next())
        .map(Metadata::is_leading_zero_possible)
        .unwrap_or(false)
}

/// The national significant number of `number`, as a plain digit string
/// (including any conventional leading zeroes).
pub fn national_significant_number(number: &PhoneNumber) -> String {
    number.national().to_string()
}

/// Reverse-lookup the region `number` belongs to, among the regions sharing
/// its country calling code (disambiguated the same way [`is_valid_with`]
/// picks a region's metadata), or `None` if its country code is unknown.
pub fn region_code_for_number(database: &Database, number: &PhoneNumber) -> Option<country::Id> {
    let national = number.national().to_string();

    match source_for(database, number.code().value(), &national)? {
        Left(region) => Some(region),
        Right(_) => None,
    }
}

/// All the CLDR region codes sharing `code` as their country calling code,
/// main region first, or an empty list if `code` is unassigned.
pub fn region_codes_for_country_code(database: &Database, code: u16) -> Vec<country::Id> {
    database
        .region(&code)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|region| region.parse().ok())
        .collect()
}

/// Find the metadata source.
pub fn source_for(
    database: &Database,
    code: u16,
    national: &str,
) -> Option<Either<country::Id, u16>> {
    let regions = try_opt!(None; database.region(&code));

    if regions.len() == 1 {
        return if regions[0] == "001" {
            Some(Right(code))
        } else {
            match regions[0].parse() {
                Ok(value) => Some(Left(value)),
                Err(_) => None,
            }
        };
    }

    // Regions that narrow themselves down via `leadingDigits` disambiguate a
    // shared calling code unambiguously, so they take priority over a
    // region (typically the main country for the code) that can only be
    // matched by falling back to its general description.
    for region in &regions {
        let meta = database.by_id(*region).unwrap();

        if let Some(pattern) = meta.leading_digits.as_ref() {
            if let Some(index) = pattern.find(national) {
                if index.start() == 0 {
                    return Some(Left(region.parse().unwrap()));
                }
            }
        }
    }

    for region in &regions {
        let meta = database.by_id(*region).unwrap();

        if meta.leading_digits.is_none() && number_type(meta, national) != Type::Unknown {
            return Some(Left(region.parse().unwrap()));
        }
    }

    None
}

pub fn number_type(meta: &Metadata, value: &str) -> Type {
    if !meta.descriptors.general.is_match(value) {
        return Type::Unknown;
    }

    if meta
        .descriptors
        .premium_rate
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::PremiumRate;
    }

    if meta
        .descriptors
        .toll_free
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::TollFree;
    }

    if meta
        .descriptors
        .shared_cost
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::SharedCost;
    }

    if meta
        .descriptors
        .voip
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::Voip;
    }

    if meta
        .descriptors
        .personal_number
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::PersonalNumber;
    }

    if meta
        .descriptors
        .pager
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::Pager;
    }

    if meta
        .descriptors
        .uan
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::Uan;
    }

    if meta
        .descriptors
        .voicemail
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::Voicemail;
    }

    if meta
        .descriptors
        .fixed_line
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        if meta
            .descriptors
            .fixed_line
            .as_ref()
            .map(|d| d.national_number.as_str())
            == meta
                .descriptors
                .mobile
                .as_ref()
                .map(|d| d.national_number.as_str())
        {
            return Type::FixedLineOrMobile;
        }

        if meta
            .descriptors
            .mobile
            .as_ref()
            .map(|d| d.is_match(value))
            .unwrap_or(false)
        {
            return Type::FixedLineOrMobile;
        }

        return Type::FixedLine;
    }

    if meta
        .descriptors
        .mobile
        .as_ref()
        .map(|d| d.is_match(value))
        .unwrap_or(false)
    {
        return Type::Mobile;
    }

    Type::Unknown
}

#[cfg(test)]
mod test {
    use crate::country;
    use crate::parser;
    use crate::validator;

    #[test]
    fn validate() {
        assert!(validator::is_valid(
            &parser::parse(Some(country::US), "+1 6502530000").unwrap()
        ));

        assert!(validator::is_valid(
            &parser::parse(Some(country::IT), "+39 0236618300").unwrap()
        ));

        assert!(validator::is_valid(
            &parser::parse(Some(country::GB), "+44 7912345678").unwrap()
        ));

        assert!(validator::is_valid(
            &parser::parse(None, "+800 12345678").unwrap()
        ));

        assert!(validator::is_valid(
            &parser::parse(None, "+979 123456789").unwrap()
        ));

        assert!(validator::is_valid(
            &parser::parse(None, "+64 21387835").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+1 2530000").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+39 023661830000").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+44 791234567").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+49 1234").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+64 3316005").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+3923 2366").unwrap()
        ));

        assert!(!validator::is_valid(
            &parser::parse(None, "+800 123456789").unwrap()
        ));
    }

    #[test]
    fn possible_accepts_plausible_lengths_even_when_invalid() {
        // Too short to be a real US number, but also too short to be merely
        // "invalid length" for the region -- it's just not possible.
        assert!(!validator::is_possible(
            &parser::parse(None, "+1 2530000").unwrap()
        ));

        assert!(validator::is_possible(
            &parser::parse(Some(country::US), "+1 6502530000").unwrap()
        ));
    }

    #[test]
    fn possible_with_reason_classifies_by_length_for_shared_country_code() {
        use crate::metadata::DATABASE;
        use crate::validator::Validation;

        let number = parser::parse(None, "+1 2530000").unwrap();

        assert_eq!(
            Validation::TooShort,
            validator::is_possible_with_reason(&DATABASE, &number)
        );
    }

    #[test]
    fn truncate_too_long_number_drops_trailing_digits() {
        use crate::metadata::DATABASE;

        let mut number = parser::parse(Some(country::US), "+1 650253000099").unwrap();
        assert!(validator::truncate_too_long_number(&DATABASE, &mut number));
        assert!(validator::is_possible(&number));
    }

    #[test]
    fn can_be_internationally_dialled_is_true_by_default() {
        use crate::metadata::DATABASE;

        let number = parser::parse(Some(country::US), "+1 6502530000").unwrap();
        assert!(validator::can_be_internationally_dialled(&DATABASE, &number));
    }

    #[test]
    fn region_lookups() {
        use crate::metadata::DATABASE;

        assert_eq!(1, validator::country_code_for_region(&DATABASE, country::US));
        assert_eq!(64, validator::country_code_for_region(&DATABASE, country::NZ));

        assert_eq!(
            Some("0".to_owned()),
            validator::ndd_prefix_for_region(&DATABASE, country::NZ)
        );

        assert!(validator::is_nanpa_country(&DATABASE, country::US));
        assert!(validator::is_nanpa_country(&DATABASE, country::CA));
        assert!(!validator::is_nanpa_country(&DATABASE, country::NZ));
    }

    #[test]
    fn national_significant_number_is_digits_only() {
        let number = parser::parse(Some(country::IT), "+39 0236618300").unwrap();
        assert_eq!("0236618300", validator::national_significant_number(&number));
    }

    #[test]
    fn region_code_for_number_resolves_shared_country_code() {
        use crate::metadata::DATABASE;

        let us_number = parser::parse(Some(country::US), "+1 6502530000").unwrap();
        assert_eq!(
            Some(country::US),
            validator::region_code_for_number(&DATABASE, &us_number)
        );

        let ca_number = parser::parse(Some(country::CA), "+1 6132345678").unwrap();
        assert_eq!(
            Some(country::CA),
            validator::region_code_for_number(&DATABASE, &ca_number)
        );
    }

    #[test]
    fn region_codes_for_country_code_lists_nanpa_members() {
        use crate::metadata::DATABASE;

        let regions = validator::region_codes_for_country_code(&DATABASE, 1);

        assert_eq!(Some(&country::US), regions.first());
        assert!(regions.contains(&country::CA));

        assert!(validator::region_codes_for_country_code(&DATABASE, 64)
            .contains(&country::NZ));
    }

    #[test]
    fn is_possible_number_for_type_checks_the_given_types_length() {
        use crate::phone_number::Type;

        let mobile = parser::parse(Some(country::GB), "+44 7912345678").unwrap();

        assert!(validator::is_possible_number_for_type(&mobile, Type::Mobile));
        // GB's metadata in this corpus carries no premium-rate descriptor at
        // all, so no length can be "possible" for that type.
        assert!(!validator::is_possible_number_for_type(
            &mobile,
            Type::PremiumRate
        ));
    }

    #[test]
    fn leading_zero_possible_for_italy() {
        use crate::metadata::DATABASE;

        assert!(validator::is_leading_zero_possible(&DATABASE, 39));
        assert!(!validator::is_leading_zero_possible(&DATABASE, 1));
    }
}
