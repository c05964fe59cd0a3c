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

use crate::{
    consts, country,
    metadata::{Database, Format, Metadata, DATABASE},
    phone_number::PhoneNumber,
    validator,
};
use std::{borrow::Cow, fmt};

/// Formatting modes for phone number.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    /// E.164 formatting, no spaces, no decorations.
    E164,

    /// International formatting, contains country code and country dependent
    /// formatting.
    International,

    /// National formatting, no country code and country dependent formatting.
    National,

    /// RFC3966 formatting, see the RFC.
    Rfc3966,
}

/// A formatter for a `PhoneNumber`.
#[derive(Copy, Clone, Debug)]
pub struct Formatter<'n, 'd, 'f> {
    number: &'n PhoneNumber,
    database: Option<&'d Database>,
    mode: Mode,
    format: Option<&'f Format>,
}

impl<'n, 'd, 'f> Formatter<'n, 'd, 'f> {
    /// Define a metadata database to use for formatting.
    pub fn database<'a>(self, database: &'a Database) -> Formatter<'n, 'a, 'f> {
        Formatter {
            number: self.number,
            database: Some(database),
            mode: self.mode,
            format: self.format,
        }
    }

    /// Define the formatting mode.
    pub fn mode(mut self, mode: Mode) -> Formatter<'n, 'd, 'f> {
        self.mode = mode;
        self
    }

    /// Define a custom `Format` to use for formatting.
    pub fn with<'a>(self, format: &'a Format) -> Formatter<'n, 'd, 'a> {
        Formatter {
            number: self.number,
            database: self.database,
            mode: self.mode,
            format: Some(format),
        }
    }
}

/// Create a new `Formatter` for the given phone number.
pub fn format<'n>(number: &'n PhoneNumber) -> Formatter<'n, 'static, 'static> {
    Formatter {
        number: number,
        database: None,
        mode: Mode::E164,
        format: None,
    }
}

/// Create a new `Formatter` for the given phone number using the given
/// metadata database.
pub fn format_with<'d, 'n>(
    database: &'d Database,
    number: &'n PhoneNumber,
) -> Formatter<'n, 'd, 'static> {
    Formatter {
        number: number,
        database: Some(database),
        mode: Mode::E164,
        format: None,
    }
}

impl<'n, 'd, 'f> fmt::Display for Formatter<'n, 'd, 'f> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let db = self.database.unwrap_or(&*DATABASE);

        // If the country code is invalid, return an error.
        let meta = try_opt!(Err(fmt::Error);
			db.by_code(&self.number.country().code()).map(|m|
				m.into_iter().next().unwrap()));

        let national = self.number.national().to_string();
        let formatter = self.format.or_else(|| {
            formatter(
                &national,
                if meta.international_formats().is_empty() || self.mode == Mode::National {
                    meta.formats()
                } else {
                    meta.international_formats()
                },
            )
        });

        match self.mode {
            // Requires no formatting at all, easy life.
            Mode::E164 => {
                write!(f, "+{}{}", self.number.country().code(), national)?;
            }

            // Space separated formatting with national specific rules.
            Mode::International => {
                write!(f, "+{} ", self.number.country().code())?;

                if let Some(formatter) = formatter {
                    write!(f, "{}", replace(&national, meta, formatter, None, None))?;
                } else {
                    write!(f, "{}", national)?;
                }

                if let Some(ext) = self.number.extension() {
                    write!(
                        f,
                        "{}{}",
                        meta.preferred_extension_prefix().unwrap_or(" ext. "),
                        ext
                    )?;
                }
            }

            Mode::National => {
                if let Some(formatter) = formatter {
                    let carrier = self
                        .number
                        .carrier()
                        .and_then(|c| formatter.domestic_carrier().map(|f| (c, f)));

                    if let Some((carrier, format)) = carrier {
                        write!(
                            f,
                            "{}",
                            replace(&national, meta, formatter, Some(format), Some(carrier))
                        )?;
                    } else if let Some(prefix) = formatter.national_prefix() {
                        write!(
                            f,
                            "{}",
                            replace(&national, meta, formatter, Some(prefix), None)
                        )?;
                    } else {
                        write!(f, "{}", replace(&national, meta, formatter, None, None))?;
                    }
                } else {
                    write!(f, "{}", national)?;
                }

                if let Some(ext) = self.number.extension() {
                    write!(
                        f,
                        "{}{}",
                        meta.preferred_extension_prefix().unwrap_or(" ext. "),
                        ext
                    )?;
                }
            }

            Mode::Rfc3966 => {
                write!(f, "tel:+{}-", self.number.country().code())?;

                if let Some(formatter) = formatter {
                    write!(
                        f,
                        "{}",
                        consts::SEPARATOR_PATTERN
                            .replace_all(&replace(&national, meta, formatter, None, None), "-")
                    )?;
                } else {
                    write!(f, "{}", national)?;
                }

                if let Some(ext) = self.number.extension() {
                    write!(f, ";ext={}", ext)?;
                }
            }
        }

        Ok(())
    }
}

fn formatter<'a>(number: &str, formats: &'a [Format]) -> Option<&'a Format> {
    for format in formats {
        let leading = format.leading_digits();

        if leading.is_empty()
            || leading
                .last()
                .unwrap()
                .find(&number)
                .map(|m| m.start() == 0)
                .unwrap_or(false)
        {
            if format
                .pattern()
                .find(&number)
                .map(|m| m.start() == 0 && m.end() == number.len())
                .unwrap_or(false)
            {
                return Some(format);
            }
        }
    }

    None
}

fn replace(
    national: &str,
    meta: &Metadata,
    formatter: &Format,
    transform: Option<&str>,
    carrier: Option<&str>,
) -> String {
    formatter
        .pattern()
        .replace(
            national,
            &*if let Some(transform) = transform {
                let first = consts::FIRST_GROUP
                    .captures(&formatter.format())
                    .unwrap()
                    .get(1)
                    .unwrap()
                    .as_str();
                let format = transform.replace(*consts::NP, meta.national_prefix().unwrap_or(""));
                let format = format.replace(*consts::FG, &*format!("${}", first));
                let format = format.replace(*consts::CC, carrier.unwrap_or(""));

                consts::FIRST_GROUP.replace(formatter.format(), &*format)
            } else {
                Cow::Borrowed(formatter.format())
            },
        )
        .into()
}

/// Render `number`'s national significant number against a caller-supplied
/// list of [`Format`]s instead of the ones from its own region's metadata,
/// selecting among them and applying national-prefix/carrier-code
/// substitution the same way [`Mode::National`] rendering does.
pub fn format_by_pattern(database: &Database, number: &PhoneNumber, formats: &[Format]) -> String {
    let national = number.national().to_string();

    let meta = match database
        .by_code(&number.country().code())
        .and_then(|m| m.into_iter().next())
    {
        Some(meta) => meta,
        None => return national,
    };

    match formatter(&national, formats) {
        Some(format) => {
            let carrier = number
                .carrier()
                .and_then(|c| format.domestic_carrier().map(|f| (c, f)));

            if let Some((carrier, rule)) = carrier {
                replace(&national, meta, format, Some(rule), Some(carrier))
            } else if let Some(prefix) = format.national_prefix() {
                replace(&national, meta, format, Some(prefix), None)
            } else {
                replace(&national, meta, format, None, None)
            }
        }

        None => national,
    }
}

/// Render the national part of `number` using an arbitrary domestic carrier
/// code, ignoring the number's own `preferred_domestic_carrier_code`.
pub fn format_with_carrier_code(database: &Database, number: &PhoneNumber, carrier_code: &str) -> String {
    national_with_carrier(database, number, Some(carrier_code))
}

/// Render the national part of `number` using its own preferred domestic
/// carrier code if it has one -- even if that code is the empty string,
/// which means "dial with no carrier code" -- falling back to `fallback`
/// otherwise.
pub fn format_national_number_with_preferred_carrier_code(
    database: &Database,
    number: &PhoneNumber,
    fallback: &str,
) -> String {
    let carrier = number.carrier().map(|c| c.as_ref()).unwrap_or(fallback);
    national_with_carrier(database, number, Some(carrier))
}

fn national_with_carrier(database: &Database, number: &PhoneNumber, carrier_code: Option<&str>) -> String {
    let national = number.national().to_string();

    let meta = match database
        .by_code(&number.country().code())
        .and_then(|m| m.into_iter().next())
    {
        Some(meta) => meta,
        None => return national,
    };

    match formatter(&national, meta.formats()) {
        Some(format) => match format.domestic_carrier() {
            Some(rule) if carrier_code.map(|c| !c.is_empty()).unwrap_or(false) => {
                replace(&national, meta, format, Some(rule), carrier_code)
            }

            _ => {
                if let Some(prefix) = format.national_prefix() {
                    replace(&national, meta, format, Some(prefix), None)
                } else {
                    replace(&national, meta, format, None, None)
                }
            }
        },

        None => national,
    }
}

/// Render `number` the way it would be dialled from `from_region`: in
/// national format when the two regions share a NANPA country calling code
/// (dialling across NANPA only requires the national number), otherwise as
/// an international dial string using `from_region`'s international dialling
/// prefix (or "+" if none is on record).
pub fn format_out_of_country_calling_number(
    database: &Database,
    number: &PhoneNumber,
    from_region: country::Id,
) -> String {
    let cc = number.country().code();
    let from_meta = database.by_id(from_region.as_ref());
    let from_cc = from_meta.map(Metadata::country_code).unwrap_or(0);

    if cc == from_cc && validator::is_nanpa_country(database, from_region) {
        return format_with(database, number).mode(Mode::National).to_string();
    }

    let national = number.national().to_string();
    let formatted_national = match database.by_code(&cc).and_then(|m| m.into_iter().next()) {
        Some(meta) => {
            let formats = if meta.international_formats().is_empty() {
                meta.formats()
            } else {
                meta.international_formats()
            };

            match formatter(&national, formats) {
                Some(format) => replace(&national, meta, format, None, None),
                None => national,
            }
        }

        None => national,
    };

    let idd = from_meta
        .and_then(Metadata::preferred_international_prefix)
        .map(str::to_owned)
        .or_else(|| {
            from_meta
                .and_then(Metadata::international_prefix)
                .and_then(|re| literal_idd_prefix(re.as_str()))
        });

    let mut out = match idd {
        Some(idd) => format!("{} {} {}", idd, cc, formatted_national),
        None => format!("+{} {}", cc, formatted_national),
    };

    if let Some(ext) = number.extension() {
        out.push_str(
            from_meta
                .and_then(Metadata::preferred_extension_prefix)
                .unwrap_or(" ext. "),
        );
        out.push_str(ext);
    }

    out
}

/// As [`format_out_of_country_calling_number`], but re-applying the number's
/// chosen group separators to the alphanumeric [`PhoneNumber::raw_input`]
/// instead of the all-digit national number, so that vanity letters (e.g.
/// "1-800-FLOWERS") survive formatting. Falls back to
/// [`format_out_of_country_calling_number`] when there's no raw input to
/// work from, or its digit count doesn't match the national number (i.e. the
/// group boundaries can't be recovered).
pub fn format_out_of_country_keeping_alpha_chars(
    database: &Database,
    number: &PhoneNumber,
    from_region: country::Id,
) -> String {
    let fallback = || format_out_of_country_calling_number(database, number, from_region);

    let raw_input = match number.raw_input() {
        Some(raw) => raw,
        None => return fallback(),
    };

    let alnum: String = raw_input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    let national = number.national().to_string();
    let meta = match database
        .by_code(&number.country().code())
        .and_then(|m| m.into_iter().next())
    {
        Some(meta) => meta,
        None => return fallback(),
    };

    let format = match formatter(&national, meta.formats()) {
        Some(format) => format,
        None => return fallback(),
    };

    let group_lengths: Vec<usize> = match format.pattern().captures(&national) {
        Some(captures) => (1..captures.len())
            .map(|i| captures.get(i).map(|m| m.as_str().len()).unwrap_or(0))
            .collect(),
        None => return fallback(),
    };

    let total: usize = group_lengths.iter().sum();

    if total == 0 || total > alnum.len() {
        return fallback();
    }

    // The national number occupies the last `total` alphanumeric characters;
    // anything before it is the (already rendered) country code / national
    // prefix digits that out-of-country dialling replaces wholesale.
    let (_, national_alnum) = alnum.split_at(alnum.len() - total);

    let mut grouped = String::new();
    let mut rest = national_alnum;
    let separators = literal_separators(format.format());

    for (index, length) in group_lengths.iter().enumerate() {
        let (group, tail) = rest.split_at(*length);
        grouped.push_str(group);
        rest = tail;

        if let Some(separator) = separators.get(index) {
            grouped.push_str(separator);
        }
    }

    let cc = number.country().code();
    let from_meta = database.by_id(from_region.as_ref());
    let mut out = match from_meta.and_then(Metadata::preferred_international_prefix) {
        Some(idd) => format!("{} {} {}", idd, cc, grouped),
        None => format!("+{} {}", cc, grouped),
    };

    if let Some(ext) = number.extension() {
        out.push_str(
            from_meta
                .and_then(Metadata::preferred_extension_prefix)
                .unwrap_or(" ext. "),
        );
        out.push_str(ext);
    }

    out
}

/// The literal text between consecutive `$N` placeholders in a format
/// template, e.g. `"$1 $2-$3"` yields `[" ", "-"]`.
fn literal_separators(format: &str) -> Vec<&str> {
    consts::FIRST_GROUP
        .split(format)
        .skip(1)
        .collect()
}

/// If `pattern` describes a single fixed IDD prefix (no alternation or other
/// regex metacharacters beyond an anchor), return it as a plain string.
fn literal_idd_prefix(pattern: &str) -> Option<String> {
    let trimmed = pattern.trim_start_matches('^').trim_end_matches('$');

    if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() {
        Some(trimmed.to_owned())
    } else {
        None
    }
}

/// Render `number` the way its [`PhoneNumber::country_code_source`] implies
/// it was originally written, falling back to the bare national format if
/// the source isn't known (i.e. `number` wasn't parsed with
/// [`crate::parser::parse_and_keep_raw_input`]). Returns `raw_input`
/// unchanged if the number turns out not to be valid.
pub fn format_in_original_format(
    database: &Database,
    number: &PhoneNumber,
    from_region: country::Id,
) -> String {
    if !validator::is_valid_with(database, number) {
        if let Some(raw) = number.raw_input() {
            return raw.to_owned();
        }
    }

    match number.country_code_source() {
        Some(country::Source::Plus) => {
            format_with(database, number).mode(Mode::International).to_string()
        }

        Some(country::Source::Idd) => format_out_of_country_calling_number(database, number, from_region),

        Some(country::Source::Number) => {
            format!(
                "{}{}",
                number.country().code(),
                format_with(database, number).mode(Mode::National).to_string()
            )
        }

        Some(country::Source::Default) | None => {
            format_with(database, number).mode(Mode::National).to_string()
        }
    }
}

/// The length, in digits, of the "geographical area code" at the start of
/// `number`'s national significant number: the length of the first group in
/// its chosen national [`Format`], or 0 for regions/numbers that have no
/// concept of an area code (non-geographic numbers, NANPA numbers other than
/// toll-free/premium-rate, or numbers with no matching format).
pub fn length_of_geographical_area_code(database: &Database, number: &PhoneNumber) -> usize {
    use crate::phone_number::Type;

    let meta = match number.metadata(database) {
        Some(meta) => meta,
        None => return 0,
    };

    let national = number.national().to_string();

    // Geographic area codes only make sense for fixed-line (or
    // fixed-line-or-mobile) numbers; other types either have no area code
    // or, for NANPA, use the same format group for carrier routing rather
    // than geography.
    match validator::number_type(meta, &national) {
        Type::FixedLine | Type::FixedLineOrMobile => {}
        _ => return 0,
    }

    match formatter(&national, meta.formats()) {
        Some(format) => match format.pattern().captures(&national) {
            Some(captures) => captures.get(1).map(|m| m.as_str().len()).unwrap_or(0),
            None => 0,
        },

        None => 0,
    }
}

/// The length, in digits, of the "national destination code" -- the area
/// code for geographic numbers, or the equivalent leading group that routes
/// calls to a specific carrier/service for toll-free and other
/// non-geographic types. 0 when the number has no such group (fewer than two
/// groups in its chosen format).
pub fn length_of_national_destination_code(database: &Database, number: &PhoneNumber) -> usize {
    let meta = match number.metadata(database) {
        Some(meta) => meta,
        None => return 0,
    };

    let national = number.national().to_string();

    match formatter(&national, meta.formats()) {
        Some(format) => match format.pattern().captures(&national) {
            Some(captures) if captures.len() > 2 => {
                captures.get(1).map(|m| m.as_str().len()).unwrap_or(0)
            }

            _ => 0,
        },

        None => 0,
    }
}

#[cfg(test)]
mod test {
    use crate::country;
    use crate::formatter::Mode;
    use crate::parser;

    #[test]
    fn us() {
        assert_eq!(
            "(650) 253-0000",
            parser::parse(Some(country::US), "+1 6502530000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+1 650-253-0000",
            parser::parse(Some(country::US), "+1 6502530000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "(800) 253-0000",
            parser::parse(Some(country::US), "+1 8002530000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+1 800-253-0000",
            parser::parse(Some(country::US), "+1 8002530000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "(900) 253-0000",
            parser::parse(Some(country::US), "+1 9002530000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+1 900-253-0000",
            parser::parse(Some(country::US), "+1 9002530000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "tel:+1-900-253-0000",
            parser::parse(Some(country::US), "+1 9002530000")
                .unwrap()
                .format()
                .mode(Mode::Rfc3966)
                .to_string()
        );
    }

    #[test]
    fn gb() {
        assert_eq!(
            "020 7031 3000",
            parser::parse(Some(country::GB), "+44 2070313000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+44 20 7031 3000",
            parser::parse(Some(country::GB), "+44 2070313000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "020 7031 3000",
            parser::parse(Some(country::GB), "+44 2070313000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "07912 345678",
            parser::parse(Some(country::GB), "+44 7912345678")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+44 7912 345678",
            parser::parse(Some(country::GB), "+44 7912345678")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );
    }

    #[test]
    fn carrier_code_br() {
        use crate::metadata::DATABASE;

        let number = parser::parse(Some(country::BR), "012 3121286979").unwrap();

        assert_eq!(
            "015 2128-6979",
            number.format_with_carrier_code(&DATABASE, "15")
        );

        assert_eq!(
            "012 2128-6979",
            number.format_national_number_with_preferred_carrier_code(&DATABASE, "99")
        );
    }

    #[test]
    fn original_format_round_trips_plus_and_national() {
        use crate::metadata::DATABASE;
        use crate::parser::parse_and_keep_raw_input;

        let plus = parse_and_keep_raw_input(Some(country::GB), "+442087654321").unwrap();
        assert_eq!(
            "+44 20 8765 4321",
            plus.format_in_original_format(&DATABASE, country::GB)
        );

        let national = parse_and_keep_raw_input(Some(country::GB), "02087654321").unwrap();
        assert_eq!(
            "020 8765 4321",
            national.format_in_original_format(&DATABASE, country::GB)
        );
    }

    #[test]
    fn out_of_country_calling_number_uses_idd() {
        use crate::metadata::DATABASE;

        let number = parser::parse(Some(country::GB), "+442087654321").unwrap();
        assert_eq!(
            "011 44 20 8765 4321",
            number.format_out_of_country_calling_number(&DATABASE, country::US)
        );
    }

    #[test]
    fn out_of_country_calling_number_within_nanpa_is_national() {
        use crate::metadata::DATABASE;

        let number = parser::parse(Some(country::US), "+16502530000").unwrap();
        assert_eq!(
            "(650) 253-0000",
            number.format_out_of_country_calling_number(&DATABASE, country::CA)
        );
    }

    #[test]
    fn geographical_area_code_lengths() {
        use crate::metadata::DATABASE;

        let us = parser::parse(Some(country::US), "+16502530000").unwrap();
        assert_eq!(3, us.length_of_geographical_area_code(&DATABASE));
        assert_eq!(3, us.length_of_national_destination_code(&DATABASE));

        let toll_free = parser::parse(None, "+80012340000").unwrap();
        assert_eq!(0, toll_free.length_of_geographical_area_code(&DATABASE));
    }

    #[test]
    fn by_pattern_uses_caller_supplied_formats() {
        use crate::formatter::format_by_pattern;
        use crate::metadata::DATABASE;

        let number = parser::parse(Some(country::GB), "+44 20 8765 4321").unwrap();
        let meta = DATABASE.by_id("GB").unwrap();

        assert_eq!(
            number.format_with(&DATABASE).mode(Mode::National).to_string(),
            format_by_pattern(&DATABASE, &number, meta.formats())
        );
    }
}
