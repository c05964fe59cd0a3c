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

//! Classification of short numbers (emergency numbers, carrier-specific
//! codes, SMS short codes, …) against an independent metadata corpus.

use fnv::FnvHashSet;
use lazy_static::lazy_static;

use crate::country;
use crate::metadata::{Database, Metadata, SHORT_DATABASE};
use crate::normalizer;
use crate::phone_number::PhoneNumber;

lazy_static! {
    /// Regions where an emergency number must match the described pattern
    /// exactly; elsewhere, a leading prefix match is also accepted.
    static ref EXACT_MATCH_EMERGENCY_NUMBER_REGIONS: FnvHashSet<&'static str> = {
        let mut set = FnvHashSet::default();
        set.insert("BR");
        set.insert("CL");
        set.insert("NI");
        set
    };
}

/// Expected cost category of dialing a short number.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cost {
    PremiumRate,
    StandardRate,
    TollFree,
    Unknown,
}

impl Cost {
    fn rank(self) -> u8 {
        match self {
            Cost::PremiumRate => 3,
            Cost::Unknown => 2,
            Cost::StandardRate => 1,
            Cost::TollFree => 0,
        }
    }
}

/// Entry point for short-number/emergency-number classification, backed by
/// its own metadata corpus (distinct from the main numbering-plan one).
pub struct ShortNumberInfo<'d> {
    database: &'d Database,
}

impl<'d> Default for ShortNumberInfo<'d> {
    fn default() -> Self {
        ShortNumberInfo {
            database: &SHORT_DATABASE,
        }
    }
}

impl<'d> ShortNumberInfo<'d> {
    /// Create a `ShortNumberInfo` backed by a specific short-number
    /// `Database`.
    pub fn with_database(database: &'d Database) -> Self {
        ShortNumberInfo { database }
    }

    fn regions_for(&self, number: &PhoneNumber) -> Vec<&Metadata> {
        self.database
            .by_code(&number.code().value())
            .unwrap_or_default()
    }

    fn metadata_for_region(&self, region: country::Id) -> Option<&Metadata> {
        self.database.by_id(region.as_ref())
    }

    /// Whether the number's length is plausible for a short number in any
    /// region that shares its country calling code.
    pub fn is_possible_short_number(&self, number: &PhoneNumber) -> bool {
        self.regions_for(number)
            .into_iter()
            .any(|meta| length_is_possible(meta, number))
    }

    /// Whether the number's length is plausible for a short number in the
    /// given region.
    pub fn is_possible_short_number_for_region(
        &self,
        number: &PhoneNumber,
        region: country::Id,
    ) -> bool {
        self.metadata_for_region(region)
            .map(|meta| length_is_possible(meta, number))
            .unwrap_or(false)
    }

    /// Whether the number matches a general-description pattern for a
    /// short number in any region sharing its country calling code.
    pub fn is_valid_short_number(&self, number: &PhoneNumber) -> bool {
        self.regions_for(number).into_iter().any(|meta| {
            let national = number.national().to_string();
            meta.descriptors().general().is_match(&national)
        })
    }

    /// Whether the number matches a general-description pattern for a
    /// short number in the given region.
    pub fn is_valid_short_number_for_region(&self, number: &PhoneNumber, region: country::Id) -> bool {
        self.metadata_for_region(region)
            .map(|meta| {
                let national = number.national().to_string();
                meta.descriptors().general().is_match(&national)
            })
            .unwrap_or(false)
    }

    /// The expected cost of calling the number, across all regions sharing
    /// its country calling code (the highest cost wins when several
    /// regions disagree).
    pub fn expected_cost(&self, number: &PhoneNumber) -> Cost {
        self.regions_for(number)
            .into_iter()
            .map(|meta| cost_in(meta, number))
            .max_by_key(|cost| cost.rank())
            .unwrap_or(Cost::Unknown)
    }

    /// The expected cost of calling the number, restricted to a specific
    /// region.
    pub fn expected_cost_for_region(&self, number: &PhoneNumber, region: country::Id) -> Cost {
        self.metadata_for_region(region)
            .map(|meta| cost_in(meta, number))
            .unwrap_or(Cost::Unknown)
    }

    /// Whether the textual input, interpreted in the given region, would
    /// connect to an emergency number, tolerating a prefix match except in
    /// regions that require an exact match.
    pub fn connects_to_emergency_number(&self, input: &str, region: country::Id) -> bool {
        self.matches_emergency_number(input, region, true)
    }

    /// Whether the textual input, interpreted in the given region, is
    /// itself an emergency number (no prefix-match tolerance).
    pub fn is_emergency_number(&self, input: &str, region: country::Id) -> bool {
        self.matches_emergency_number(input, region, false)
    }

    fn matches_emergency_number(&self, input: &str, region: country::Id, allow_prefix_match: bool) -> bool {
        let possible = normalizer::extract_possible_number(input);

        if possible.starts_with('+') || possible.starts_with('\u{FF0B}') {
            return false;
        }

        let meta = match self.metadata_for_region(region) {
            Some(meta) => meta,
            None => return false,
        };

        let emergency = match meta.descriptors().emergency() {
            Some(desc) => desc,
            None => return false,
        };

        let national = normalizer::normalize_digits_only(&possible);

        if emergency.is_match(&national) {
            return true;
        }

        if allow_prefix_match && !EXACT_MATCH_EMERGENCY_NUMBER_REGIONS.contains(region.as_ref()) {
            if let Some(found) = emergency.national_number().find(&national) {
                return found.start() == 0;
            }
        }

        false
    }

    /// Whether the number matches a carrier-specific-number pattern, in
    /// any region sharing its country calling code.
    pub fn is_carrier_specific(&self, number: &PhoneNumber) -> bool {
        self.regions_for(number).into_iter().any(|meta| {
            meta.descriptors()
                .carrier()
                .map(|d| d.is_match(&number.national().to_string()))
                .unwrap_or(false)
        })
    }

    /// Whether the number matches a carrier-specific-number pattern in the
    /// given region.
    pub fn is_carrier_specific_for_region(&self, number: &PhoneNumber, region: country::Id) -> bool {
        self.metadata_for_region(region)
            .and_then(|meta| meta.descriptors().carrier())
            .map(|d| d.is_match(&number.national().to_string()))
            .unwrap_or(false)
    }

    /// Whether the number is an SMS-service short code in the given region,
    /// matched against that region's `smsServices` descriptor.
    pub fn is_sms_service_for_region(&self, number: &PhoneNumber, region: country::Id) -> bool {
        self.metadata_for_region(region)
            .and_then(|meta| meta.descriptors().sms_services())
            .map(|d| d.is_match(&number.national().to_string()))
            .unwrap_or(false)
    }

    /// An example short number for `region`, if the metadata records one.
    /// Tries the general description first, then falls back to any other
    /// descriptor (emergency, carrier-specific, SMS, cost category) that
    /// carries an example.
    pub fn example_short_number(&self, region: country::Id) -> Option<String> {
        let meta = self.metadata_for_region(region)?;
        let descriptors = meta.descriptors();

        descriptors
            .general()
            .example()
            .or_else(|| descriptors.toll_free().and_then(|d| d.example()))
            .or_else(|| descriptors.premium_rate().and_then(|d| d.example()))
            .or_else(|| descriptors.standard_rate().and_then(|d| d.example()))
            .or_else(|| descriptors.carrier().and_then(|d| d.example()))
            .or_else(|| descriptors.short_code().and_then(|d| d.example()))
            .or_else(|| descriptors.emergency().and_then(|d| d.example()))
            .map(String::from)
    }

    /// An example short number for `region` in the given cost category, if
    /// the metadata records one.
    pub fn example_short_number_for_cost(&self, region: country::Id, cost: Cost) -> Option<String> {
        let meta = self.metadata_for_region(region)?;

        let descriptor = match cost {
            Cost::PremiumRate => meta.descriptors().premium_rate(),
            Cost::StandardRate => meta.descriptors().standard_rate(),
            Cost::TollFree => meta.descriptors().toll_free(),
            Cost::Unknown => None,
        };

        descriptor.and_then(|d| d.example()).map(String::from)
    }
}

fn length_is_possible(meta: &Metadata, number: &PhoneNumber) -> bool {
    let length = number.national().to_string().len() as u16;
    let general = meta.descriptors().general();

    general.possible_length().contains(&length)
}

fn cost_in(meta: &Metadata, number: &PhoneNumber) -> Cost {
    let national = number.national().to_string();

    if meta
        .descriptors()
        .premium_rate()
        .map(|d| d.is_match(&national))
        .unwrap_or(false)
    {
        return Cost::PremiumRate;
    }

    if meta
        .descriptors()
        .standard_rate()
        .map(|d| d.is_match(&national))
        .unwrap_or(false)
    {
        return Cost::StandardRate;
    }

    if meta
        .descriptors()
        .toll_free()
        .map(|d| d.is_match(&national))
        .unwrap_or(false)
    {
        return Cost::TollFree;
    }

    Cost::Unknown
}

/// Convenience: is the textual input, interpreted in the given region, an
/// emergency number? Equivalent to `ShortNumberInfo::default().is_emergency_number(...)`.
pub fn is_emergency_number(input: &str, region: country::Id) -> bool {
    ShortNumberInfo::default().is_emergency_number(input, region)
}

/// Convenience: does the textual input, interpreted in the given region,
/// connect to an emergency number?
pub fn connects_to_emergency_number(input: &str, region: country::Id) -> bool {
    ShortNumberInfo::default().connects_to_emergency_number(input, region)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::country;

    #[test]
    fn connects_to_emergency_number_us() {
        assert!(connects_to_emergency_number("9-1-1", country::US));
        assert!(!is_emergency_number("9116666666", country::US));
    }

    #[test]
    fn exact_match_required_in_br() {
        assert!(!connects_to_emergency_number("1900", country::BR));
        assert!(connects_to_emergency_number("190", country::BR));
    }

    #[test]
    fn rejects_plus_prefixed_input() {
        assert!(!connects_to_emergency_number("+911", country::US));
    }

    #[test]
    fn sms_service_matches_distinct_descriptor_not_short_code() {
        use crate::parser;

        let info = ShortNumberInfo::default();

        let sms = parser::parse(Some(country::US), "40404").unwrap();
        assert!(info.is_sms_service_for_region(&sms, country::US));

        let emergency = parser::parse(Some(country::US), "911").unwrap();
        assert!(!info.is_sms_service_for_region(&emergency, country::US));
    }

    #[test]
    fn example_short_number_is_present_for_us() {
        let info = ShortNumberInfo::default();
        let example = info.example_short_number(country::US);

        assert!(example.is_some());
    }

    #[test]
    fn example_short_number_for_cost_matches_category() {
        let info = ShortNumberInfo::default();

        if let Some(example) = info.example_short_number_for_cost(country::US, Cost::TollFree) {
            assert!(!example.is_empty());
        }

        assert!(info
            .example_short_number_for_cost(country::US, Cost::Unknown)
            .is_none());
    }
}
