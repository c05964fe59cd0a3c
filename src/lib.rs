//! Parsing, formatting, validating and classifying international phone
//! numbers against a per-region numbering-plan metadata corpus.

#[cfg(test)]
#[macro_use]
extern crate rstest_reuse;

#[macro_use]
mod macros;

pub mod error;
pub use error::ParseError;

pub mod metadata;
pub use metadata::Metadata;

mod national_number;
pub use national_number::NationalNumber;

pub mod country;

mod carrier;
pub use carrier::Carrier;

mod extension;
pub use extension::Extension;

mod phone_number;
pub use phone_number::{PhoneNumber, Type};

pub mod formatter;
pub use formatter::Mode;

pub mod validator;
pub use validator::Validation;

pub mod normalizer;

pub mod matcher;
pub use matcher::Match;

pub mod as_you_type;
pub use as_you_type::AsYouType;

pub mod short_number;
pub use short_number::ShortNumberInfo;

pub mod mobile_dialing;
pub use mobile_dialing::format_number_for_mobile_dialing;

mod parser;
pub use parser::{parse, parse_and_keep_raw_input, parse_and_keep_raw_input_with, parse_with};

mod consts;

