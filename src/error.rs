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

use std::num::ParseIntError;
use std::str::Utf8Error;
use thiserror::Error;

/// Errors raised while decoding a metadata XML document, either at build
/// time or by a caller supplying an alternative `Database`.
#[derive(Error, Clone, Debug)]
pub enum Metadata {
    /// EOF was reached before the parsing was complete.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// A mismatched tag was met.
    #[error("mismatched tag: {0}")]
    MismatchedTag(String),

    /// A required value was missing.
    #[error("{phase}: missing value: {name}")]
    MissingValue { phase: String, name: String },

    /// An element was not handled.
    #[error("{phase}: unhandled element: {name}")]
    UnhandledElement { phase: String, name: String },

    /// An attribute was not handled.
    #[error("{phase}: unhandled attribute: {name}={value}")]
    UnhandledAttribute {
        phase: String,
        name: String,
        value: String,
    },

    /// An event was not handled.
    #[error("{phase}: unhandled event: {event}")]
    UnhandledEvent { phase: String, event: String },
}

/// Errors raised while loading a `Database` from XML, either via `build.rs`
/// or via `Database::load`/`Database::parse`. This never surfaces through
/// the number parsing/formatting/validation API, which only ever consumes
/// an already-decoded `Database`.
#[derive(Error, Debug)]
pub enum LoadMetadata {
    #[error(transparent)]
    Metadata(#[from] Metadata),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Utf8(#[from] Utf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error(transparent)]
    ParseBool(#[from] std::str::ParseBoolError),

    #[error("invalid regular expression: {0}")]
    RegexSyntax(#[from] regex::Error),
}

/// Errors raised while parsing a textual phone number.
#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum ParseError {
    /// This generally indicates the string passed in had less than 3 digits
    /// in it.
    #[error("not a number")]
    NotANumber,

    /// This indicates the string started with an international dialing
    /// prefix, but after this was stripped from the number, had less
    /// digits than any valid phone number (including country code) could
    /// have.
    #[error("the number is too short after IDD")]
    TooShortAfterIdd,

    /// This indicates the string, after any country code has been
    /// stripped, had less digits than any valid phone number could have.
    #[error("the number is too short after the country code")]
    TooShortNsn,

    /// This indicates the string had more digits than any valid phone
    /// number could have.
    #[error("the number is too long")]
    TooLong,

    /// The country code supplied did not belong to a supported country or
    /// non-geographical entity.
    #[error("invalid country code")]
    InvalidCountryCode,

    /// The mobile network code portion of a carrier identifier could not
    /// be parsed.
    #[error("invalid network code")]
    InvalidNetworkCode,
}

impl From<ParseIntError> for ParseError {
    fn from(_: ParseIntError) -> Self {
        ParseError::NotANumber
    }
}
