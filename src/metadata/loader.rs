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

use std::str;
use std::io::BufRead;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

use serde_derive::{Deserialize, Serialize};

use crate::error;

/// Temporary defaults for `Format` and `Descriptor`.
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Defaults {
	format:     Format,
	descriptor: Descriptor,
}

/// Parsed version of `metadata::Metadata`.
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Metadata {
	pub general:          Option<Descriptor>,
	pub fixed_line:       Option<Descriptor>,
	pub mobile:           Option<Descriptor>,
	pub toll_free:        Option<Descriptor>,
	pub premium_rate:     Option<Descriptor>,
	pub shared_cost:      Option<Descriptor>,
	pub personal_number:  Option<Descriptor>,
	pub voip:             Option<Descriptor>,
	pub pager:            Option<Descriptor>,
	pub uan:              Option<Descriptor>,
	pub emergency:        Option<Descriptor>,
	pub voicemail:        Option<Descriptor>,
	pub short_code:       Option<Descriptor>,
	pub standard_rate:    Option<Descriptor>,
	pub carrier:          Option<Descriptor>,
	pub no_international: Option<Descriptor>,
	pub sms_services:     Option<Descriptor>,

	pub id:           Option<String>,
	pub country_code: Option<u16>,

	pub international_prefix:           Option<String>,
	pub preferred_international_prefix: Option<String>,
	pub national_prefix:                Option<String>,
	pub preferred_extension_prefix:     Option<String>,

	pub national_prefix_for_parsing: Option<String>,
	pub national_prefix_transform_rule: Option<String>,

	pub formats:               Vec<Format>,
	pub international_formats: Vec<Format>,

	pub main_country_for_code: bool,
	pub leading_digits: Option<String>,
	pub mobile_number_portable: bool,
	pub leading_zero_possible: bool,

	pub defaults: Defaults,
}

/// Parsed version of `metadata::Format`.
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Format {
	pub pattern: Option<String>,
	pub format: Option<String>,
	pub leading_digits: Vec<String>,
	pub national_prefix_formatting_rule: Option<String>,
	pub national_prefix_optional_when_formatting: bool,
	pub domestic_carrier: Option<String>,
}

/// Parsed version of `metadata::Descriptor`.
#[derive(Clone, Default, Serialize, Deserialize, Debug)]
pub struct Descriptor {
	pub national_number: Option<String>,
	pub possible_length: Vec<u16>,
	pub possible_local_length: Vec<u16>,
	pub example: Option<String>,
}

/// Load XML metadata from the given reader.
pub fn load<R: BufRead>(reader: R) -> Result<Vec<Metadata>, error::LoadMetadata> {
	metadata(&mut Reader::from_reader(reader))
}

fn name_eq(name: QName, expected: &[u8]) -> bool {
	name.as_ref() == expected
}

fn metadata<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<Metadata>, error::LoadMetadata> {
	let mut buffer = Vec::new();
	let mut result = Vec::new();

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) |
			Event::DocType(_) |
			Event::Decl(_) =>
				(),

			Event::Start(ref e) => {
				match e.name().as_ref() {
					b"phoneNumberMetadata" =>
						continue,

					b"territories" =>
						result.extend(territories(reader)?),

					name =>
						ignore(reader, name)?,
				}
			}

			Event::End(ref e) if !name_eq(e.name(), b"phoneNumberMetadata") =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::End(ref e) if name_eq(e.name(), b"phoneNumberMetadata") =>
				return Ok(result),

			Event::Eof =>
				return Ok(result),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "metadata".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn territories<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<Metadata>, error::LoadMetadata> {
	let mut buffer = Vec::new();
	let mut result = Vec::new();

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) =>
				(),

			Event::Start(ref e) => {
				match e.name().as_ref() {
					b"territory" =>
						result.push(territory(reader, e)?),

					name =>
						ignore(reader, name)?,
				}
			}

			Event::End(ref e) if name_eq(e.name(), b"territories") =>
				return Ok(result),

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "territories".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn territory<R: BufRead>(reader: &mut Reader<R>, e: &quick_xml::events::BytesStart) -> Result<Metadata, error::LoadMetadata> {
	let mut buffer = Vec::new();
	let mut meta   = Metadata::default();

	for attr in e.attributes() {
		let Attribute { key, value } = attr?;

		match (str::from_utf8(key.as_ref())?, str::from_utf8(&value)?) {
			("id", value) =>
				meta.id = Some(value.into()),

			("countryCode", value) =>
				meta.country_code = Some(value.parse()?),

			("internationalPrefix", value) =>
				meta.international_prefix = Some(check_regex(value)?.into()),

			("preferredInternationalPrefix", value) =>
				meta.preferred_international_prefix = Some(value.into()),

			("nationalPrefix", value) =>
				meta.national_prefix = Some(value.into()),

			("preferredExtnPrefix", value) =>
				meta.preferred_extension_prefix = Some(value.into()),

			("nationalPrefixForParsing", value) =>
				meta.national_prefix_for_parsing = Some(check_regex(value)?.into()),

			("nationalPrefixTransformRule", value) =>
				meta.national_prefix_transform_rule = Some(value.into()),

			("mainCountryForCode", value) =>
				meta.main_country_for_code = value.parse()?,

			("leadingDigits", value) =>
				meta.leading_digits = Some(check_regex(value)?.into()),

			("mobileNumberPortableRegion", value) =>
				meta.mobile_number_portable = value.parse()?,

			("leadingZeroPossible", value) =>
				meta.leading_zero_possible = value.parse()?,

			("nationalPrefixFormattingRule", value) =>
				meta.defaults.format.national_prefix_formatting_rule = Some(value.into()),

			("nationalPrefixOptionalWhenFormatting", value) =>
				meta.defaults.format.national_prefix_optional_when_formatting = value.parse()?,

			("carrierCodeFormattingRule", value) =>
				meta.defaults.format.domestic_carrier = Some(value.into()),

			(name, value) =>
				return Err(error::Metadata::UnhandledAttribute {
					phase: "format".into(),
					name:  name.into(),
					value: value.into()
				}.into())
		}
	}

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) =>
				(),

			Event::Start(ref e) => {
				let name = e.name();

				match name.as_ref() {
					b"references" |
					b"areaCodeOptional" =>
						ignore(reader, name.as_ref())?,

					b"generalDesc" =>
						meta.general = Some(descriptor(reader, &meta, name.as_ref())?),

					b"fixedLine" =>
						meta.fixed_line = Some(descriptor(reader, &meta, name.as_ref())?),

					b"mobile" =>
						meta.mobile = Some(descriptor(reader, &meta, name.as_ref())?),

					b"tollFree" =>
						meta.toll_free = Some(descriptor(reader, &meta, name.as_ref())?),

					b"premiumRate" =>
						meta.premium_rate = Some(descriptor(reader, &meta, name.as_ref())?),

					b"sharedCost" =>
						meta.shared_cost = Some(descriptor(reader, &meta, name.as_ref())?),

					b"personalNumber" =>
						meta.personal_number = Some(descriptor(reader, &meta, name.as_ref())?),

					b"voip" =>
						meta.voip = Some(descriptor(reader, &meta, name.as_ref())?),

					b"pager" =>
						meta.pager = Some(descriptor(reader, &meta, name.as_ref())?),

					b"uan" =>
						meta.uan = Some(descriptor(reader, &meta, name.as_ref())?),

					b"emergency" =>
						meta.emergency = Some(descriptor(reader, &meta, name.as_ref())?),

					b"voicemail" =>
						meta.voicemail = Some(descriptor(reader, &meta, name.as_ref())?),

					b"shortCode" =>
						meta.short_code = Some(descriptor(reader, &meta, name.as_ref())?),

					b"standardRate" =>
						meta.standard_rate = Some(descriptor(reader, &meta, name.as_ref())?),

					b"carrierSpecific" =>
						meta.carrier = Some(descriptor(reader, &meta, name.as_ref())?),

					b"smsServices" =>
						meta.sms_services = Some(descriptor(reader, &meta, name.as_ref())?),

					b"noInternationalDialling" =>
						meta.no_international = Some(descriptor(reader, &meta, name.as_ref())?),

					b"availableFormats" => {
						let (national, international) = formats(reader, &meta, name.as_ref())?;

						meta.formats               = national;
						meta.international_formats = international;
					}

					_ =>
						return Err(error::Metadata::UnhandledElement {
							phase: "territory".into(),
							name:  str::from_utf8(name.as_ref())?.into(),
						}.into())
				}
			}

			Event::End(ref e) if name_eq(e.name(), b"territory") =>
				return Ok(meta),

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "territory".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn descriptor<R: BufRead>(reader: &mut Reader<R>, meta: &Metadata, name: &[u8]) -> Result<Descriptor, error::LoadMetadata> {
	let mut buffer     = Vec::new();
	let mut descriptor = meta.defaults.descriptor.clone();

	fn lengths(value: &str) -> Result<Vec<u16>, error::LoadMetadata> {
		let mut result = Vec::new();

		for part in value.split(',').map(str::trim) {
			if part.as_bytes()[0] == b'[' {
				let mut parts = part.split('-');

				if let (Some(start), Some(end)) = (parts.next(), parts.next()) {
					let start = start[1 ..].parse::<u16>()?;
					let end   = end[.. end.len() - 1].parse::<u16>()?;

					for i in start .. end + 1 {
						result.push(i);
					}
				}
			}
			else {
				result.push(part.parse()?);
			}
		}

		Ok(result)
	}

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) =>
				(),

			Event::Start(ref e) => {
				let inner = e.name();

				match inner.as_ref() {
					b"nationalNumberPattern" =>
						descriptor.national_number = Some(text_check_regex(reader, inner.as_ref())?),

					b"exampleNumber" =>
						descriptor.example = Some(text(reader, inner.as_ref())?),

					_ =>
						return Err(error::Metadata::UnhandledElement {
							phase: "descriptor".into(),
							name:  str::from_utf8(inner.as_ref())?.into(),
						}.into())
				}
			}

			Event::Empty(ref e) => {
				match e.name().as_ref() {
					b"possibleLengths" => {
						for attr in e.attributes() {
							let Attribute { key, value } = attr?;

							match (str::from_utf8(key.as_ref())?, str::from_utf8(&value)?) {
								("national", value) =>
									descriptor.possible_length = lengths(value)?,

								("localOnly", value) =>
									descriptor.possible_local_length = lengths(value)?,

								(name, value) =>
									return Err(error::Metadata::UnhandledAttribute {
										phase: "descriptor::possibleLength".into(),
										name:  name.into(),
										value: value.into()
									}.into())

							}
						}
					}

					other =>
						return Err(error::Metadata::UnhandledElement {
							phase: "descriptor".into(),
							name:  str::from_utf8(other)?.into(),
						}.into())
				}
			}

			Event::End(ref e) if name_eq(e.name(), name) =>
				return Ok(descriptor),

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "descriptor".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn formats<R: BufRead>(reader: &mut Reader<R>, meta: &Metadata, name: &[u8]) -> Result<(Vec<Format>, Vec<Format>), error::LoadMetadata> {
	let mut buffer        = Vec::new();
	let mut national      = Vec::new();
	let mut international = Vec::new();

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) =>
				(),

			Event::Start(ref e) => {
				let inner = e.name();

				match inner.as_ref() {
					b"numberFormat" => {
						let (natl, intl) = format(reader, meta, inner.as_ref(), e)?;

						national.push(natl);

						if let Some(intl) = intl {
							international.push(intl);
						}
					}

					_ =>
						return Err(error::Metadata::UnhandledElement {
							phase: "formats".into(),
							name:  str::from_utf8(inner.as_ref())?.into(),
						}.into())
				}
			}

			Event::End(ref e) if name_eq(e.name(), name) =>
				return Ok((national, international)),

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "formats".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn format<R: BufRead>(reader: &mut Reader<R>, meta: &Metadata, name: &[u8], e: &quick_xml::events::BytesStart) -> Result<(Format, Option<Format>), error::LoadMetadata> {
	let mut buffer = Vec::new();

	let mut format        = meta.defaults.format.clone();
	let mut international = None;

	for attr in e.attributes() {
		let Attribute { key, value } = attr?;

		match (str::from_utf8(key.as_ref())?, str::from_utf8(&value)?) {
			("pattern", value) =>
				format.pattern = Some(check_regex(value)?.into()),

			("nationalPrefixFormattingRule", value) =>
				format.national_prefix_formatting_rule = Some(value.into()),

			("nationalPrefixOptionalWhenFormatting", value) =>
				format.national_prefix_optional_when_formatting = value.parse()?,

			("carrierCodeFormattingRule", value) =>
				format.domestic_carrier = Some(value.into()),

			(name, value) =>
				return Err(error::Metadata::UnhandledAttribute {
					phase: "format".into(),
					name:  name.into(),
					value: value.into()
				}.into())
		}
	}

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) =>
				(),

			Event::Start(ref e) => {
				let inner = e.name();

				match inner.as_ref() {
					b"leadingDigits" =>
						format.leading_digits.push(text_check_regex(reader, inner.as_ref())?),

					b"format" => {
						let text = text(reader, inner.as_ref())?;

						format.format = Some(text.clone());
						international = Some(text);
					}

					b"intlFormat" => {
						let text = text(reader, inner.as_ref())?;

						if text == "NA" {
							international = None;
						}
						else {
							international = Some(text);
						}
					}

					_ =>
						return Err(error::Metadata::UnhandledElement {
							phase: "format".into(),
							name:  str::from_utf8(inner.as_ref())?.into(),
						}.into())
				}
			}

			Event::End(ref e) if name_eq(e.name(), name) => {
				let international = international.map(|v| {
					let mut format = format.clone();
					format.format = Some(v);
					format
				});

				return Ok((format, international));
			}

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "format".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn ignore<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<(), error::LoadMetadata> {
	let mut buffer = Vec::new();

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(_) |
			Event::Comment(_) |
			Event::Empty(_) =>
				(),

			Event::Start(ref e) =>
				ignore(reader, e.name().as_ref())?,

			Event::End(ref e) if name_eq(e.name(), name) =>
				return Ok(()),

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "ignore".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn text<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<String, error::LoadMetadata> {
	let mut buffer = Vec::new();
	let mut result = String::new();

	loop {
		match reader.read_event_into(&mut buffer)? {
			Event::Text(ref e) =>
				result.push_str(&e.unescape()?),

			Event::End(ref e) if name_eq(e.name(), name) =>
				return Ok(result),

			Event::End(ref e) =>
				return Err(error::Metadata::MismatchedTag(
					str::from_utf8(e.name().as_ref())?.into()).into()),

			Event::Eof =>
				return Err(error::Metadata::UnexpectedEof.into()),

			event =>
				return Err(error::Metadata::UnhandledEvent {
					phase: "text".into(),
					event: format!("{:?}", event),
				}.into())
		}

		buffer.clear();
	}
}

fn text_check_regex<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<String, error::LoadMetadata> {
	let regex_source = text(reader, name)?;
	// check regular expression syntax
	check_regex(&regex_source)?;
	Ok(regex_source)
}

fn check_regex(regex_source: &str) -> Result<&str, error::LoadMetadata> {
	// Regex::new both validates syntax and would be recompiled at runtime
	// anyway; no separate syntax-only checker is needed.
	regex::Regex::new(regex_source).map_err(error::LoadMetadata::RegexSyntax)?;
	Ok(regex_source)
}
