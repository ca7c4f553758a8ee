use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities;
use crate::genres::{Genres, is_known_genre};
use crate::services::artist::ArtistInput;
use crate::services::show::ShowInput;
use crate::services::venue::VenueInput;

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-?\d{3}-?\d{4}$").expect("valid phone regex"));

/// Validation messages keyed by form field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        Self(fields)
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn required(
    value: &str,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(invalid(code, message))
    } else {
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    required(name, "name", "Name is required")
}

fn validate_city(city: &str) -> Result<(), ValidationError> {
    required(city, "city", "City is required")
}

fn validate_address(address: &str) -> Result<(), ValidationError> {
    required(address, "address", "Address is required")
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    if STATE_CHOICES.contains(&state) {
        Ok(())
    } else {
        Err(invalid("state", "Choose a valid state"))
    }
}

fn validate_genres(genres: &[String]) -> Result<(), ValidationError> {
    if genres.iter().all(|g| is_known_genre(g)) {
        Ok(())
    } else {
        Err(invalid("genres", "Choose genres from the list"))
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() || PHONE_REGEX.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(invalid("phone", "Phone must look like 123-456-7890"))
    }
}

/// Links are rendered as `href`s, so only `http(s)://host` URLs are accepted
fn is_web_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || is_web_url(value.trim()) {
        Ok(())
    } else {
        Err(invalid("url", "Enter a full URL, e.g. https://example.com"))
    }
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]` and the `datetime-local` input format, as UTC
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| !v.is_empty() && v != "n" && v != "false")
}

fn checked(flag: bool) -> Option<String> {
    flag.then(|| "y".to_string())
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct VenueForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_city"))]
    pub city: String,
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    #[validate(custom(function = "validate_address"))]
    pub address: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(custom(function = "validate_optional_url"))]
    pub image_link: String,
    #[validate(
        length(min = 1, message = "Choose at least one genre"),
        custom(function = "validate_genres")
    )]
    pub genres: Vec<String>,
    #[validate(custom(function = "validate_optional_url"))]
    pub facebook_link: String,
    #[validate(custom(function = "validate_optional_url"))]
    pub website: String,
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn is_seeking_talent(&self) -> bool {
        checkbox(&self.seeking_talent)
    }

    /// Validate the submission and convert it to service input
    pub fn validated(self) -> Result<VenueInput, FormErrors> {
        self.validate()?;
        let seeking_talent = self.is_seeking_talent();

        Ok(VenueInput {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state,
            address: self.address.trim().to_string(),
            phone: optional(self.phone),
            genres: Genres::new(self.genres),
            website: optional(self.website),
            seeking_talent,
            seeking_description: optional(self.seeking_description),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
        })
    }
}

impl From<&entities::venue::Model> for VenueForm {
    fn from(venue: &entities::venue::Model) -> Self {
        let input = VenueInput::from(venue);
        Self {
            name: input.name,
            city: input.city,
            state: input.state,
            address: input.address,
            phone: input.phone.unwrap_or_default(),
            image_link: input.image_link.unwrap_or_default(),
            genres: input.genres.into_vec(),
            facebook_link: input.facebook_link.unwrap_or_default(),
            website: input.website.unwrap_or_default(),
            seeking_talent: checked(input.seeking_talent),
            seeking_description: input.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ArtistForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_city"))]
    pub city: String,
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(custom(function = "validate_optional_url"))]
    pub image_link: String,
    #[validate(
        length(min = 1, message = "Choose at least one genre"),
        custom(function = "validate_genres")
    )]
    pub genres: Vec<String>,
    #[validate(custom(function = "validate_optional_url"))]
    pub facebook_link: String,
    #[validate(custom(function = "validate_optional_url"))]
    pub website: String,
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn is_seeking_venue(&self) -> bool {
        checkbox(&self.seeking_venue)
    }

    pub fn validated(self) -> Result<ArtistInput, FormErrors> {
        self.validate()?;
        let seeking_venue = self.is_seeking_venue();

        Ok(ArtistInput {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state,
            phone: optional(self.phone),
            genres: Genres::new(self.genres),
            seeking_venue,
            seeking_description: optional(self.seeking_description),
            website: optional(self.website),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
        })
    }
}

impl From<&entities::artist::Model> for ArtistForm {
    fn from(artist: &entities::artist::Model) -> Self {
        let input = ArtistInput::from(artist);
        Self {
            name: input.name,
            city: input.city,
            state: input.state,
            phone: input.phone.unwrap_or_default(),
            image_link: input.image_link.unwrap_or_default(),
            genres: input.genres.into_vec(),
            facebook_link: input.facebook_link.unwrap_or_default(),
            website: input.website.unwrap_or_default(),
            seeking_venue: checked(input.seeking_venue),
            seeking_description: input.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    /// Parse each field once; every field that fails gets its own message
    pub fn validated(self) -> Result<ShowInput, FormErrors> {
        let artist_id = parse_id(&self.artist_id);
        let venue_id = parse_id(&self.venue_id);
        let start_time = parse_start_time(&self.start_time);

        if let (Some(artist_id), Some(venue_id), Some(start_time)) =
            (artist_id, venue_id, start_time)
        {
            return Ok(ShowInput {
                artist_id,
                venue_id,
                start_time,
            });
        }

        let mut errors = FormErrors::default();
        if artist_id.is_none() {
            errors.add("artist_id", "Enter a numeric ID");
        }
        if venue_id.is_none() {
            errors.add("venue_id", "Enter a numeric ID");
        }
        if start_time.is_none() {
            errors.add("start_time", "Use the format YYYY-MM-DD HH:MM");
        }
        Err(errors)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}
