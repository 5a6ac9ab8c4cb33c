//! Buyer order form and its validation
use super::error::{AgeIssue, CardIssue, NameIssue, ValidationError};
use std::collections::BTreeMap;
use std::fmt;

pub const CARD_DIGITS: usize = 16;
pub const MIN_NAME_CHARS: usize = 3;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120; // sanity ceiling

/// Fields the validator can report on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Age,
    CardNumber,
    Seats,
}

// Raw buyer input, kept as typed so a rejected form can be shown again untouched
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderForm {
    full_name: String,
    age: String,
    card_number: String,
}

/// Field level errors for one submission. Empty means the order may proceed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<Field, ValidationError>,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Age => "age",
            Field::CardNumber => "cardNumber",
            Field::Seats => "seats",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OrderForm {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }
    pub fn set_age(mut self, age: impl ToString) -> Self {
        self.age = age.to_string();
        self
    }
    pub fn set_card_number(mut self, raw: impl Into<String>) -> Self {
        self.card_number = raw.into();
        self
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
    pub fn age(&self) -> &str {
        &self.age
    }
    pub fn card_number(&self) -> &str {
        &self.card_number
    }
    pub fn card_number_display(&self) -> String {
        format_card_number(&self.card_number)
    }

    /// Runs every check and collects all failures rather than stopping at the first
    pub fn validate(&self, selected_seats: usize) -> ValidationReport {
        let mut report = ValidationReport::default();

        if let Err(e) = validate_name(&self.full_name) {
            report.insert(Field::FullName, e);
        }
        if let Err(e) = validate_age(&self.age) {
            report.insert(Field::Age, e);
        }
        if let Err(e) = validate_card(&self.card_number) {
            report.insert(Field::CardNumber, e);
        }
        if selected_seats == 0 {
            report.insert(Field::Seats, ValidationError::NoSeatsSelected);
        }

        report
    }
}

impl ValidationReport {
    fn insert(&mut self, field: Field, error: ValidationError) {
        self.errors.insert(field, error);
    }
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
    pub fn len(&self) -> usize {
        self.errors.len()
    }
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }
    pub fn fields(&self) -> Vec<Field> {
        self.errors.keys().copied().collect()
    }
    /// Human readable message per field, for inline display
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.as_str(), error.to_string()))
            .collect()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Field, &ValidationError)> {
        self.errors.iter()
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName(NameIssue::Empty));
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::InvalidName(NameIssue::TooShort));
    }
    Ok(())
}

pub fn validate_age(age: &str) -> Result<u32, ValidationError> {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidAge(AgeIssue::Missing));
    }
    let years = trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidAge(AgeIssue::NotNumeric))?;

    if years < MIN_AGE {
        return Err(ValidationError::InvalidAge(AgeIssue::Underage));
    }
    if years > MAX_AGE {
        return Err(ValidationError::InvalidAge(AgeIssue::OutOfRange));
    }
    Ok(years)
}

pub fn validate_card(card_number: &str) -> Result<(), ValidationError> {
    let digits = normalize_card_number(card_number);
    if digits.is_empty() {
        return Err(ValidationError::InvalidCard(CardIssue::Missing));
    }
    if digits.len() != CARD_DIGITS {
        return Err(ValidationError::InvalidCard(CardIssue::WrongLength(
            digits.len(),
        )));
    }
    Ok(())
}

/// Strips everything that is not an ASCII digit
pub fn normalize_card_number(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Display transform applied while the buyer types: digits only, grouped in
/// runs of four. Validation never sees this form.
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = normalize_card_number(raw).chars().collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
