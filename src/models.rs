//! Domain models that mirror the `biodata` table and get passed between the
//! store, the controllers and the terminal front-end. These stay plain data
//! holders so the other layers can focus on persistence and presentation.

use std::collections::BTreeMap;
use std::fmt;

/// Gender codes offered by the create screen, paired with their labels.
pub const GENDER_OPTIONS: &[(&str, &str)] = &[("L", "Laki-laki"), ("P", "Perempuan")];

/// Religion choices offered by the create screen's picker. The column itself
/// is free text, so edited records may hold anything.
pub const RELIGION_OPTIONS: &[&str] = &["Islam", "Kristen", "Katolik", "Hindu", "Buddha", "Konghucu"];

/// Gender stored for a fresh form.
pub const DEFAULT_GENDER: &str = "L";
/// Religion stored for a fresh form.
pub const DEFAULT_RELIGION: &str = "Islam";
/// Format used for the `birthDate` column.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `biodata` table.
pub struct BiodataRecord {
    /// Primary key assigned by SQLite. Edit and delete flows hand it back to
    /// the store.
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub birth_place: String,
    /// ISO `YYYY-MM-DD` text.
    pub birth_date: String,
    pub religion: String,
    pub address: String,
}

impl BiodataRecord {
    /// Split off the mutable part of the record.
    pub fn fields(&self) -> BiodataFields {
        BiodataFields {
            name: self.name.clone(),
            gender: self.gender.clone(),
            birth_place: self.birth_place.clone(),
            birth_date: self.birth_date.clone(),
            religion: self.religion.clone(),
            address: self.address.clone(),
        }
    }

    /// Borrow a single field by name.
    pub fn get(&self, field: BiodataField) -> &str {
        match field {
            BiodataField::Name => &self.name,
            BiodataField::Gender => &self.gender,
            BiodataField::BirthPlace => &self.birth_place,
            BiodataField::BirthDate => &self.birth_date,
            BiodataField::Religion => &self.religion,
            BiodataField::Address => &self.address,
        }
    }
}

impl fmt::Display for BiodataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

/// Every mutable column of a record. Inserts and updates always carry the
/// full set, so a row is never partially written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiodataFields {
    pub name: String,
    pub gender: String,
    pub birth_place: String,
    pub birth_date: String,
    pub religion: String,
    pub address: String,
}

impl BiodataFields {
    pub fn with_id(self, id: i64) -> BiodataRecord {
        BiodataRecord {
            id,
            name: self.name,
            gender: self.gender,
            birth_place: self.birth_place,
            birth_date: self.birth_date,
            religion: self.religion,
            address: self.address,
        }
    }
}

/// Addresses one editable field. The declaration order is also the order the
/// screens present (and tab through) the fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BiodataField {
    Name,
    Gender,
    BirthPlace,
    BirthDate,
    Religion,
    Address,
}

impl BiodataField {
    pub const ALL: [BiodataField; 6] = [
        BiodataField::Name,
        BiodataField::Gender,
        BiodataField::BirthPlace,
        BiodataField::BirthDate,
        BiodataField::Religion,
        BiodataField::Address,
    ];

    /// Label shown next to the field on both screens.
    pub fn label(self) -> &'static str {
        match self {
            BiodataField::Name => "Name",
            BiodataField::Gender => "Gender",
            BiodataField::BirthPlace => "Birth place",
            BiodataField::BirthDate => "Birth date",
            BiodataField::Religion => "Religion",
            BiodataField::Address => "Address",
        }
    }

    /// Column name in the `biodata` table.
    pub fn column(self) -> &'static str {
        match self {
            BiodataField::Name => "name",
            BiodataField::Gender => "gender",
            BiodataField::BirthPlace => "birthPlace",
            BiodataField::BirthDate => "birthDate",
            BiodataField::Religion => "religion",
            BiodataField::Address => "address",
        }
    }

    /// Multi-line fields take `Enter` as a newline instead of a focus change.
    pub fn is_multiline(self) -> bool {
        matches!(self, BiodataField::Address)
    }

    /// Step through `ALL`, wrapping at both ends.
    pub fn cycle(self, step: isize) -> BiodataField {
        let len = Self::ALL.len() as isize;
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ALL[(idx + step).rem_euclid(len) as usize]
    }
}

/// In-progress, unsaved copy of a record's fields. Entries that were never
/// set read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<BiodataField, String>,
}

impl Draft {
    pub fn from_record(record: &BiodataRecord) -> Self {
        let values = BiodataField::ALL
            .iter()
            .map(|field| (*field, record.get(*field).to_string()))
            .collect();
        Self { values }
    }

    pub fn get(&self, field: BiodataField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: BiodataField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Mutable access for character-by-character editing.
    pub fn entry(&mut self, field: BiodataField) -> &mut String {
        self.values.entry(field).or_default()
    }

    /// Complete the draft into a full write, defaulting gaps to "".
    pub fn to_fields(&self) -> BiodataFields {
        BiodataFields {
            name: self.get(BiodataField::Name).to_string(),
            gender: self.get(BiodataField::Gender).to_string(),
            birth_place: self.get(BiodataField::BirthPlace).to_string(),
            birth_date: self.get(BiodataField::BirthDate).to_string(),
            religion: self.get(BiodataField::Religion).to_string(),
            address: self.get(BiodataField::Address).to_string(),
        }
    }
}

/// Human label for a gender code, falling back to the raw text.
pub fn gender_label(code: &str) -> &str {
    GENDER_OPTIONS
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}
