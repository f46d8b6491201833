use std::rc::Rc;

use chrono::{Days, Local, Months, NaiveDate};
use tracing::{debug, info};

use crate::db::RecordStore;
use crate::error::FormError;
use crate::models::{
    BiodataField, BiodataFields, BIRTH_DATE_FORMAT, DEFAULT_GENDER, DEFAULT_RELIGION,
    GENDER_OPTIONS, RELIGION_OPTIONS,
};

/// Source of "today" for the birth date default.
pub type Clock = fn() -> NaiveDate;

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormState {
    Editing,
    /// Held only while the insert runs.
    Submitting,
}

/// Input state for one new record on the create screen.
pub struct FormController {
    store: Rc<RecordStore>,
    clock: Clock,
    state: FormState,
    name: String,
    gender: String,
    birth_place: String,
    birth_date: NaiveDate,
    religion: String,
    address: String,
}

impl FormController {
    pub fn new(store: Rc<RecordStore>) -> Self {
        Self::with_clock(store, local_today)
    }

    pub fn with_clock(store: Rc<RecordStore>, clock: Clock) -> Self {
        Self {
            store,
            clock,
            state: FormState::Editing,
            name: String::new(),
            gender: DEFAULT_GENDER.to_string(),
            birth_place: String::new(),
            birth_date: clock(),
            religion: DEFAULT_RELIGION.to_string(),
            address: String::new(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Current text of a field; the birth date comes back as `YYYY-MM-DD`.
    pub fn value(&self, field: BiodataField) -> String {
        match field {
            BiodataField::Name => self.name.clone(),
            BiodataField::Gender => self.gender.clone(),
            BiodataField::BirthPlace => self.birth_place.clone(),
            BiodataField::BirthDate => self.birth_date.format(BIRTH_DATE_FORMAT).to_string(),
            BiodataField::Religion => self.religion.clone(),
            BiodataField::Address => self.address.clone(),
        }
    }

    /// Replace one field. Text fields take anything, including "". The birth
    /// date must parse, otherwise the previous date is kept.
    pub fn set_field(&mut self, field: BiodataField, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        match field {
            BiodataField::Name => self.name = value,
            BiodataField::Gender => self.gender = value,
            BiodataField::BirthPlace => self.birth_place = value,
            BiodataField::BirthDate => {
                self.birth_date = NaiveDate::parse_from_str(value.trim(), BIRTH_DATE_FORMAT)
                    .map_err(|_| FormError::InvalidBirthDate(value))?;
            }
            BiodataField::Religion => self.religion = value,
            BiodataField::Address => self.address = value,
        }
        Ok(())
    }

    /// Flip between the two gender radio options.
    pub fn cycle_gender(&mut self) {
        let next = GENDER_OPTIONS
            .iter()
            .position(|(code, _)| *code == self.gender)
            .map(|idx| (idx + 1) % GENDER_OPTIONS.len())
            .unwrap_or(0);
        self.gender = GENDER_OPTIONS[next].0.to_string();
    }

    /// Move through the religion picker. A value outside the list snaps to the
    /// first option.
    pub fn cycle_religion(&mut self, step: isize) {
        let len = RELIGION_OPTIONS.len() as isize;
        let next = RELIGION_OPTIONS
            .iter()
            .position(|option| *option == self.religion)
            .map(|idx| (idx as isize + step).rem_euclid(len) as usize)
            .unwrap_or(0);
        self.religion = RELIGION_OPTIONS[next].to_string();
    }

    /// Step the date picker by whole days; out-of-range results are ignored.
    pub fn shift_birth_date(&mut self, days: i64) {
        let step = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.birth_date.checked_add_days(step)
        } else {
            self.birth_date.checked_sub_days(step)
        };
        if let Some(date) = shifted {
            self.birth_date = date;
        }
    }

    /// Step the date picker by whole months, clamping to the month's last day.
    pub fn shift_birth_months(&mut self, months: i32) {
        let step = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.birth_date.checked_add_months(step)
        } else {
            self.birth_date.checked_sub_months(step)
        };
        if let Some(date) = shifted {
            self.birth_date = date;
        }
    }

    /// The full write the form would submit right now.
    pub fn fields(&self) -> BiodataFields {
        BiodataFields {
            name: self.name.clone(),
            gender: self.gender.clone(),
            birth_place: self.birth_place.clone(),
            birth_date: self.value(BiodataField::BirthDate),
            religion: self.religion.clone(),
            address: self.address.clone(),
        }
    }

    /// Insert the current values and reset to defaults. The returned id is the
    /// acknowledgement. When the insert fails the values are left as they were.
    pub fn submit(&mut self) -> Result<i64, FormError> {
        self.state = FormState::Submitting;
        let result = self.store.insert(&self.fields());
        self.state = FormState::Editing;

        let id = result?;
        info!(id, "biodata submitted");
        self.reset();
        Ok(id)
    }

    fn reset(&mut self) {
        debug!("resetting biodata form");
        self.name.clear();
        self.gender = DEFAULT_GENDER.to_string();
        self.birth_place.clear();
        self.birth_date = (self.clock)();
        self.religion = DEFAULT_RELIGION.to_string();
        self.address.clear();
    }
}
