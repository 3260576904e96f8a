//! Per-kind predicates built from a validated filter.
//!
//! A [`Predicate`] is a conjunction of clauses addressed by field name. The
//! field names and the shape of the year clause come from the kind's
//! [`KindSchema`](crate::kind::KindSchema), so one builder serves every kind.

use std::fmt;

use crate::calendar::{to_gregorian_year_range, YearRange};
use crate::error::ValidationError;
use crate::filter::{ReportFilter, YearFilter};
use crate::kind::{DateFieldType, EntityKind};
use crate::record::{FieldValue, Record};

/// A single constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Integer B.E. year field equals `year`.
    YearEquals { field: &'static str, year: i32 },
    /// Civil date field falls within `[range.start, range.end)`.
    DateWithin { field: &'static str, range: YearRange },
    /// Text field equals `value` exactly.
    TextEquals { field: &'static str, value: String },
}

impl Clause {
    /// Field this clause constrains.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::YearEquals { field, .. }
            | Self::DateWithin { field, .. }
            | Self::TextEquals { field, .. } => *field,
        }
    }

    /// Returns true if the record satisfies this clause.
    ///
    /// A record without the field never satisfies it.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match (self, record.field(self.field())) {
            (Self::YearEquals { year, .. }, Some(FieldValue::Year(actual))) => actual == *year,
            (Self::DateWithin { range, .. }, Some(FieldValue::Date(actual))) => range.contains(actual),
            (Self::TextEquals { value, .. }, Some(FieldValue::Text(actual))) => actual == value.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearEquals { field, year } => write!(f, "{field} = {year}"),
            Self::DateWithin { field, range } => write!(f, "{field} in {range}"),
            Self::TextEquals { field, value } => write!(f, "{field} = {value:?}"),
        }
    }
}

/// Conjunction of clauses. An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// A predicate matching every record.
    #[must_use]
    pub const fn match_all() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Adds a clause (logical AND).
    #[must_use]
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true if the record satisfies every clause.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("true");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Builds the predicate selecting `kind` records that satisfy `filter`.
///
/// The `data_type` dimension is not part of the predicate; it decides which
/// kinds are queried at all.
///
/// # Errors
///
/// Returns `ValidationError::YearOutOfRange` if a Gregorian-dated kind is
/// filtered by a year chrono cannot represent.
pub fn build_predicate(kind: EntityKind, filter: &ReportFilter) -> Result<Predicate, ValidationError> {
    let schema = kind.schema();
    let mut predicate = Predicate::match_all();

    if let YearFilter::Year(year) = filter.year {
        let field = schema.date_field.name;
        predicate = predicate.and(match schema.date_field.ty {
            DateFieldType::BuddhistYear => Clause::YearEquals {
                field,
                year: year.get(),
            },
            DateFieldType::GregorianDate => Clause::DateWithin {
                field,
                range: to_gregorian_year_range(year)?,
            },
        });
    }

    if let Some(region) = filter.region.value() {
        predicate = predicate.and(Clause::TextEquals {
            field: schema.region_field,
            value: region.to_string(),
        });
    }

    if let Some(province) = filter.province.value() {
        predicate = predicate.and(Clause::TextEquals {
            field: schema.province_field,
            value: province.to_string(),
        });
    }

    Ok(predicate)
}
