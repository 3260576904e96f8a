//! Report filter: inbound request shape and its validated form.
//!
//! Parsing happens before any store is touched. A missing, blank or `"all"`
//! value (case-insensitive) disables that dimension.

use serde::{Deserialize, Serialize};

use crate::calendar::BuddhistYear;
use crate::error::ValidationError;
use crate::kind::EntityKind;

/// Wire value meaning "no constraint".
pub const ALL: &str = "all";

/// Inbound report request, as sent by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

impl ReportRequest {
    /// A request with every dimension set to "all".
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data_type(mut self, value: impl Into<String>) -> Self {
        self.data_type = Some(value.into());
        self
    }

    #[must_use]
    pub fn year(mut self, value: impl Into<String>) -> Self {
        self.year = Some(value.into());
        self
    }

    #[must_use]
    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(value.into());
        self
    }

    #[must_use]
    pub fn province(mut self, value: impl Into<String>) -> Self {
        self.province = Some(value.into());
        self
    }
}

/// Which kinds a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    All,
    Only(EntityKind),
}

impl DataType {
    /// Kinds to process, in canonical order.
    #[must_use]
    pub fn kinds(self) -> Vec<EntityKind> {
        match self {
            Self::All => EntityKind::ALL.to_vec(),
            Self::Only(kind) => vec![kind],
        }
    }
}

/// Year dimension of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    All,
    Year(BuddhistYear),
}

/// A string dimension that is either unconstrained or an exact match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Only(String),
}

impl Scope {
    fn parse(raw: Option<&str>) -> Self {
        match normalize(raw) {
            Some(value) => Self::Only(value.to_string()),
            None => Self::All,
        }
    }

    /// Returns the constrained value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }

    fn to_wire(&self) -> String {
        self.value().unwrap_or(ALL).to_string()
    }
}

/// Validated report filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub data_type: DataType,
    pub year: YearFilter,
    pub region: Scope,
    pub province: Scope,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            data_type: DataType::All,
            year: YearFilter::All,
            region: Scope::All,
            province: Scope::All,
        }
    }
}

impl ReportFilter {
    /// Validates an inbound request.
    ///
    /// # Errors
    ///
    /// - `MalformedYear` if the year is neither "all" nor four ASCII digits.
    /// - `UnknownDataType` if the data type is not a recognized kind.
    pub fn parse(request: &ReportRequest) -> Result<Self, ValidationError> {
        let data_type = match normalize(request.data_type.as_deref()) {
            None => DataType::All,
            Some(value) => EntityKind::from_wire(value)
                .map(DataType::Only)
                .ok_or_else(|| ValidationError::UnknownDataType {
                    value: value.to_string(),
                })?,
        };

        let year = match normalize(request.year.as_deref()) {
            None => YearFilter::All,
            Some(value) => YearFilter::Year(parse_year(value)?),
        };

        Ok(Self {
            data_type,
            year,
            region: Scope::parse(request.region.as_deref()),
            province: Scope::parse(request.province.as_deref()),
        })
    }

    /// Normalized echo of this filter, with every dimension spelled out.
    #[must_use]
    pub fn to_request(&self) -> ReportRequest {
        ReportRequest {
            data_type: Some(match self.data_type {
                DataType::All => ALL.to_string(),
                DataType::Only(kind) => kind.as_str().to_string(),
            }),
            year: Some(match self.year {
                YearFilter::All => ALL.to_string(),
                YearFilter::Year(year) => year.to_string(),
            }),
            region: Some(self.region.to_wire()),
            province: Some(self.province.to_wire()),
        }
    }
}

/// Trims the value and maps blank or "all" to `None`.
fn normalize(raw: Option<&str>) -> Option<&str> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
        None
    } else {
        Some(value)
    }
}

fn parse_year(value: &str) -> Result<BuddhistYear, ValidationError> {
    let malformed = || ValidationError::MalformedYear {
        value: value.to_string(),
    };
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    value
        .parse::<i32>()
        .map(BuddhistYear::new)
        .map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_is_all() {
        let filter = ReportFilter::parse(&ReportRequest::all()).unwrap();
        assert_eq!(filter, ReportFilter::default());
    }

    #[test]
    fn test_all_is_case_insensitive_and_trimmed() {
        let request = ReportRequest::all()
            .data_type(" ALL ")
            .year("All")
            .region("")
            .province("  ");
        assert_eq!(ReportFilter::parse(&request).unwrap(), ReportFilter::default());
    }

    #[test]
    fn test_parses_specific_values() {
        let request = ReportRequest::all()
            .data_type("publicPolicy")
            .year(" 2566 ")
            .region("North")
            .province("Chiang Mai");
        let filter = ReportFilter::parse(&request).unwrap();
        assert_eq!(filter.data_type, DataType::Only(EntityKind::PublicPolicy));
        assert_eq!(filter.year, YearFilter::Year(BuddhistYear::new(2566)));
        assert_eq!(filter.region.value(), Some("North"));
        assert_eq!(filter.province.value(), Some("Chiang Mai"));
    }

    #[test]
    fn test_malformed_years_are_rejected() {
        for bad in ["25x6", "256", "25666", "-256", "+256", "２５６６"] {
            let err = ReportFilter::parse(&ReportRequest::all().year(bad)).unwrap_err();
            assert!(
                matches!(err, ValidationError::MalformedYear { .. }),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn test_unknown_data_type_is_rejected() {
        let err = ReportFilter::parse(&ReportRequest::all().data_type("festival")).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownDataType { value } if value == "festival"));
    }

    #[test]
    fn test_echo_spells_out_every_dimension() {
        let request = ReportRequest::all().data_type("tradition").year("2566");
        let echo = ReportFilter::parse(&request).unwrap().to_request();
        assert_eq!(echo.data_type.as_deref(), Some("tradition"));
        assert_eq!(echo.year.as_deref(), Some("2566"));
        assert_eq!(echo.region.as_deref(), Some("all"));
        assert_eq!(echo.province.as_deref(), Some("all"));
    }

    #[test]
    fn test_data_type_kinds() {
        assert_eq!(DataType::All.kinds(), EntityKind::ALL.to_vec());
        assert_eq!(
            DataType::Only(EntityKind::EthnicGroup).kinds(),
            vec![EntityKind::EthnicGroup]
        );
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: ReportRequest =
            serde_json::from_str(r#"{"dataType":"creativeActivity","year":"2567"}"#).unwrap();
        assert_eq!(request.data_type.as_deref(), Some("creativeActivity"));
        assert!(request.region.is_none());
    }
}
