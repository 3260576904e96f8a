//! Record model for the four entity kinds.
//!
//! Every record carries a common [`RecordMeta`] block. Traditions, ethnic
//! group activities and creative activities share the same categorized
//! payload; public policies carry a signing date and an administrative level.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kind::{fields, EntityKind};

/// Stable record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a new random record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A category or sub-category lookup attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Reference to an attached image or document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub id: i64,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// The user who submitted a record. Display only, never filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: i64,
    pub display_name: String,
}

/// Administrative level of a public policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyLevel {
    National,
    Regional,
    Provincial,
    Local,
}

impl fmt::Display for PolicyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::National => "NATIONAL",
            Self::Regional => "REGIONAL",
            Self::Provincial => "PROVINCIAL",
            Self::Local => "LOCAL",
        };
        f.write_str(s)
    }
}

/// Which nested lookups a fetch should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Relations {
    pub category: bool,
    pub sub_category: bool,
    pub media: bool,
    pub owner: bool,
}

impl Relations {
    /// Every nested lookup.
    pub const ALL: Self = Self {
        category: true,
        sub_category: true,
        media: true,
        owner: true,
    };

    /// No nested lookups.
    pub const NONE: Self = Self {
        category: false,
        sub_category: false,
        media: false,
        owner: false,
    };

    /// Returns the union of two inclusion sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            category: self.category || other.category,
            sub_category: self.sub_category || other.sub_category,
            media: self.media || other.media,
            owner: self.owner || other.owner,
        }
    }
}

impl Default for Relations {
    fn default() -> Self {
        Self::ALL
    }
}

/// Attributes common to every kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub sub_district: Option<String>,
    /// Region label, e.g. "North". Opaque to the engine.
    #[serde(default, rename = "type")]
    pub region: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl RecordMeta {
    /// Creates metadata with a fresh ID and no optional attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            province: None,
            district: None,
            sub_district: None,
            region: None,
            created_at: None,
            media: Vec::new(),
            owner: None,
        }
    }
}

/// Payload of traditions, ethnic group activities and creative activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Domain year, already in the Buddhist Era.
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload of public policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Gregorian civil date the policy was signed.
    #[serde(default)]
    pub signing_date: Option<NaiveDate>,
    pub level: PolicyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A value read from a record through its schema's field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Year(i32),
    Date(NaiveDate),
    Text(&'a str),
}

/// A record of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Record {
    Tradition(CategorizedRecord),
    PublicPolicy(PolicyRecord),
    EthnicGroup(CategorizedRecord),
    CreativeActivity(CategorizedRecord),
}

impl Record {
    /// Creates a tradition with a fresh ID.
    #[must_use]
    pub fn tradition(name: impl Into<String>) -> Self {
        Self::Tradition(CategorizedRecord::new(RecordMeta::new(name)))
    }

    /// Creates an ethnic group activity with a fresh ID.
    #[must_use]
    pub fn ethnic_group(name: impl Into<String>) -> Self {
        Self::EthnicGroup(CategorizedRecord::new(RecordMeta::new(name)))
    }

    /// Creates a creative activity with a fresh ID.
    #[must_use]
    pub fn creative_activity(name: impl Into<String>) -> Self {
        Self::CreativeActivity(CategorizedRecord::new(RecordMeta::new(name)))
    }

    /// Creates a public policy with a fresh ID.
    #[must_use]
    pub fn public_policy(name: impl Into<String>, level: PolicyLevel) -> Self {
        Self::PublicPolicy(PolicyRecord {
            meta: RecordMeta::new(name),
            signing_date: None,
            level,
            description: None,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Tradition(_) => EntityKind::Tradition,
            Self::PublicPolicy(_) => EntityKind::PublicPolicy,
            Self::EthnicGroup(_) => EntityKind::EthnicGroup,
            Self::CreativeActivity(_) => EntityKind::CreativeActivity,
        }
    }

    #[must_use]
    pub const fn meta(&self) -> &RecordMeta {
        match self {
            Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) => &r.meta,
            Self::PublicPolicy(p) => &p.meta,
        }
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        match self {
            Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) => &mut r.meta,
            Self::PublicPolicy(p) => &mut p.meta,
        }
    }

    fn categorized(&self) -> Option<&CategorizedRecord> {
        match self {
            Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) => Some(r),
            Self::PublicPolicy(_) => None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.meta().id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta().name
    }

    /// B.E. start year, for kinds that have one.
    #[must_use]
    pub fn start_year(&self) -> Option<i32> {
        self.categorized().and_then(|r| r.start_year)
    }

    /// Gregorian signing date, for public policies.
    #[must_use]
    pub const fn signing_date(&self) -> Option<NaiveDate> {
        match self {
            Self::PublicPolicy(p) => p.signing_date,
            _ => None,
        }
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.meta().region.as_deref()
    }

    #[must_use]
    pub fn province(&self) -> Option<&str> {
        self.meta().province.as_deref()
    }

    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.meta().created_at
    }

    /// Name of the attached category, for categorized kinds.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.categorized()
            .and_then(|r| r.category.as_ref())
            .map(|c| c.name.as_str())
    }

    /// Level of a public policy.
    #[must_use]
    pub const fn policy_level(&self) -> Option<PolicyLevel> {
        match self {
            Self::PublicPolicy(p) => Some(p.level),
            _ => None,
        }
    }

    /// Reads a field by its wire name.
    ///
    /// Returns `None` when the field does not exist on this kind or is unset.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            fields::START_YEAR => self.start_year().map(FieldValue::Year),
            fields::SIGNING_DATE => self.signing_date().map(FieldValue::Date),
            fields::REGION => self.region().map(FieldValue::Text),
            fields::PROVINCE => self.province().map(FieldValue::Text),
            _ => None,
        }
    }

    /// Drops the nested lookups not selected by `include`.
    #[must_use]
    pub fn without_relations(mut self, include: Relations) -> Self {
        if !include.media {
            self.meta_mut().media.clear();
        }
        if !include.owner {
            self.meta_mut().owner = None;
        }
        if let Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) = &mut self {
            if !include.category {
                r.category = None;
            }
            if !include.sub_category {
                r.sub_category = None;
            }
        }
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.meta_mut().id = id;
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.meta_mut().region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.meta_mut().province = Some(province.into());
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.meta_mut().created_at = Some(at);
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.meta_mut().owner = Some(owner);
        self
    }

    #[must_use]
    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.meta_mut().media.push(media);
        self
    }

    /// Sets the B.E. start year. No effect on public policies.
    #[must_use]
    pub fn with_start_year(mut self, year: i32) -> Self {
        if let Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) = &mut self {
            r.start_year = Some(year);
        }
        self
    }

    /// Sets the category. No effect on public policies.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        if let Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) = &mut self {
            r.category = Some(category);
        }
        self
    }

    /// Sets the sub-category. No effect on public policies.
    #[must_use]
    pub fn with_sub_category(mut self, sub_category: Category) -> Self {
        if let Self::Tradition(r) | Self::EthnicGroup(r) | Self::CreativeActivity(r) = &mut self {
            r.sub_category = Some(sub_category);
        }
        self
    }

    /// Sets the signing date. Only public policies have one.
    #[must_use]
    pub fn with_signing_date(mut self, date: NaiveDate) -> Self {
        if let Self::PublicPolicy(p) = &mut self {
            p.signing_date = Some(date);
        }
        self
    }
}

impl CategorizedRecord {
    /// Creates a payload with no year or lookups.
    #[must_use]
    pub const fn new(meta: RecordMeta) -> Self {
        Self {
            meta,
            start_year: None,
            category: None,
            sub_category: None,
            description: None,
        }
    }
}

impl Category {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
