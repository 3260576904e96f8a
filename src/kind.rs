//! Entity kinds and their schema descriptors.
//!
//! The four record collections share structural roles (a date, a region, a
//! categorical dimension) but name and type them differently. Each kind
//! carries a [`KindSchema`] describing those roles, and the filter builders,
//! chart aggregator and activity feed dispatch on the descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire names of the fields a schema can address.
pub mod fields {
    /// B.E. integer year on categorized kinds.
    pub const START_YEAR: &str = "startYear";
    /// Gregorian civil date on public policies.
    pub const SIGNING_DATE: &str = "signingDate";
    /// Region label.
    pub const REGION: &str = "type";
    /// Province name.
    pub const PROVINCE: &str = "province";
}

/// One of the four record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// Local traditions and customs.
    Tradition,
    /// Public policies signed at some administrative level.
    PublicPolicy,
    /// Activities of ethnic groups.
    EthnicGroup,
    /// Creative activities.
    CreativeActivity,
}

impl EntityKind {
    /// All kinds in canonical processing order.
    pub const ALL: [Self; 4] = [
        Self::Tradition,
        Self::PublicPolicy,
        Self::EthnicGroup,
        Self::CreativeActivity,
    ];

    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tradition => "tradition",
            Self::PublicPolicy => "publicPolicy",
            Self::EthnicGroup => "ethnicGroup",
            Self::CreativeActivity => "creativeActivity",
        }
    }

    /// Parses a wire name. Matching is exact.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Returns the schema descriptor of this kind.
    #[must_use]
    pub fn schema(self) -> &'static KindSchema {
        match self {
            Self::Tradition => &TRADITION_SCHEMA,
            Self::PublicPolicy => &PUBLIC_POLICY_SCHEMA,
            Self::EthnicGroup => &ETHNIC_GROUP_SCHEMA,
            Self::CreativeActivity => &CREATIVE_ACTIVITY_SCHEMA,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a kind stores its domain year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFieldType {
    /// An integer already expressed in the Buddhist Era.
    BuddhistYear,
    /// A Gregorian civil date.
    GregorianDate,
}

/// The field a kind's year filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateField {
    /// Wire name of the field.
    pub name: &'static str,
    /// Storage type of the field.
    pub ty: DateFieldType,
}

/// The categorical dimension a kind's chart groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDimension {
    /// Name of the attached category.
    CategoryName,
    /// Administrative level of a policy.
    PolicyLevel,
}

/// Schema descriptor of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSchema {
    pub kind: EntityKind,
    pub date_field: DateField,
    pub region_field: &'static str,
    pub province_field: &'static str,
    pub category: CategoryDimension,
    /// Human label used in activity feed descriptions.
    pub label: &'static str,
}

const BUDDHIST_START_YEAR: DateField = DateField {
    name: fields::START_YEAR,
    ty: DateFieldType::BuddhistYear,
};

static TRADITION_SCHEMA: KindSchema = KindSchema {
    kind: EntityKind::Tradition,
    date_field: BUDDHIST_START_YEAR,
    region_field: fields::REGION,
    province_field: fields::PROVINCE,
    category: CategoryDimension::CategoryName,
    label: "tradition",
};

static PUBLIC_POLICY_SCHEMA: KindSchema = KindSchema {
    kind: EntityKind::PublicPolicy,
    date_field: DateField {
        name: fields::SIGNING_DATE,
        ty: DateFieldType::GregorianDate,
    },
    region_field: fields::REGION,
    province_field: fields::PROVINCE,
    category: CategoryDimension::PolicyLevel,
    label: "public policy",
};

static ETHNIC_GROUP_SCHEMA: KindSchema = KindSchema {
    kind: EntityKind::EthnicGroup,
    date_field: BUDDHIST_START_YEAR,
    region_field: fields::REGION,
    province_field: fields::PROVINCE,
    category: CategoryDimension::CategoryName,
    label: "ethnic group activity",
};

static CREATIVE_ACTIVITY_SCHEMA: KindSchema = KindSchema {
    kind: EntityKind::CreativeActivity,
    date_field: BUDDHIST_START_YEAR,
    region_field: fields::REGION,
    province_field: fields::PROVINCE,
    category: CategoryDimension::CategoryName,
    label: "creative activity",
};
