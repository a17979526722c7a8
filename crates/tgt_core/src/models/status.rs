use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A code read from the store or from a request that is outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} code: {value}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// TG workflow status (TG.Status_Code)
// LED -> IEC -> LEC -> LES -> STU, with ADO and DEL outside the daily flow.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TgStatus {
    #[serde(rename = "LED")]
    LeDraft,
    #[serde(rename = "IEC")]
    IeComments,
    #[serde(rename = "LEC")]
    LeChecking,
    #[serde(rename = "LES")]
    LeSignedOff,
    #[serde(rename = "STU")]
    Study,
    #[serde(rename = "ADO")]
    Adopted,
    /// Soft delete. Rows in this state are invisible to reads and transitions.
    #[serde(rename = "DEL")]
    Deleted,
}

impl TgStatus {
    pub const ALL: [TgStatus; 7] = [
        TgStatus::LeDraft,
        TgStatus::IeComments,
        TgStatus::LeChecking,
        TgStatus::LeSignedOff,
        TgStatus::Study,
        TgStatus::Adopted,
        TgStatus::Deleted,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TgStatus::LeDraft => "LED",
            TgStatus::IeComments => "IEC",
            TgStatus::LeChecking => "LEC",
            TgStatus::LeSignedOff => "LES",
            TgStatus::Study => "STU",
            TgStatus::Adopted => "ADO",
            TgStatus::Deleted => "DEL",
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, TgStatus::Deleted)
    }
}

impl fmt::Display for TgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TgStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TgStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| UnknownCode { kind: "status", value: s.to_string() })
    }
}

// ---------------------------------------------------------------------------
// Assignment role (Tg_Users.Role_Code)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentRole {
    /// Lead Expert
    #[serde(rename = "LE")]
    LeadExpert,
    /// Interested Expert
    #[serde(rename = "IE")]
    InterestedExpert,
}

impl AssignmentRole {
    pub fn code(&self) -> &'static str {
        match self {
            AssignmentRole::LeadExpert => "LE",
            AssignmentRole::InterestedExpert => "IE",
        }
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AssignmentRole {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LE" => Ok(AssignmentRole::LeadExpert),
            "IE" => Ok(AssignmentRole::InterestedExpert),
            other => Err(UnknownCode { kind: "role", value: other.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Assignment status (Tg_Users.Status_Code). Assignments are never deleted.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "I")]
    Inactive,
}

impl AssignmentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "A",
            AssignmentStatus::Inactive => "I",
        }
    }
}
