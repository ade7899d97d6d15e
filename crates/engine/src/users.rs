//! Users table and association roles.
//!
//! The engine reads users to decide who gets billed and increments
//! `contribution_score` when a linked payment is verified. Account
//! management and credential handling live outside the core.

use sea_orm::entity::prelude::*;

use crate::EngineError;

/// Association role of a user.
///
/// Only `Member` is billable; administrative roles review payments and
/// trigger generation but never receive obligations themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    SuperAdmin,
    Chairman,
    Treasurer,
    Secretary,
    Auditor,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Chairman => "Chairman",
            Self::Treasurer => "Treasurer",
            Self::Secretary => "Secretary",
            Self::Auditor => "Auditor",
            Self::Member => "Member",
        }
    }

    /// Roles allowed to review payments and run generation.
    pub fn is_admin(self) -> bool {
        matches!(
            self,
            Self::SuperAdmin | Self::Chairman | Self::Treasurer | Self::Secretary
        )
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Super Admin" => Ok(Self::SuperAdmin),
            "Chairman" => Ok(Self::Chairman),
            "Treasurer" => Ok(Self::Treasurer),
            "Secretary" => Ok(Self::Secretary),
            "Auditor" => Ok(Self::Auditor),
            "Member" => Ok(Self::Member),
            other => Err(EngineError::Validation(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub phone: Option<String>,
    pub graduation_year: Option<i32>,
    pub role: String,
    pub is_active: bool,
    pub contribution_score: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
