use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fault classification attached to a robot, independent of its status.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Deserialize,
    Serialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum AlertKind {
    #[sea_orm(string_value = "System exception")]
    #[serde(rename = "System exception")]
    SystemException,
    #[sea_orm(string_value = "Scheduled start failure")]
    #[serde(rename = "Scheduled start failure")]
    ScheduledStartFailure,
    #[sea_orm(string_value = "Runtime Exceeded")]
    #[serde(rename = "Runtime Exceeded")]
    RuntimeExceeded,
    #[sea_orm(string_value = "Terminated")]
    #[serde(rename = "Terminated")]
    Terminated,
}

impl AlertKind {
    pub const ALL: [AlertKind; 4] = [
        AlertKind::SystemException,
        AlertKind::ScheduledStartFailure,
        AlertKind::RuntimeExceeded,
        AlertKind::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::SystemException => "System exception",
            AlertKind::ScheduledStartFailure => "Scheduled start failure",
            AlertKind::RuntimeExceeded => "Runtime Exceeded",
            AlertKind::Terminated => "Terminated",
        }
    }

    /// Exact, case-sensitive match against the stored literal.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Deserialize,
    Serialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Priority {
    #[sea_orm(string_value = "1 - Critical")]
    #[serde(rename = "1 - Critical")]
    Critical,
    #[sea_orm(string_value = "2 - High")]
    #[serde(rename = "2 - High")]
    High,
    #[sea_orm(string_value = "3 - Moderate")]
    #[serde(rename = "3 - Moderate")]
    Moderate,
    #[default]
    #[sea_orm(string_value = "4 - Low")]
    #[serde(rename = "4 - Low")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Moderate,
        Priority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "1 - Critical",
            Priority::High => "2 - High",
            Priority::Moderate => "3 - Moderate",
            Priority::Low => "4 - Low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize, ToSchema)]
#[sea_orm(table_name = "robots")]
#[serde(rename_all = "camelCase")]
#[schema(as = Robot)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub status: bool,
    pub alert: Option<AlertKind>,
    pub priority: Priority,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().naive_utc();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
