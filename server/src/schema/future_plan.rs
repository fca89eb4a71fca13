use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use chronicle_core::model;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct FuturePlan {
    pub id: i64,
    pub plan: String,
    pub importance: i64,
}

impl From<model::FuturePlan> for FuturePlan {
    fn from(value: model::FuturePlan) -> Self {
        FuturePlan {
            id: value.id.0,
            plan: value.plan,
            importance: value.importance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    pub plan: String,
    /// Defaults to 0 if missing or null
    #[serde(default)]
    pub importance: Option<i64>,
}

impl From<CreatePlanRequest> for model::CreateFuturePlan {
    fn from(value: CreatePlanRequest) -> Self {
        model::CreateFuturePlan {
            plan: value.plan,
            importance: value.importance.unwrap_or(0),
        }
    }
}
