use super::FuturePlanId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuturePlan {
    pub id: FuturePlanId,
    pub plan: String,
    pub importance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreateFuturePlan {
    pub plan: String,
    pub importance: i64,
}
