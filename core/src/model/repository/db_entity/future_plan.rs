use diesel::{Queryable, Selectable};

use crate::model::{FuturePlan, FuturePlanId};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = super::super::schema::future_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbFuturePlan {
    pub id: i64,
    pub plan: String,
    pub importance: i64,
}

impl From<DbFuturePlan> for FuturePlan {
    fn from(value: DbFuturePlan) -> Self {
        FuturePlan {
            id: FuturePlanId(value.id),
            plan: value.plan,
            importance: value.importance,
        }
    }
}
