use diesel::prelude::*;
use eyre::{Context, Result};
use tracing::instrument;

use crate::model::{CreateFuturePlan, FuturePlan, FuturePlanId};

use super::db::DbConn;
use super::db_entity::DbFuturePlan;
use super::schema;

/// All plans, most recently created first.
#[instrument(skip(conn), level = "trace")]
pub fn get_future_plans(conn: &mut DbConn) -> Result<Vec<FuturePlan>> {
    use schema::future_plans;
    let db_plans: Vec<DbFuturePlan> = future_plans::table
        .select(DbFuturePlan::as_select())
        .order_by(future_plans::id.desc())
        .load(conn)
        .wrap_err("could not query table future_plans")?;
    Ok(db_plans.into_iter().map(FuturePlan::from).collect())
}

#[instrument(skip(conn), level = "debug")]
pub fn insert_future_plan(conn: &mut DbConn, plan: &CreateFuturePlan) -> Result<FuturePlanId> {
    use schema::future_plans;
    let id = diesel::insert_into(future_plans::table)
        .values((
            future_plans::plan.eq(&plan.plan),
            future_plans::importance.eq(plan.importance),
        ))
        .returning(future_plans::id)
        .get_result(conn)
        .wrap_err("could not insert into table future_plans")?;
    Ok(FuturePlanId(id))
}

#[instrument(skip(conn), level = "debug")]
pub fn delete_future_plan(conn: &mut DbConn, id: FuturePlanId) -> Result<usize> {
    use schema::future_plans;
    diesel::delete(future_plans::table.find(id.0))
        .execute(conn)
        .wrap_err("could not delete from table future_plans")
}
