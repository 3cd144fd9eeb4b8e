//! Activity-log use cases.

use tracing::info;

use crate::db::activities::ActivityStore;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::activity::{Activity, ActivityRequest, DateRangeRequest};
use crate::utils::date;

#[derive(Clone)]
pub struct ActivityLogic {
    store: ActivityStore,
}

impl ActivityLogic {
    pub fn new(store: ActivityStore) -> Self {
        Self { store }
    }

    pub fn add(&self, employee_id: i64, req: &ActivityRequest) -> AppResult<Activity> {
        let created_at = date::now();
        let description = req.description.trim();
        let id = self.store.create(employee_id, description, &created_at)?;

        info!(employee_id, activity_id = id, "activity added");
        audit(
            self.store.pool(),
            "activity_add",
            &employee_id.to_string(),
            &format!("activity {} added", id),
        );

        Ok(Activity {
            id,
            employee_id,
            description: description.to_string(),
            created_at,
            updated_at: None,
        })
    }

    /// Re-read the record and make sure `employee_id` owns it.
    fn owned(&self, id: i64, employee_id: i64) -> AppResult<Activity> {
        let activity = self.store.find_by_id(id)?;
        if activity.employee_id != employee_id {
            info!(employee_id, activity_id = id, "activity belongs to someone else");
            return Err(AppError::Unauthorized);
        }
        Ok(activity)
    }

    pub fn update(&self, id: i64, employee_id: i64, req: &ActivityRequest) -> AppResult<Activity> {
        let mut activity = self.owned(id, employee_id)?;

        let now = date::now();
        activity.description = req.description.trim().to_string();
        activity.updated_at = Some(now);

        self.store.update(id, &activity.description, &now)?;

        audit(
            self.store.pool(),
            "activity_update",
            &employee_id.to_string(),
            &format!("activity {} updated", id),
        );

        Ok(activity)
    }

    pub fn delete(&self, id: i64, employee_id: i64) -> AppResult<()> {
        self.owned(id, employee_id)?;
        self.store.delete(id)?;

        audit(
            self.store.pool(),
            "activity_delete",
            &employee_id.to_string(),
            &format!("activity {} deleted", id),
        );
        Ok(())
    }

    pub fn history(&self, employee_id: i64, req: &DateRangeRequest) -> AppResult<Vec<Activity>> {
        let (from, to) = req.bounds()?;
        self.store.history(employee_id, from, to)
    }
}
