//! Check-in / check-out / attendance history use cases.

use tracing::{info, warn};

use crate::core::relay::AttendanceRelay;
use crate::core::token::TokenCodec;
use crate::db::attendance::AttendanceStore;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{Attendance, AttendanceHistoryRequest};
use crate::models::claims::{CheckinClaim, Claim, SessionClaim};
use crate::utils::date;

#[derive(Debug, Clone)]
pub struct CheckinOutcome {
    pub attendance: Attendance,
    pub token: String,
}

#[derive(Clone)]
pub struct AttendanceLogic {
    store: AttendanceStore,
    relay: AttendanceRelay,
    tokens: TokenCodec,
}

impl AttendanceLogic {
    pub fn new(store: AttendanceStore, relay: AttendanceRelay, tokens: TokenCodec) -> Self {
        Self {
            store,
            relay,
            tokens,
        }
    }

    /// Relay the check-in, store it, and bind a checkin token to the new row.
    pub async fn checkin(&self, session: &SessionClaim) -> AppResult<CheckinOutcome> {
        let mut record = self.relay.submit_checkin(session.id, &session.name).await?;

        let store = self.store.clone();
        let pending = record.clone();
        let id = tokio::task::spawn_blocking(move || store.create(&pending))
            .await
            .map_err(|e| AppError::Other(format!("check-in task failed: {}", e)))??;
        record.id = id;

        let token = self.tokens.issue(Claim::Checkin(CheckinClaim {
            id: session.id,
            checkin_id: id,
        }))?;

        info!(employee_id = session.id, attendance_id = id, "checked in");
        let store = self.store.clone();
        let email = session.email.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || {
            audit(store.pool(), "checkin", &email, &format!("attendance {} opened", id))
        })
        .await
        {
            warn!(attendance_id = id, error = %e, "check-in audit task failed");
        }

        Ok(CheckinOutcome {
            attendance: record,
            token,
        })
    }

    /// Close the record named by the checkin claim.
    ///
    /// The claim must belong to the same principal as the session. Unknown,
    /// foreign and already-closed records are all NotFound.
    pub fn checkout(&self, session: &SessionClaim, checkin: &CheckinClaim) -> AppResult<Attendance> {
        if checkin.id != session.id {
            return Err(AppError::Unauthorized);
        }

        self.store
            .checkout(checkin.checkin_id, session.id, &date::now())?;

        info!(employee_id = session.id, attendance_id = checkin.checkin_id, "checked out");
        audit(
            self.store.pool(),
            "checkout",
            &session.email,
            &format!("attendance {} closed", checkin.checkin_id),
        );

        self.store.find_by_id(checkin.checkin_id)
    }

    /// Attendance of the caller.
    ///
    /// `name` must match the session; it is never used to look up someone
    /// else's rows.
    pub fn history(
        &self,
        session: &SessionClaim,
        req: &AttendanceHistoryRequest,
    ) -> AppResult<Vec<Attendance>> {
        if req.name.trim() != session.name {
            return Err(AppError::Forbidden);
        }

        let (from, to) = req.bounds()?;
        self.store.history(session.id, from, to)
    }
}
