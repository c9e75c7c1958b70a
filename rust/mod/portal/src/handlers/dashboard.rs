//! Student dashboard: profile sidebar, request forms and the status list.

use serde_json::json;

use campus_core::{now_rfc3339, ServiceError};

use super::{location, Alert, Outcome};
use crate::model::{event, Request, RequestKind, StudentProfile};
use crate::render;
use crate::store::PageLog;
use crate::Portal;

pub const PAGE: &str = "dashboard";
pub const MISSING_FIELDS: &str = "Please fill in all required fields";
pub const NOT_FOUND: &str = "Request not found";
pub const DEV_MODE_OFF: &str = "Developer mode is off";

/// One open dashboard. Dev mode exposes approve/reject for demos.
pub struct Dashboard<'a> {
    portal: &'a Portal,
    dev_mode: bool,
}

impl<'a> Dashboard<'a> {
    pub fn new(portal: &'a Portal, dev_mode: bool) -> Self {
        Self { portal, dev_mode }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn toggle_dev_mode(&mut self) -> bool {
        self.dev_mode = !self.dev_mode;
        self.dev_mode
    }

    pub fn dev_toggle_label(&self) -> &'static str {
        if self.dev_mode {
            "Dev Controls: On"
        } else {
            "Dev Controls: Off"
        }
    }

    fn log(&self) -> PageLog<'a> {
        self.portal.security_log.page(PAGE)
    }

    /// Logged-in student, or the demo placeholder.
    pub fn profile(&self) -> Result<StudentProfile, ServiceError> {
        Ok(self
            .portal
            .accounts
            .profile()?
            .unwrap_or_else(StudentProfile::placeholder))
    }

    /// File a complaint or bonafide request.
    pub fn submit(
        &self,
        kind: RequestKind,
        purpose: &str,
        description: &str,
    ) -> Result<Outcome, ServiceError> {
        if purpose.is_empty() || description.is_empty() {
            return Ok(Outcome::refused(MISSING_FIELDS));
        }

        let request = Request::new(kind, purpose, description);
        self.portal.requests.create(&request)?;
        self.log().append(
            event::REQUEST_SUBMITTED,
            json!({
                "id": request.id,
                "type": request.kind,
                "purpose": request.purpose,
            }),
        )?;

        Ok(Outcome::Done {
            alert: Alert::success(format!("Request {} submitted.", request.id)),
            redirect: None,
        })
    }

    pub fn approve(&self, id: &str) -> Result<Outcome, ServiceError> {
        if !self.dev_mode {
            return Ok(Outcome::refused(DEV_MODE_OFF));
        }
        if self.portal.requests.approve(id)?.is_none() {
            return Ok(Outcome::refused(NOT_FOUND));
        }
        self.log()
            .append(event::REQUEST_APPROVED, json!({ "id": id }))?;
        Ok(Outcome::Done {
            alert: Alert::success(format!("Request {id} marked Approved (dev).")),
            redirect: None,
        })
    }

    /// `reason` is `None` when the reason prompt was dismissed.
    pub fn reject(&self, id: &str, reason: Option<&str>) -> Result<Outcome, ServiceError> {
        if !self.dev_mode {
            return Ok(Outcome::refused(DEV_MODE_OFF));
        }
        if self.portal.requests.find_by_id(id)?.is_none() {
            return Ok(Outcome::refused(NOT_FOUND));
        }
        let Some(reason) = reason else {
            return Ok(Outcome::Cancelled);
        };
        self.portal.requests.reject(id, reason)?;
        self.log()
            .append(event::REQUEST_REJECTED, json!({ "id": id, "reason": reason }))?;
        Ok(Outcome::Done {
            alert: Alert::success(format!("Request {id} marked Rejected.")),
            redirect: None,
        })
    }

    /// Placeholder download of an approved document.
    pub fn download(&self, id: &str) -> Alert {
        Alert::info(format!(
            "Downloading document for {id}\n\nIn a real application, this would download the approved document/certificate."
        ))
    }

    /// Status list markup.
    pub fn render(&self) -> Result<String, ServiceError> {
        let requests = self.portal.requests.list()?;
        Ok(render::requests_html(&requests, self.dev_mode))
    }

    /// Drop the profile snapshot and session, back to the login page.
    pub fn logout(&self) -> Result<Outcome, ServiceError> {
        let email = self
            .portal
            .session
            .current()?
            .map(|s| s.email)
            .unwrap_or_default();
        self.portal.accounts.clear_profile()?;
        self.portal.session.clear()?;
        self.log().append(
            event::LOGOUT,
            json!({ "email": email, "timestamp": now_rfc3339() }),
        )?;
        Ok(Outcome::Done {
            alert: Alert::success("Logged out"),
            redirect: Some(location::LOGIN.to_string()),
        })
    }
}
