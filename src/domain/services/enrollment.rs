use std::sync::Arc;
use tracing::info;

use crate::domain::models::join_request::{JoinRequest, JoinRequestStatus};
use crate::domain::models::user::{Role, User};
use crate::domain::ports::{JoinRequestRepository, UserRepository};
use crate::error::AppError;

/// Gates the student->teacher link behind an explicit request/response
/// handshake, and carries the admin batch override that bypasses it.
///
/// The request lifecycle is PENDING -> {ACCEPTED, REJECTED}; both outcomes
/// are terminal and the record is kept as an audit trail. Acceptance unions
/// the teacher into the student's links; nothing ever removes a link.
pub struct EnrollmentService {
    user_repo: Arc<dyn UserRepository>,
    request_repo: Arc<dyn JoinRequestRepository>,
}

impl EnrollmentService {
    pub fn new(user_repo: Arc<dyn UserRepository>, request_repo: Arc<dyn JoinRequestRepository>) -> Self {
        Self { user_repo, request_repo }
    }

    /// Preconditions run in a fixed order so callers always see the most
    /// specific failure first: unknown teacher, then already-assigned, then
    /// already-pending. The partial unique index behind
    /// `JoinRequestRepository::create` catches the concurrent window between
    /// the pending check and the insert.
    pub async fn submit(&self, student: &User, teacher_id: &str, request_id: Option<String>) -> Result<JoinRequest, AppError> {
        let teacher = self.user_repo.find_by_id(teacher_id).await?
            .filter(|u| u.role() == Role::Teacher)
            .ok_or(AppError::NotFound("Teacher not found".into()))?;

        if self.user_repo.is_assigned(&student.id, teacher_id).await? {
            return Err(AppError::Conflict("Already assigned to this teacher".into()));
        }

        if self.request_repo.find_pending_pair(&student.id, teacher_id).await?.is_some() {
            return Err(AppError::Conflict("Request already pending".into()));
        }

        let request = JoinRequest::new(
            request_id,
            student.id.clone(),
            student.name.clone(),
            teacher.id.clone(),
            teacher.name.clone(),
        );
        let created = self.request_repo.create(&request).await?;

        info!("Join request {} submitted: {} -> {}", created.id, created.student_id, created.teacher_id);
        Ok(created)
    }

    /// Resolves a pending request. Only the teacher named on the request may
    /// respond, and a resolved request cannot be flipped afterwards.
    pub async fn respond(&self, request_id: &str, status: JoinRequestStatus, responder_id: &str) -> Result<JoinRequest, AppError> {
        if !status.is_terminal() {
            return Err(AppError::Validation("Invalid status".into()));
        }

        let request = self.request_repo.find_by_id(request_id).await?
            .ok_or(AppError::NotFound("Request not found".into()))?;

        if request.teacher_id != responder_id {
            return Err(AppError::Forbidden("Only the requested teacher can respond".into()));
        }

        if request.status.is_terminal() {
            return Err(AppError::Conflict("Request already resolved".into()));
        }

        let updated = self.request_repo.update_status(&request.id, status).await?;

        if status == JoinRequestStatus::Accepted {
            // Set-union semantics: linking an already-linked pair is a no-op.
            self.user_repo.add_teacher(&request.student_id, &request.teacher_id).await?;
        }

        info!("Join request {} resolved as {}", updated.id, updated.status);
        Ok(updated)
    }

    /// Admin batch override. Unions every teacher into every listed account
    /// with role STUDENT, then returns the current records for every id that
    /// was requested - including ids that did not match the role filter and
    /// were left untouched, which the admin dashboard relies on.
    pub async fn bulk_assign(&self, student_ids: &[String], teacher_ids: &[String]) -> Result<Vec<User>, AppError> {
        self.user_repo.assign_teachers(student_ids, teacher_ids).await?;

        let updated = self.user_repo.find_by_ids(student_ids).await?;
        info!("Bulk-assigned {} teacher(s) across {} student id(s)", teacher_ids.len(), student_ids.len());
        Ok(updated)
    }
}
