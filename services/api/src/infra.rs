use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use teamup::workflows::matchmaking::applications::{
    Applicant, ApplicationDirectory, ApplicationId, ApplicationStatus, PastReview,
};
use teamup::workflows::matchmaking::reviews::{
    Member, ReviewDirectory, ReviewSubmission, Roster, SubmissionState, MAX_SCORE, MIN_SCORE,
};
use teamup::workflows::matchmaking::{DirectoryError, ProjectId, UserId};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lifecycle of a project as tracked by the directory. Reviews open only in
/// the `Completed` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProjectPhase {
    Recruiting,
    InProgress,
    Completed,
}

#[derive(Debug, Clone)]
pub(crate) struct StudentRecord {
    pub(crate) name: String,
    pub(crate) skills: Vec<String>,
    pub(crate) profile_summary: String,
    pub(crate) website: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectRecord {
    pub(crate) title: String,
    pub(crate) leader_id: UserId,
    pub(crate) phase: ProjectPhase,
}

#[derive(Debug, Clone)]
struct StoredApplication {
    application_id: ApplicationId,
    project_id: ProjectId,
    applicant_id: UserId,
    applied_date: NaiveDate,
    motivation: String,
    status: ApplicationStatus,
}

#[derive(Default)]
struct DirectoryInner {
    students: HashMap<UserId, StudentRecord>,
    projects: HashMap<ProjectId, ProjectRecord>,
    applications: Vec<StoredApplication>,
    reviews: Vec<ReviewSubmission>,
    next_application_id: u64,
}

/// In-memory project directory with the authority rules of the upstream
/// store: leader-only application access and writes, roster derived from
/// accepted applications, review uniqueness and completed-phase eligibility.
#[derive(Default)]
pub(crate) struct InMemoryProjectDirectory {
    inner: Mutex<DirectoryInner>,
}

impl InMemoryProjectDirectory {
    pub(crate) fn add_student(&self, uid: &str, record: StudentRecord) -> UserId {
        let id = UserId::new(uid);
        let mut inner = self.inner.lock().expect("directory mutex poisoned");
        inner.students.insert(id.clone(), record);
        id
    }

    pub(crate) fn add_project(&self, id: ProjectId, record: ProjectRecord) {
        let mut inner = self.inner.lock().expect("directory mutex poisoned");
        inner.projects.insert(id, record);
    }

    pub(crate) fn set_phase(&self, project: ProjectId, phase: ProjectPhase) {
        let mut inner = self.inner.lock().expect("directory mutex poisoned");
        if let Some(record) = inner.projects.get_mut(&project) {
            record.phase = phase;
        }
    }

    /// Record a new application in the `Pending` state, the way the external
    /// application-submission flow would.
    pub(crate) fn add_application(
        &self,
        project: ProjectId,
        applicant: &UserId,
        applied_date: NaiveDate,
        motivation: &str,
    ) -> ApplicationId {
        let mut inner = self.inner.lock().expect("directory mutex poisoned");
        inner.next_application_id += 1;
        let application_id = ApplicationId(inner.next_application_id);
        inner.applications.push(StoredApplication {
            application_id,
            project_id: project,
            applicant_id: applicant.clone(),
            applied_date,
            motivation: motivation.to_string(),
            status: ApplicationStatus::Pending,
        });
        application_id
    }

    fn member_of(inner: &DirectoryInner, project: &ProjectId, user: &UserId) -> bool {
        if let Some(record) = inner.projects.get(project) {
            if record.leader_id == *user {
                return true;
            }
        }
        inner.applications.iter().any(|application| {
            application.project_id == *project
                && application.applicant_id == *user
                && application.status == ApplicationStatus::Accepted
        })
    }

    fn student_member(inner: &DirectoryInner, id: &UserId, is_leader: bool) -> Member {
        let record = inner.students.get(id);
        Member {
            id: id.clone(),
            name: record
                .map(|r| r.name.clone())
                .unwrap_or_else(|| id.to_string()),
            skills: record.map(|r| r.skills.clone()).unwrap_or_default(),
            is_leader,
        }
    }
}

#[async_trait]
impl ApplicationDirectory for InMemoryProjectDirectory {
    async fn fetch_applications(
        &self,
        project: &ProjectId,
        acting_user: &UserId,
    ) -> Result<Vec<Applicant>, DirectoryError> {
        let inner = self.inner.lock().expect("directory mutex poisoned");
        let record = inner
            .projects
            .get(project)
            .ok_or_else(|| DirectoryError::Rejected("project not found".to_string()))?;
        if record.leader_id != *acting_user {
            return Err(DirectoryError::Rejected(
                "only the project leader may view applications".to_string(),
            ));
        }

        let mut applicants: Vec<Applicant> = inner
            .applications
            .iter()
            .filter(|application| application.project_id == *project)
            .map(|application| {
                let student = inner.students.get(&application.applicant_id);
                let past_reviews: Vec<PastReview> = inner
                    .reviews
                    .iter()
                    .filter(|review| review.reviewee_id == application.applicant_id)
                    .map(|review| PastReview {
                        score: review.score,
                        comment: review.comment.clone(),
                    })
                    .collect();
                Applicant {
                    application_id: application.application_id,
                    applicant_id: application.applicant_id.clone(),
                    project_id: *project,
                    name: student
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| application.applicant_id.to_string()),
                    applied_date: application.applied_date,
                    motivation: application.motivation.clone(),
                    skills: student.map(|s| s.skills.clone()).unwrap_or_default(),
                    profile_summary: student
                        .map(|s| s.profile_summary.clone())
                        .unwrap_or_default(),
                    website: student.and_then(|s| s.website.clone()),
                    status: application.status,
                    past_reviews,
                }
            })
            .collect();
        applicants.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(applicants)
    }

    async fn update_status(
        &self,
        project: &ProjectId,
        applicant: &UserId,
        status: ApplicationStatus,
        acting_user: &UserId,
    ) -> Result<(), DirectoryError> {
        let mut inner = self.inner.lock().expect("directory mutex poisoned");
        let record = inner
            .projects
            .get(project)
            .ok_or_else(|| DirectoryError::Rejected("project not found".to_string()))?;
        if record.leader_id != *acting_user {
            return Err(DirectoryError::Rejected(
                "only the project leader may change application status".to_string(),
            ));
        }
        let application = inner
            .applications
            .iter_mut()
            .find(|a| a.project_id == *project && a.applicant_id == *applicant)
            .ok_or_else(|| {
                DirectoryError::Rejected("no application from this student".to_string())
            })?;

        // Retrying the same target status is accepted without complaint.
        application.status = status;
        Ok(())
    }
}

#[async_trait]
impl ReviewDirectory for InMemoryProjectDirectory {
    async fn fetch_roster(&self, project: &ProjectId) -> Result<Roster, DirectoryError> {
        let inner = self.inner.lock().expect("directory mutex poisoned");
        let record = inner
            .projects
            .get(project)
            .ok_or_else(|| DirectoryError::Rejected("project not found".to_string()))?;

        let mut members = vec![Self::student_member(&inner, &record.leader_id, true)];
        members.extend(
            inner
                .applications
                .iter()
                .filter(|application| {
                    application.project_id == *project
                        && application.status == ApplicationStatus::Accepted
                })
                .map(|application| Self::student_member(&inner, &application.applicant_id, false)),
        );
        members.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Roster {
            project_id: *project,
            title: record.title.clone(),
            leader_id: record.leader_id.clone(),
            members,
        })
    }

    async fn fetch_submission_state(
        &self,
        project: &ProjectId,
        reviewer: &UserId,
    ) -> Result<SubmissionState, DirectoryError> {
        let inner = self.inner.lock().expect("directory mutex poisoned");
        Ok(SubmissionState {
            completed: inner
                .reviews
                .iter()
                .filter(|review| review.project_id == *project && review.reviewer_id == *reviewer)
                .map(|review| review.reviewee_id.clone())
                .collect(),
        })
    }

    async fn submit_review(&self, review: &ReviewSubmission) -> Result<(), DirectoryError> {
        let mut inner = self.inner.lock().expect("directory mutex poisoned");
        let record = inner
            .projects
            .get(&review.project_id)
            .ok_or_else(|| DirectoryError::Rejected("project not found".to_string()))?;
        if record.phase != ProjectPhase::Completed {
            return Err(DirectoryError::Rejected(
                "reviews can only be written after the project is completed".to_string(),
            ));
        }
        if review.reviewer_id == review.reviewee_id {
            return Err(DirectoryError::Rejected(
                "you cannot review yourself".to_string(),
            ));
        }
        if !Self::member_of(&inner, &review.project_id, &review.reviewer_id) {
            return Err(DirectoryError::Rejected(
                "only project members may write reviews".to_string(),
            ));
        }
        if !Self::member_of(&inner, &review.project_id, &review.reviewee_id) {
            return Err(DirectoryError::Rejected(
                "the reviewee is not a member of this project".to_string(),
            ));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&review.score) {
            return Err(DirectoryError::Rejected(format!(
                "score must be between {MIN_SCORE} and {MAX_SCORE}"
            )));
        }
        let duplicate = inner.reviews.iter().any(|stored| {
            stored.project_id == review.project_id
                && stored.reviewer_id == review.reviewer_id
                && stored.reviewee_id == review.reviewee_id
        });
        if duplicate {
            return Err(DirectoryError::Rejected(
                "this teammate was already reviewed".to_string(),
            ));
        }

        inner.reviews.push(review.clone());
        Ok(())
    }
}

pub(crate) const DEMO_PROJECT: ProjectId = ProjectId(1);

/// Directory pre-loaded with one recruiting project and three applicants, so
/// `serve` and `demo` have something to act on out of the box.
pub(crate) fn seeded_directory() -> Arc<InMemoryProjectDirectory> {
    let directory = InMemoryProjectDirectory::default();

    let leader = directory.add_student(
        "s-1001",
        StudentRecord {
            name: "Dana".to_string(),
            skills: vec!["rust".to_string(), "product".to_string()],
            profile_summary: "Fourth-year student, led two capstone teams.".to_string(),
            website: None,
        },
    );
    let minho = directory.add_student(
        "s-2001",
        StudentRecord {
            name: "Minho".to_string(),
            skills: vec!["rust".to_string(), "sql".to_string()],
            profile_summary: "Backend-leaning, comfortable with data modeling.".to_string(),
            website: Some("https://minho.dev".to_string()),
        },
    );
    let priya = directory.add_student(
        "s-2002",
        StudentRecord {
            name: "Priya".to_string(),
            skills: vec!["design".to_string(), "typescript".to_string()],
            profile_summary: "Design-systems enthusiast.".to_string(),
            website: None,
        },
    );
    let jun = directory.add_student(
        "s-2003",
        StudentRecord {
            name: "Jun".to_string(),
            skills: vec!["python".to_string()],
            profile_summary: "First team project.".to_string(),
            website: None,
        },
    );

    directory.add_project(
        DEMO_PROJECT,
        ProjectRecord {
            title: "Campus meal-plan optimizer".to_string(),
            leader_id: leader,
            phase: ProjectPhase::Recruiting,
        },
    );

    let applied = NaiveDate::from_ymd_opt(2025, 9, 12).expect("valid date");
    directory.add_application(
        DEMO_PROJECT,
        &minho,
        applied,
        "I want to build the recommendation engine.",
    );
    directory.add_application(
        DEMO_PROJECT,
        &priya,
        applied.succ_opt().expect("valid date"),
        "I can own the dashboard and design system.",
    );
    directory.add_application(
        DEMO_PROJECT,
        &jun,
        applied
            .succ_opt()
            .and_then(|d| d.succ_opt())
            .expect("valid date"),
        "Looking for my first real team project.",
    );

    Arc::new(directory)
}
