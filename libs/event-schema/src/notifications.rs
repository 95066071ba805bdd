//! User-facing notifications published to the `notifications` exchange.
//!
//! Each variant carries its own payload struct; the discriminator travels in
//! the `type` message header and the target user id in the `user` header.
//! Every variant projects to an email ([`Email`]) and a push notification
//! ([`PushNotification`]); both projections are pure functions of the payload
//! fields.

use crate::formats::{Email, PushNotification};
use crate::{templates, CodecError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Welcome {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InscriptionConfirmation {
    pub student_name: String,
    pub course_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuxTeacherAssignment {
    pub teacher_name: String,
    pub course_name: String,
    pub main_teacher: String,
}

/// The title's wire name is `heading`, inherited from the legacy producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTask {
    pub course_name: String,
    #[serde(rename = "heading")]
    pub title: String,
    pub description: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskHandingConfirmation {
    pub student_name: String,
    pub task_title: String,
    pub course_name: String,
    pub submitted_at: String,
    pub solution_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskFeedback {
    pub student_name: String,
    pub task_title: String,
    pub course_name: String,
    pub teacher_name: String,
    pub grade: String,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAnswer {
    pub teacher_name: String,
    pub student_name: String,
    pub task_title: String,
    pub course_name: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewForumComment {
    pub user_name: String,
    pub post_title: String,
    pub comment_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlagiarismDetected {
    pub teacher_name: String,
    pub student_name: String,
    pub task_title: String,
    pub course_name: String,
    pub submission_preview: String,
    pub similarity_score: f64,
    pub detected_at: String,
    pub match_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesUpdate {
    pub name: String,
    pub updated_at: String,
}

/// The closed set of notifications ClassConnect can deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Welcome(Welcome),
    InscriptionConfirmation(InscriptionConfirmation),
    AuxTeacherAssignment(AuxTeacherAssignment),
    NewTask(NewTask),
    TaskHandingConfirmation(TaskHandingConfirmation),
    TaskFeedback(TaskFeedback),
    NewAnswer(NewAnswer),
    NewForumComment(NewForumComment),
    PlagiarismDetected(PlagiarismDetected),
    RulesUpdate(RulesUpdate),
}

fn parse<T: DeserializeOwned>(kind: &str, body: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(body).map_err(|e| CodecError::Decode(kind.to_string(), e))
}

impl Notification {
    /// Stable discriminator carried in the `type` message header.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::Welcome(_) => "Welcome",
            Self::InscriptionConfirmation(_) => "InscriptionConfirmation",
            Self::AuxTeacherAssignment(_) => "AuxTeacherAssignment",
            Self::NewTask(_) => "NewTask",
            Self::TaskHandingConfirmation(_) => "TaskHandingConfirmation",
            Self::TaskFeedback(_) => "TaskFeedback",
            Self::NewAnswer(_) => "NewAnswer",
            Self::NewForumComment(_) => "NewForumComment",
            Self::PlagiarismDetected(_) => "PlagiarismDetected",
            Self::RulesUpdate(_) => "RulesUpdate",
        }
    }

    /// Serialize the payload fields to JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let encoded = match self {
            Self::Welcome(p) => serde_json::to_vec(p),
            Self::InscriptionConfirmation(p) => serde_json::to_vec(p),
            Self::AuxTeacherAssignment(p) => serde_json::to_vec(p),
            Self::NewTask(p) => serde_json::to_vec(p),
            Self::TaskHandingConfirmation(p) => serde_json::to_vec(p),
            Self::TaskFeedback(p) => serde_json::to_vec(p),
            Self::NewAnswer(p) => serde_json::to_vec(p),
            Self::NewForumComment(p) => serde_json::to_vec(p),
            Self::PlagiarismDetected(p) => serde_json::to_vec(p),
            Self::RulesUpdate(p) => serde_json::to_vec(p),
        };
        encoded.map_err(|e| CodecError::Encode(self.discriminator().to_string(), e))
    }

    /// Decode a payload tagged by `discriminator`. Unknown discriminators and
    /// schema mismatches are errors.
    pub fn decode(discriminator: &str, body: &[u8]) -> Result<Self, CodecError> {
        match discriminator {
            "Welcome" => Ok(Self::Welcome(parse(discriminator, body)?)),
            "InscriptionConfirmation" => {
                Ok(Self::InscriptionConfirmation(parse(discriminator, body)?))
            }
            "AuxTeacherAssignment" => Ok(Self::AuxTeacherAssignment(parse(discriminator, body)?)),
            "NewTask" => Ok(Self::NewTask(parse(discriminator, body)?)),
            "TaskHandingConfirmation" => {
                Ok(Self::TaskHandingConfirmation(parse(discriminator, body)?))
            }
            "TaskFeedback" => Ok(Self::TaskFeedback(parse(discriminator, body)?)),
            "NewAnswer" => Ok(Self::NewAnswer(parse(discriminator, body)?)),
            "NewForumComment" => Ok(Self::NewForumComment(parse(discriminator, body)?)),
            "PlagiarismDetected" => Ok(Self::PlagiarismDetected(parse(discriminator, body)?)),
            "RulesUpdate" => Ok(Self::RulesUpdate(parse(discriminator, body)?)),
            other => Err(CodecError::UnknownType(other.to_string())),
        }
    }

    /// Render the notification as a branded HTML email.
    pub fn as_email(&self) -> Email {
        match self {
            Self::Welcome(p) => templates::welcome_email(p),
            Self::InscriptionConfirmation(p) => templates::inscription_email(p),
            Self::AuxTeacherAssignment(p) => templates::aux_teacher_email(p),
            Self::NewTask(p) => templates::new_task_email(p),
            Self::TaskHandingConfirmation(p) => templates::task_handing_email(p),
            Self::TaskFeedback(p) => templates::task_feedback_email(p),
            Self::NewAnswer(p) => templates::new_answer_email(p),
            Self::NewForumComment(p) => templates::forum_comment_email(p),
            Self::PlagiarismDetected(p) => templates::plagiarism_email(p),
            Self::RulesUpdate(p) => templates::rules_update_email(p),
        }
    }

    /// Render the notification as a short push message.
    pub fn as_push(&self) -> PushNotification {
        match self {
            Self::Welcome(p) => PushNotification {
                title: "Welcome to Class Connect".to_string(),
                text: format!("Hello {}, welcome to Class Connect!", p.name),
            },
            Self::InscriptionConfirmation(p) => PushNotification {
                title: "Course Enrollment Confirmed".to_string(),
                text: format!("You've successfully enrolled in {}", p.course_name),
            },
            Self::AuxTeacherAssignment(p) => PushNotification {
                title: "You are now an Auxiliary Teacher!".to_string(),
                text: format!("You've been assigned as aux teacher for {}", p.course_name),
            },
            Self::NewTask(p) => PushNotification {
                title: format!("New Task in {}", p.course_name),
                text: p.title.clone(),
            },
            Self::TaskHandingConfirmation(p) => PushNotification {
                title: "Task Submitted Successfully".to_string(),
                text: format!("Your submission for {} has been received", p.task_title),
            },
            Self::TaskFeedback(p) => PushNotification {
                title: format!("{} provided feedback on your task", p.teacher_name),
                text: format!("You received feedback for {}", p.task_title),
            },
            Self::NewAnswer(p) => PushNotification {
                title: "New Student Submission".to_string(),
                text: format!("{} submitted {}", p.student_name, p.task_title),
            },
            Self::NewForumComment(p) => PushNotification {
                title: format!("{} has commented on a post", p.user_name),
                text: format!("There is a new comment on the post: {}", p.post_title),
            },
            Self::PlagiarismDetected(p) => PushNotification {
                title: "Plagiarism Alert".to_string(),
                text: format!(
                    "{} flagged for plagiarism in {} ({:.1}% similarity)",
                    p.student_name,
                    p.task_title,
                    p.similarity_score * 100.0
                ),
            },
            Self::RulesUpdate(p) => PushNotification {
                title: "Terms and Conditions Updated".to_string(),
                text: format!(
                    "Hi {}, our terms and conditions were updated on {}. Tap to review them.",
                    p.name, p.updated_at
                ),
            },
        }
    }
}
