//! ClassConnect-branded HTML email rendering.
//!
//! All emails share one layout (header banner, content card, footer); each
//! notification contributes a subject, an accent color, and the content
//! paragraphs. Recipient-provided strings are HTML-escaped before
//! interpolation.

use crate::formats::Email;
use crate::notifications::{
    AuxTeacherAssignment, InscriptionConfirmation, NewAnswer, NewForumComment, NewTask,
    PlagiarismDetected, RulesUpdate, TaskFeedback, TaskHandingConfirmation, Welcome,
};

const INDIGO: &str = "#6366f1";
const GREEN: &str = "#059669";
const AMBER: &str = "#f59e0b";
const RED: &str = "#dc2626";

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, header: &str, accent: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <style>
        body {{
            background-color: #f4f7fb;
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 0;
            padding: 0;
        }}
        .container {{
            max-width: 520px;
            margin: 48px auto;
            background-color: #fff;
            border-radius: 18px;
            box-shadow: 0 8px 32px rgba(79, 70, 229, 0.08);
            overflow: hidden;
            border: 1px solid #e0e7ef;
        }}
        .header {{
            background: {accent};
            color: white;
            text-align: center;
            padding: 36px 24px 20px 24px;
            font-size: 28px;
            font-weight: 600;
            letter-spacing: 1px;
        }}
        .content {{
            padding: 32px 32px 24px 32px;
            text-align: left;
            font-size: 18px;
            color: #22223b;
        }}
        .content p {{
            margin: 18px 0;
        }}
        .card {{
            background-color: #f8fafc;
            border-left: 4px solid {accent};
            padding: 20px;
            margin: 20px 0;
            border-radius: 8px;
        }}
        .footer {{
            font-size: 13px;
            color: #8b95b6;
            text-align: center;
            padding: 18px 24px 22px 24px;
            background: #f8fafc;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">{header}</div>
        <div class="content">
{content}
        </div>
        <div class="footer">&copy; 2025 ClassConnect. All rights reserved.</div>
    </div>
</body>
</html>"#
    )
}

fn signature(accent: &str) -> String {
    format!(
        r#"<p>Happy learning!<br /><span style="color:{accent};font-weight:500;">The ClassConnect Team</span></p>"#
    )
}

pub(crate) fn welcome_email(p: &Welcome) -> Email {
    let name = escape(&p.name);
    let content = format!(
        "<p>Hi {name},</p>\n\
         <p>We're thrilled to welcome you to <b>ClassConnect</b>! Your account is ready, and your learning journey begins now.</p>\n\
         <p>Explore your dashboard, connect with classmates, and join your first class. If you need help, just reply to this email or visit our Help Center.</p>\n{}",
        signature(INDIGO)
    );
    Email {
        subject: "Welcome to ClassConnect!".to_string(),
        body: layout("Welcome to ClassConnect", "Welcome to ClassConnect!", INDIGO, &content),
    }
}

pub(crate) fn inscription_email(p: &InscriptionConfirmation) -> Email {
    let student = escape(&p.student_name);
    let course = escape(&p.course_name);
    let content = format!(
        "<p>Hi {student},</p>\n\
         <p>Your enrollment in <b>{course}</b> is confirmed. The course is now available from your ClassConnect dashboard.</p>\n{}",
        signature(GREEN)
    );
    Email {
        subject: format!("Course Enrollment Confirmed: {}", p.course_name),
        body: layout("Course Enrollment Confirmed", "Enrollment Confirmed", GREEN, &content),
    }
}

pub(crate) fn aux_teacher_email(p: &AuxTeacherAssignment) -> Email {
    let teacher = escape(&p.teacher_name);
    let course = escape(&p.course_name);
    let main_teacher = escape(&p.main_teacher);
    let content = format!(
        "<p>Hi {teacher},</p>\n\
         <p>You have been assigned as auxiliary teacher for <b>{course}</b>, working alongside {main_teacher}.</p>\n\
         <p>You can now manage tasks and review submissions for the course from your ClassConnect instructor dashboard.</p>\n{}",
        signature(INDIGO)
    );
    Email {
        subject: format!("Auxiliary Teacher Assignment: {}", p.course_name),
        body: layout("Auxiliary Teacher Assignment", "New Assignment", INDIGO, &content),
    }
}

pub(crate) fn new_task_email(p: &NewTask) -> Email {
    let course = escape(&p.course_name);
    let title = escape(&p.title);
    let description = escape(&p.description);
    let due = escape(&p.due_date);
    let content = format!(
        "<p>A new task was published in <b>{course}</b>.</p>\n\
         <div class=\"card\"><b>{title}</b><p>{description}</p><p>Due: {due}</p></div>\n\
         <p>Open ClassConnect to see the full assignment.</p>\n{}",
        signature(AMBER)
    );
    Email {
        subject: format!("New Task: {} - {}", p.title, p.course_name),
        body: layout("New Task", "New Task", AMBER, &content),
    }
}

pub(crate) fn task_handing_email(p: &TaskHandingConfirmation) -> Email {
    let student = escape(&p.student_name);
    let task = escape(&p.task_title);
    let course = escape(&p.course_name);
    let submitted = escape(&p.submitted_at);
    let solution = escape(&p.solution_text);
    let content = format!(
        "<p>Hi {student},</p>\n\
         <p>Your submission for <b>{task}</b> in {course} was received.</p>\n\
         <div class=\"card\"><p>Submitted: {submitted}</p><p>{solution}</p></div>\n{}",
        signature(GREEN)
    );
    Email {
        subject: format!("Task Submission Confirmed: {}", p.task_title),
        body: layout("Task Submission Confirmed", "Submission Received", GREEN, &content),
    }
}

pub(crate) fn task_feedback_email(p: &TaskFeedback) -> Email {
    let student = escape(&p.student_name);
    let task = escape(&p.task_title);
    let course = escape(&p.course_name);
    let teacher = escape(&p.teacher_name);
    let grade = escape(&p.grade);
    let feedback = escape(&p.feedback);
    let content = format!(
        "<p>Hi {student},</p>\n\
         <p>{teacher} reviewed your submission for <b>{task}</b> in {course}.</p>\n\
         <div class=\"card\"><p>Grade: <b>{grade}</b></p><p>{feedback}</p></div>\n{}",
        signature(INDIGO)
    );
    Email {
        subject: format!("Feedback Received: {}", p.task_title),
        body: layout("Task Feedback", "Feedback Received", INDIGO, &content),
    }
}

pub(crate) fn new_answer_email(p: &NewAnswer) -> Email {
    let teacher = escape(&p.teacher_name);
    let task = escape(&p.task_title);
    let student = escape(&p.student_name);
    let course = escape(&p.course_name);
    let submitted = escape(&p.submitted_at);
    let content = format!(
        "<p>Hi {teacher},</p>\n\
         <p>You have a new submission to review!</p>\n\
         <div class=\"card\"><b>{task}</b><p>Student: {student}</p><p>Course: {course}</p><p>Submitted: {submitted}</p></div>\n\
         <p>You can review the submission and provide feedback through your instructor dashboard.</p>\n{}",
        signature(AMBER)
    );
    Email {
        subject: format!("New Submission: {} by {}", p.task_title, p.student_name),
        body: layout("New Student Submission", "New Submission", AMBER, &content),
    }
}

pub(crate) fn forum_comment_email(p: &NewForumComment) -> Email {
    let user = escape(&p.user_name);
    let post = escape(&p.post_title);
    let comment = escape(&p.comment_content);
    let content = format!(
        "<p>{user} commented on <b>{post}</b>:</p>\n\
         <div class=\"card\"><p>{comment}</p></div>\n\
         <p>Open the forum on ClassConnect to reply.</p>\n{}",
        signature(INDIGO)
    );
    Email {
        subject: format!("New Comment on Post: {}", p.post_title),
        body: layout("New Forum Comment", "New Comment", INDIGO, &content),
    }
}

pub(crate) fn plagiarism_email(p: &PlagiarismDetected) -> Email {
    let teacher = escape(&p.teacher_name);
    let student = escape(&p.student_name);
    let task = escape(&p.task_title);
    let course = escape(&p.course_name);
    let preview = escape(&p.submission_preview);
    let detected = escape(&p.detected_at);
    let content = format!(
        "<p>Hi {teacher},</p>\n\
         <p>A submission by {student} for <b>{task}</b> in {course} was flagged for plagiarism.</p>\n\
         <div class=\"card\"><p>Similarity: <b>{:.1}%</b> across {} matches</p><p>{preview}</p><p>Detected: {detected}</p></div>\n\
         <p>Please review the case from your ClassConnect instructor dashboard.</p>",
        p.similarity_score * 100.0,
        p.match_count,
    );
    Email {
        subject: format!("Plagiarism Detected: {}", p.task_title),
        body: layout("Plagiarism Detected", "Plagiarism Alert", RED, &content),
    }
}

pub(crate) fn rules_update_email(p: &RulesUpdate) -> Email {
    let name = escape(&p.name);
    let updated = escape(&p.updated_at);
    let content = format!(
        "<p>Hi {name},</p>\n\
         <p>We updated the ClassConnect Terms and Conditions on {updated}. Please review the new terms the next time you sign in.</p>\n\
         <p>Using the platform after this date means you accept the updated terms.</p>",
    );
    Email {
        subject: "We updated our Terms and Conditions".to_string(),
        body: layout("Terms and Conditions Updated", "Terms Updated", INDIGO, &content),
    }
}
