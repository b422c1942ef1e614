/*
 * Responsibility
 * - Courses の request/response DTO
 * - 形式チェック (フィールドの有無/型) は serde が担う。ビジネスルールは service 側
 * - instructor の再割当てにつながるフィールドは update DTO に存在しない
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Course, CourseDraft, CoursePatch, InstructorProfile};

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
}

impl From<CreateCourseRequest> for CourseDraft {
    fn from(req: CreateCourseRequest) -> Self {
        CourseDraft {
            title: req.title,
            description: req.description,
            price: req.price,
        }
    }
}

/// None のフィールドは据え置き。`instructor_id` は body に居ても無視される (deny せず drop)
#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl From<UpdateCourseRequest> for CoursePatch {
    fn from(req: UpdateCourseRequest) -> Self {
        CoursePatch {
            title: req.title,
            description: req.description,
            price: req.price,
        }
    }
}

/// enroll body。ソース API 互換でフィールド名は `user_id`
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct InstructorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
}

impl From<InstructorProfile> for InstructorResponse {
    fn from(p: InstructorProfile) -> Self {
        Self {
            username: p.username,
            email: p.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub instructor_id: Uuid,
    pub student_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<InstructorResponse>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            price: c.price,
            instructor_id: c.instructor_id,
            student_ids: c.student_ids,
            instructor: c.instructor.map(InstructorResponse::from),
        }
    }
}
