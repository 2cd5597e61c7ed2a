use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub branches: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub semester: i32,
}

/// Internships, hackathons, workshops and events share one collection; the
/// workshop listing is a type filter over it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "opportunity_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OpportunityType {
    Internship,
    Hackathon,
    Workshop,
    Event,
}

#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub opportunity_type: OpportunityType,
    pub location: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoursePageRequest {
    pub page_num: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectPageRequest {
    pub page_num: u16,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpportunityPageRequest {
    pub page_num: u16,
    pub opportunity_type: Option<OpportunityType>,
}
