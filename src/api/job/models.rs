use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Active,
    Closed,
    Draft,
}

fn salary_range(min: Option<i32>, max: Option<i32>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("salary_range")
            .with_message("Minimum salary cannot exceed maximum salary".into())),
        _ => Ok(()),
    }
}

fn new_job_salary_range(job: &NewJob) -> Result<(), ValidationError> {
    salary_range(job.salary_min, job.salary_max)
}

fn patch_salary_range(patch: &JobPatch) -> Result<(), ValidationError> {
    salary_range(patch.salary_min, patch.salary_max)
}

/// Job posting submitted by a company
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "new_job_salary_range"))]
pub struct NewJob {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,
    #[validate(length(min = 10, message = "Requirements must be at least 10 characters"))]
    pub requirements: String,
    #[validate(length(min = 2, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 2, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary_max: Option<i32>,
    #[validate(length(min = 20, message = "Guarantee terms must be at least 20 characters"))]
    pub guarantee_terms: String,
    #[validate(range(min = 1, max = 3650, message = "Guarantee period must be between 1 and 3650 days"))]
    pub guarantee_period_days: i32,
    pub status: Option<JobStatus>,
}

/// Partial job update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "patch_salary_range"))]
pub struct JobPatch {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 10, message = "Requirements must be at least 10 characters"))]
    pub requirements: Option<String>,
    #[validate(length(min = 2, message = "Category is required"))]
    pub category: Option<String>,
    #[validate(length(min = 2, message = "Location is required"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0, message = "Salary cannot be negative"))]
    pub salary_max: Option<i32>,
    #[validate(length(min = 20, message = "Guarantee terms must be at least 20 characters"))]
    pub guarantee_terms: Option<String>,
    #[validate(range(min = 1, max = 3650, message = "Guarantee period must be between 1 and 3650 days"))]
    pub guarantee_period_days: Option<i32>,
    pub status: Option<JobStatus>,
}

impl JobPatch {
    /// Salary bounds after applying this patch to `current`
    pub fn merged_salary(
        &self,
        current_min: Option<i32>,
        current_max: Option<i32>,
    ) -> (Option<i32>, Option<i32>) {
        (self.salary_min.or(current_min), self.salary_max.or(current_max))
    }

    pub fn check_salary_against(
        &self,
        current_min: Option<i32>,
        current_max: Option<i32>,
    ) -> Result<(), ValidationError> {
        let (min, max) = self.merged_salary(current_min, current_max);
        salary_range(min, max)
    }
}

/// Query string of `GET /jobs`
#[derive(Debug, Default, Deserialize)]
pub struct JobFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_salary: Option<i32>,
    pub search: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl JobFilter {
    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    pub fn location(&self) -> Option<&str> {
        non_empty(&self.location)
    }

    pub fn search(&self) -> Option<&str> {
        non_empty(&self.search)
    }
}
