use serde::Deserialize;
use validator::{Validate, ValidateUrl, ValidationError};

/// Optional link fields: a URL, or "" to clear the value
fn url_or_empty(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("Must be a valid URL".into()))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyProfileInput {
    #[validate(length(min = 2, message = "Company name must be at least 2 characters"))]
    pub company_name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    #[validate(custom(function = "url_or_empty"))]
    pub website: Option<String>,
    pub location: Option<String>,
    pub size: Option<String>,
    #[validate(custom(function = "url_or_empty"))]
    pub logo: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobSeekerProfileInput {
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(range(min = 0, message = "Experience cannot be negative"))]
    pub experience: Option<i32>,
    pub education: Option<String>,
    pub bio: Option<String>,
    #[validate(custom(function = "url_or_empty"))]
    pub resume: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(website: Option<&str>) -> CompanyProfileInput {
        CompanyProfileInput {
            company_name: "Acme Hiring".into(),
            description: None,
            industry: Some("Recruiting".into()),
            website: website.map(str::to_string),
            location: None,
            size: None,
            logo: None,
        }
    }

    #[test]
    fn website_may_be_url_empty_or_absent() {
        assert!(company(Some("https://acme.example")).validate().is_ok());
        assert!(company(Some("")).validate().is_ok());
        assert!(company(None).validate().is_ok());
    }

    #[test]
    fn rejects_malformed_website() {
        let errors = company(Some("acme dot com")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
    }

    #[test]
    fn job_seeker_experience_and_resume() {
        let profile = JobSeekerProfileInput {
            experience: Some(-1),
            resume: Some("not a link".into()),
            ..Default::default()
        };
        let errors = profile.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("experience"));
        assert!(fields.contains_key("resume"));

        let profile = JobSeekerProfileInput {
            experience: Some(4),
            resume: Some("http://localhost:8080/uploads/resume/cv.pdf".into()),
            ..Default::default()
        };
        assert!(profile.validate().is_ok());
    }
}
