use crate::api::fee::models::format_amount;

const BRAND: &str = "JobPortal Pro";

/// Escape text interpolated into HTML bodies
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn welcome(name: &str) -> String {
    format!(
        "<h1>Welcome to {brand}!</h1>\n<p>Hi {name},</p>\n<p>Thank you for joining our platform. We're excited to have you here!</p>",
        brand = BRAND,
        name = escape(name),
    )
}

pub fn application_received(job_title: &str, applicant_name: &str) -> String {
    format!(
        "<h1>New Application Received</h1>\n<p>You have received a new application for {} from {}.</p>\n<p>Login to your dashboard to review it.</p>",
        escape(job_title),
        escape(applicant_name),
    )
}

pub fn application_status_update(job_title: &str, status: &str) -> String {
    format!(
        "<h1>Application Status Update</h1>\n<p>Your application for {} has been updated to: <strong>{}</strong></p>",
        escape(job_title),
        escape(status),
    )
}

pub fn payment_received(amount_cents: i32, currency: &str, job_title: &str) -> String {
    format!(
        "<h1>Payment Confirmed</h1>\n<p>We have received your payment of {} {} for the application to {}.</p>\n<p>Your application is now being processed.</p>",
        format_amount(amount_cents),
        escape(&currency.to_uppercase()),
        escape(job_title),
    )
}

pub fn refund_processed(amount_cents: i32, currency: &str) -> String {
    format!(
        "<h1>Refund Processed</h1>\n<p>A refund of {} {} has been processed to your account.</p>\n<p>It should appear in your account within 5-10 business days.</p>",
        format_amount(amount_cents),
        escape(&currency.to_uppercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_user_supplied_text() {
        let html = application_received("Rust <Engineer>", "Ann & Bo");
        assert!(html.contains("Rust &lt;Engineer&gt;"));
        assert!(html.contains("Ann &amp; Bo"));
    }

    #[test]
    fn formats_amounts_in_major_units() {
        let html = payment_received(1050, "usd", "Backend Developer");
        assert!(html.contains("10.50 USD"));

        let html = refund_processed(99900, "inr");
        assert!(html.contains("999.00 INR"));
    }

    #[test]
    fn status_update_names_status() {
        let html = application_status_update("QA", "INTERVIEW_SCHEDULED");
        assert!(html.contains("<strong>INTERVIEW_SCHEDULED</strong>"));
    }
}
