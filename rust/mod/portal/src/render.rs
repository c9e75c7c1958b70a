//! Request list rendering for the dashboard.

use chrono::DateTime;

use crate::model::{Request, RequestStatus};

pub const EMPTY_LIST_HTML: &str =
    "<p>No requests yet. Submit a request to see status here.</p>";

/// `library_fine` → `Library Fine`.
pub fn format_purpose(purpose: &str) -> String {
    let spaced = purpose.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut word_start = true;
    for c in spaced.chars() {
        if word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = !c.is_alphanumeric();
    }
    out
}

/// Human-readable submission time; the raw string if it does not parse.
pub fn format_date(date: &str) -> String {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Badge class and label for a status.
pub fn badge(status: RequestStatus) -> (&'static str, &'static str) {
    (status.badge_class(), status.as_str())
}

fn escape_html(text: &str) -> String {
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

/// Status list markup. Approved requests get a download control; dev mode
/// adds approve/reject controls to every item.
pub fn requests_html(requests: &[Request], dev_mode: bool) -> String {
    if requests.is_empty() {
        return EMPTY_LIST_HTML.to_string();
    }
    requests
        .iter()
        .map(|r| request_item_html(r, dev_mode))
        .collect::<Vec<_>>()
        .join("\n")
}

fn request_item_html(r: &Request, dev_mode: bool) -> String {
    let (class, label) = badge(r.status);
    let id = escape_html(&r.id);

    let mut details = format!(
        r#"<p><strong>Status:</strong> <span class="badge-text {class}">{label}</span></p>"#
    );
    if !r.reason.is_empty() {
        details.push_str(&format!(
            "<p><strong>Reason:</strong> {}</p>",
            escape_html(&r.reason)
        ));
    }
    details.push_str(&format!(
        r#"<p class="status-date">Submitted: {}</p>"#,
        escape_html(&format_date(&r.date))
    ));
    if r.status == RequestStatus::Approved {
        details.push_str(&format!(
            r#"<button class="btn btn-small" data-action="download" data-request-id="{id}">Download Document</button>"#
        ));
    }
    if dev_mode {
        details.push_str(&format!(
            r#"<div class="dev-actions"><button class="btn btn-small" data-action="approve" data-request-id="{id}">Approve</button> <button class="btn btn-small btn-danger" data-action="reject" data-request-id="{id}">Reject</button></div>"#
        ));
    }

    format!(
        r#"<div class="status-item" data-request-id="{id}">
    <div class="status-header">
        <div class="status-info">
            <h4>Request ID: {id}</h4>
            <p class="status-purpose">Purpose: {purpose}</p>
        </div>
        <span class="status-badge {class}">{label}</span>
    </div>
    <div class="status-details">{details}</div>
</div>"#,
        purpose = escape_html(&format_purpose(&r.purpose)),
    )
}

/// Fixed-width table for terminals.
pub fn requests_table(requests: &[Request]) -> String {
    if requests.is_empty() {
        return "No requests yet.".to_string();
    }
    let mut out = format!(
        "{:<10} {:<10} {:<24} {:<9} {:<19} {}\n",
        "ID", "TYPE", "PURPOSE", "STATUS", "SUBMITTED", "REASON"
    );
    for r in requests {
        out.push_str(&format!(
            "{:<10} {:<10} {:<24} {:<9} {:<19} {}\n",
            r.id,
            r.kind.as_str(),
            format_purpose(&r.purpose),
            r.status.as_str(),
            format_date(&r.date),
            r.reason
        ));
    }
    out
}
