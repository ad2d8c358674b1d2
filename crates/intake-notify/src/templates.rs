//! HTML templates for the two notification emails.
//!
//! Every piece of visitor-supplied text is HTML-escaped before it is
//! interpolated; subjects are plain text and left as-is.

use intake_core::{email::OutgoingEmail, message::StoredMessage};

use crate::notifier::NotifierConfig;

const CONTAINER: &str =
  "font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;";
const HEADING: &str = "color: #3B82F6; margin-bottom: 20px;";
const PANEL: &str = "background: #F3F4F6; padding: 20px; border-radius: 8px; margin: 20px 0;";
const FIELD: &str = "margin: 0 0 10px 0;";
const BODY: &str = "margin: 0; white-space: pre-wrap; line-height: 1.6;";
const BUTTON: &str = "background: #3B82F6; color: white; padding: 10px 20px; \
                      text-decoration: none; border-radius: 5px; display: inline-block;";

pub const ACKNOWLEDGMENT_SUBJECT: &str = "Thanks for reaching out!";

/// The confirmation sent back to the visitor.
pub fn acknowledgment(msg: &StoredMessage, config: &NotifierConfig) -> OutgoingEmail {
  let content = &msg.content;
  let mut lines = vec![
    format!(r#"<div style="{CONTAINER}">"#),
    format!(r#"  <h2 style="{HEADING}">Thank you for your message!</h2>"#),
    format!("  <p>Hi {},</p>", escape_html(content.name())),
    "  <p>Thank you for reaching out. Your message has been received and you \
     will get a reply as soon as possible.</p>"
      .to_owned(),
    format!(r#"  <div style="{PANEL}">"#),
    r#"    <h3 style="margin: 0 0 10px 0; color: #374151;">Your Message:</h3>"#.to_owned(),
  ];
  if let Some(topic) = content.topic() {
    lines.push(field("Topic", topic));
  }
  lines.extend([
    format!(r#"    <p style="{BODY}">{}</p>"#, escape_html(content.message())),
    "  </div>".to_owned(),
    format!("  <p>Best regards,<br>{}</p>", escape_html(&config.owner_name)),
    r#"  <hr style="border: none; border-top: 1px solid #E5E7EB; margin: 30px 0;">"#.to_owned(),
    r#"  <p style="font-size: 12px; color: #6B7280;">This is an automated response. Please do not reply to this email.</p>"#.to_owned(),
    "</div>".to_owned(),
  ]);

  OutgoingEmail {
    from:    config.acknowledgment_from.clone(),
    to:      vec![content.email().to_owned()],
    subject: ACKNOWLEDGMENT_SUBJECT.to_owned(),
    html:    lines.join("\n"),
  }
}

/// The alert sent to the site owner, carrying the full message and a reply
/// link.
pub fn owner_alert(msg: &StoredMessage, config: &NotifierConfig) -> OutgoingEmail {
  let content = &msg.content;
  let name = escape_html(content.name());
  let mut lines = vec![
    format!(r#"<div style="{CONTAINER}">"#),
    format!(r#"  <h2 style="{HEADING}">New Contact Form Submission</h2>"#),
    format!(r#"  <div style="{PANEL}">"#),
    r#"    <h3 style="margin: 0 0 15px 0; color: #374151;">Contact Details:</h3>"#.to_owned(),
    field("Name", content.name()),
    field("Email", content.email()),
  ];
  if let Some(topic) = content.topic() {
    lines.push(field("Topic", topic));
  }
  for (key, value) in content.extensions() {
    lines.push(field(key, value));
  }
  lines.extend([
    field("Submitted", &msg.submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    field("Reference", &format!("#{}", msg.id)),
    "  </div>".to_owned(),
    r#"  <div style="background: #FFFFFF; border: 1px solid #E5E7EB; padding: 20px; border-radius: 8px;">"#.to_owned(),
    r#"    <h3 style="margin: 0 0 15px 0; color: #374151;">Message:</h3>"#.to_owned(),
    format!(r#"    <p style="{BODY}">{}</p>"#, escape_html(content.message())),
    "  </div>".to_owned(),
    r#"  <p style="margin-top: 20px;">"#.to_owned(),
    format!(
      r#"    <a href="{}" style="{BUTTON}">Reply to {name}</a>"#,
      escape_html(&reply_link(msg))
    ),
    "  </p>".to_owned(),
    "</div>".to_owned(),
  ]);

  OutgoingEmail {
    from:    config.alert_from.clone(),
    to:      vec![config.owner_address.clone()],
    subject: format!("New Contact Form Submission from {}", content.name()),
    html:    lines.join("\n"),
  }
}

/// One `<strong>label:</strong> value` row; both parts are escaped.
fn field(label: &str, value: &str) -> String {
  format!(
    r#"    <p style="{FIELD}"><strong>{}:</strong> {}</p>"#,
    escape_html(label),
    escape_html(value)
  )
}

/// A `mailto:` deep link that opens a reply to the visitor with a pre-filled
/// subject and greeting.
pub fn reply_link(msg: &StoredMessage) -> String {
  let content = &msg.content;
  // The address passed validation, so it holds exactly one `@`.
  let address = match content.email().split_once('@') {
    Some((local, domain)) => {
      format!("{}@{}", urlencoding::encode(local), urlencoding::encode(domain))
    }
    None => urlencoding::encode(content.email()).into_owned(),
  };
  let body = format!(
    "Hi {},\r\n\r\nThank you for reaching out...",
    content.name()
  );
  format!(
    "mailto:{address}?subject={}&body={}",
    urlencoding::encode("Re: Your inquiry"),
    urlencoding::encode(&body)
  )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}
