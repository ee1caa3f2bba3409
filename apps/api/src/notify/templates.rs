// Email bodies for report delivery.
// Replace: {name}, {access}

pub const REPORT_SUBJECT: &str =
    "Insights Unlocked: Your BIG 5 Personality Assessment Report is Ready!";

const REPORT_BODY_TEMPLATE: &str = r#"<p style="color: black;">Dear {name},</p>
<p style="color: black;">Thank you for completing the Big 5 Personality Test! Your personalized report is ready and provides detailed insights into your personality.</p>
<p style="color: black;"><strong>What's inside your report:</strong></p>
<ul style="color: black;">
  <li>A breakdown of your scores for each of the five personality traits</li>
  <li>Personalized insights based on your responses</li>
  <li>Practical tips for personal growth and development</li>
</ul>
<p style="color: black;">{access}</p>
<p style="color: black;">By understanding your personality, you can gain valuable insights that can enhance your personal and professional life.</p>
<p style="color: black;">We would love to hear your feedback. Reply to this email and share your thoughts with us.</p>"#;

const ATTACHMENT_ACCESS: &str = "Your report is attached to this email as a PDF.";
const LINK_ACCESS: &str = r#"You can access your report <a href="{link}">here</a>."#;

pub fn attachment_body(name: &str) -> String {
    REPORT_BODY_TEMPLATE
        .replace("{access}", ATTACHMENT_ACCESS)
        .replace("{name}", &html_escape::encode_text(name))
}

pub fn link_body(name: &str, link: &str) -> String {
    let access = LINK_ACCESS.replace(
        "{link}",
        &html_escape::encode_double_quoted_attribute(link),
    );
    REPORT_BODY_TEMPLATE
        .replace("{access}", &access)
        .replace("{name}", &html_escape::encode_text(name))
}
