use minijinja::{context, Environment};

use super::{EmailMessage, MailError};

const ALERT_HTML: &str = "alert_email.html";
const ALERT_TEXT: &str = "alert_email.txt";
const VERIFICATION_HTML: &str = "verification_email.html";
const VERIFICATION_TEXT: &str = "verification_email.txt";

/// Values shown in an air quality alert email
#[derive(Debug, Clone)]
pub struct AlertEmail<'a> {
    pub city_name: &'a str,
    pub aqi: i32,
    pub priority_label: &'a str,
    pub priority_color: &'a str,
    pub message: &'a str,
    /// Already formatted as `dd/MM/yyyy HH:mm`
    pub timestamp: &'a str,
}

/// Email bodies compiled into the binary
pub struct EmailTemplates {
    env: Environment<'static>,
}

impl EmailTemplates {
    pub fn new() -> Result<Self, MailError> {
        let mut env = Environment::new();
        let sources = [
            (
                ALERT_HTML,
                include_str!("../../../templates/emails/alert_email.html.jinja"),
            ),
            (
                ALERT_TEXT,
                include_str!("../../../templates/emails/alert_email.txt.jinja"),
            ),
            (
                VERIFICATION_HTML,
                include_str!("../../../templates/emails/verification_email.html.jinja"),
            ),
            (
                VERIFICATION_TEXT,
                include_str!("../../../templates/emails/verification_email.txt.jinja"),
            ),
        ];

        for (name, source) in sources {
            env.add_template(name, source)
                .map_err(|e| MailError::Template(format!("{}: {}", name, e)))?;
        }

        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, MailError> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| MailError::Template(format!("{}: {}", name, e)))
    }

    pub fn verification(
        &self,
        to: &str,
        username: &str,
        code: &str,
        expiry_minutes: i64,
    ) -> Result<EmailMessage, MailError> {
        let ctx = context! { username, code, expiry_minutes };

        Ok(EmailMessage {
            to: to.to_string(),
            subject: "Vérification de votre compte PolluAlert".to_string(),
            text_body: self.render(VERIFICATION_TEXT, ctx.clone())?,
            html_body: self.render(VERIFICATION_HTML, ctx)?,
        })
    }

    pub fn alert(&self, to: &str, alert: &AlertEmail<'_>) -> Result<EmailMessage, MailError> {
        let ctx = context! {
            city_name => alert.city_name,
            aqi => alert.aqi,
            priority => alert.priority_label,
            priority_color => alert.priority_color,
            message => alert.message,
            timestamp => alert.timestamp,
        };

        Ok(EmailMessage {
            to: to.to_string(),
            subject: format!("Alerte Qualité de l'Air - {}", alert.city_name),
            text_body: self.render(ALERT_TEXT, ctx.clone())?,
            html_body: self.render(ALERT_HTML, ctx)?,
        })
    }
}
