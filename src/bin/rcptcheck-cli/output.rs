use anyhow::{Result, bail};
use rcptcheck::{AddressError, Outcome};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct CheckRow {
    pub email: String,
    pub accepted: bool,
    pub code: i32,
    pub text: String,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub reasons: Vec<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl CheckRow {
    /// `last` is the verifier's recorded outcome, used for syntax errors.
    pub fn from_result(
        email: &str,
        result: Result<Outcome, AddressError>,
        last: (i32, &str),
    ) -> Self {
        match result {
            Ok(outcome) => Self {
                email: email.to_string(),
                accepted: outcome.accepted,
                code: outcome.reply_code,
                text: outcome.reply_text.clone(),
                reasons: Vec::new(),
                error: outcome.error.as_ref().map(|e| e.to_string()),
            },
            Err(err) => Self {
                email: email.to_string(),
                accepted: false,
                code: last.0,
                text: last.1.to_string(),
                reasons: err.reasons().to_vec(),
                error: None,
            },
        }
    }

    pub fn human_line(&self) -> String {
        let tag = if self.accepted { "[OK]      " } else { "[REJECTED]" };
        let mut line = format!("{tag} {} :: {} {}", self.email, self.code, self.text);
        if !self.reasons.is_empty() {
            line.push_str(&format!(" ({})", self.reasons.join("; ")));
        }
        if let Some(error) = &self.error {
            line.push_str(&format!(" [last error: {error}]"));
        }
        line
    }
}

pub fn emit(rows: &[CheckRow], format: &str) -> Result<()> {
    match format {
        "human" => {
            for row in rows {
                println!("{}", row.human_line());
            }
        }
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                println!("{}", serde_json::to_string_pretty(rows)?);
            }
            #[cfg(not(feature = "with-serde"))]
            {
                bail!("format=json nécessite la feature 'with-serde'");
            }
        }
        other => bail!("format inconnu '{other}', utilisez human|json"),
    }
    Ok(())
}
