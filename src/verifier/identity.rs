use std::env;
use std::fs;

/// Host facts used to default an [`Identity`], read once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub admin_contact: Option<String>,
}

impl HostEnvironment {
    /// Reads `HOSTNAME` (falling back to `/etc/hostname`), `USER` and
    /// `SERVER_ADMIN`.
    pub fn capture() -> Self {
        let hostname = non_empty(env::var("HOSTNAME").ok()).or_else(|| {
            non_empty(
                fs::read_to_string("/etc/hostname")
                    .ok()
                    .map(|s| s.trim().to_string()),
            )
        });
        Self {
            hostname,
            user: non_empty(env::var("USER").ok()),
            admin_contact: non_empty(env::var("SERVER_ADMIN").ok()),
        }
    }
}

/// Who we claim to be: the `EHLO`/`HELO` name and the `MAIL FROM` address.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub fqdn: String,
    pub sender: String,
}

impl Identity {
    pub fn new(fqdn: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            sender: sender.into(),
        }
    }

    /// Fills in missing values from `env`.
    ///
    /// `fqdn`: explicit, host name, `localhost`.
    /// `sender`: explicit, `<user>@<fqdn>`, admin contact, `postmaster@<fqdn>`.
    pub fn resolve(fqdn: Option<&str>, sender: Option<&str>, env: &HostEnvironment) -> Self {
        let fqdn = non_empty(fqdn.map(str::to_string))
            .or_else(|| env.hostname.clone())
            .unwrap_or_else(|| "localhost".to_string());
        let sender = non_empty(sender.map(str::to_string))
            .or_else(|| env.user.as_ref().map(|user| format!("{user}@{fqdn}")))
            .or_else(|| env.admin_contact.clone())
            .unwrap_or_else(|| format!("postmaster@{fqdn}"));
        Self { fqdn, sender }
    }

    pub fn from_host(fqdn: Option<&str>, sender: Option<&str>) -> Self {
        Self::resolve(fqdn, sender, &HostEnvironment::capture())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(hostname: Option<&str>, user: Option<&str>, admin: Option<&str>) -> HostEnvironment {
        HostEnvironment {
            hostname: hostname.map(Into::into),
            user: user.map(Into::into),
            admin_contact: admin.map(Into::into),
        }
    }

    #[test]
    fn explicit_values_win() {
        let id = Identity::resolve(
            Some("mx.mine.test"),
            Some("probe@mine.test"),
            &env(Some("host"), Some("bob"), Some("admin@host")),
        );
        assert_eq!(id, Identity::new("mx.mine.test", "probe@mine.test"));
    }

    #[test]
    fn sender_defaults_to_user_at_fqdn() {
        let id = Identity::resolve(None, None, &env(Some("box.test"), Some("bob"), None));
        assert_eq!(id, Identity::new("box.test", "bob@box.test"));
    }

    #[test]
    fn user_uses_explicit_fqdn() {
        let id = Identity::resolve(Some("mx.mine.test"), Some(""), &env(None, Some("bob"), None));
        assert_eq!(id.sender, "bob@mx.mine.test");
    }

    #[test]
    fn admin_contact_then_postmaster() {
        let id = Identity::resolve(None, None, &env(None, None, Some("admin@corp.test")));
        assert_eq!(id, Identity::new("localhost", "admin@corp.test"));

        let id = Identity::resolve(Some("box.test"), None, &HostEnvironment::default());
        assert_eq!(id.sender, "postmaster@box.test");
    }
}
