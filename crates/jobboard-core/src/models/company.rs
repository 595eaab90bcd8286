use serde::Serialize;

/// Body for `POST /auth/companies/register`. The password confirmation is
/// checked by the caller and never sent.
#[derive(Clone, Serialize)]
pub struct CompanyRegistration {
    pub name: String,
    pub nit: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CompanyRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyRegistration")
            .field("name", &self.name)
            .field("nit", &self.nit)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let reg = CompanyRegistration {
            name: "Acme".to_string(),
            nit: "123456789".to_string(),
            email: "hr@acme.test".to_string(),
            password: "hunter22".to_string(),
        };
        let debug = format!("{:?}", reg);
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("hr@acme.test"));
    }
}
