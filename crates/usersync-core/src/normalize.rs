use usersync_types::models::UserProfile;
use usersync_types::upstream::UpstreamUser;

/// Flatten and clean a raw upstream payload into persistable fields.
pub fn normalize(raw: UpstreamUser) -> UserProfile {
    let company_name = raw
        .company
        .and_then(|c| c.name)
        .unwrap_or_default();

    UserProfile {
        id: raw.id,
        name: raw.name,
        username: raw.username,
        email: raw.email,
        website: normalize_website(&raw.website),
        company_name,
    }
}

/// Ensure a website URL carries a scheme, defaulting to https.
/// Empty input stays empty.
pub fn normalize_website(website: &str) -> String {
    if website.is_empty() {
        return String::new();
    }
    if website.starts_with("http://") || website.starts_with("https://") {
        return website.to_string();
    }
    format!("https://{website}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use usersync_types::upstream::UpstreamCompany;

    fn raw_user(website: &str, company: Option<UpstreamCompany>) -> UpstreamUser {
        UpstreamUser {
            id: 1,
            name: "Leanne Graham".into(),
            username: "bret".into(),
            email: "leanne@example.com".into(),
            website: website.into(),
            company,
        }
    }

    #[test]
    fn schemeless_website_gets_https() {
        assert_eq!(normalize_website("example.com"), "https://example.com");
    }

    #[test]
    fn existing_scheme_passes_through() {
        assert_eq!(normalize_website("http://example.com"), "http://example.com");
        assert_eq!(normalize_website("https://example.com"), "https://example.com");
    }

    #[test]
    fn empty_website_stays_empty() {
        assert_eq!(normalize_website(""), "");
    }

    #[test]
    fn website_normalization_is_idempotent() {
        for input in ["example.com", "http://example.com", "https://example.com", ""] {
            let once = normalize_website(input);
            assert_eq!(normalize_website(&once), once);
        }
    }

    #[test]
    fn company_name_is_extracted() {
        let profile = normalize(raw_user(
            "example.com",
            Some(UpstreamCompany {
                name: Some("Romaguera-Crona".into()),
            }),
        ));
        assert_eq!(profile.company_name, "Romaguera-Crona");
    }

    #[test]
    fn missing_company_becomes_empty_string() {
        let profile = normalize(raw_user("example.com", None));
        assert_eq!(profile.company_name, "");

        let profile = normalize(raw_user("example.com", Some(UpstreamCompany { name: None })));
        assert_eq!(profile.company_name, "");
    }

    #[test]
    fn other_fields_pass_through_verbatim() {
        let profile = normalize(raw_user("hildegard.org", None));
        assert_eq!(profile.id, 1);
        assert_eq!(profile.name, "Leanne Graham");
        assert_eq!(profile.username, "bret");
        assert_eq!(profile.email, "leanne@example.com");
        assert_eq!(profile.website, "https://hildegard.org");
    }
}
