use heck::ToSnakeCase;

/// Dotted path pointing into a JSON tree, e.g. `_links.profile.href`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePath(String);

impl SourcePath {
    /// Create a new source path from a string
    pub fn new(path: &str) -> Self {
        SourcePath(path.to_string())
    }

    /// Get the internal string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the dot separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Convert every segment from camelCase to snake_case.
    ///
    /// Segments without uppercase letters are kept as they are, so paths that
    /// already follow the snake_case convention (or start with `_`) survive
    /// the conversion untouched.
    pub fn to_snake_case(&self) -> SourcePath {
        let converted: Vec<String> = self
            .segments()
            .map(|segment| {
                if segment.chars().any(char::is_uppercase) {
                    segment.to_snake_case()
                } else {
                    segment.to_string()
                }
            })
            .collect();

        SourcePath(converted.join("."))
    }
}

impl std::fmt::Display for SourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_source_path_creation() {
        let path = SourcePath::new("_links.profile.href");
        assert_eq!(path.as_str(), "_links.profile.href");
        assert_eq!(
            path.segments().collect::<Vec<_>>(),
            vec!["_links", "profile", "href"]
        );
    }

    #[rstest]
    #[case("profileUrl", "profile_url")]
    #[case("HTTPStatus", "http_status")]
    #[case("registeredAt", "registered_at")]
    #[case("userID", "user_id")]
    #[case("Username", "username")]
    #[case("username", "username")]
    #[case("profile_url", "profile_url")]
    #[case("a", "a")]
    #[case("", "")]
    #[case("_links.profileLink.href", "_links.profile_link.href")]
    #[case("friends.0.firstName", "friends.0.first_name")]
    fn test_to_snake_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(SourcePath::new(input).to_snake_case().as_str(), expected);
    }

    #[test]
    fn test_to_snake_case_is_deterministic() {
        let path = SourcePath::new("lastLoginIPAddress");
        assert_eq!(path.to_snake_case(), path.to_snake_case());
        assert_eq!(path.to_snake_case().as_str(), "last_login_ip_address");
    }
}
