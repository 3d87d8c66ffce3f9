use serde::{Deserialize, Serialize};

/// A cooperative member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member code, the record key.
    pub member_code: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role within the cooperative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Whether the member acts as a proxy.
    #[serde(default)]
    pub is_proxy: bool,
}

/// Filter for the member list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    /// Only proxies.
    pub proxy_only: bool,
    /// Only members with this role.
    pub role: Option<String>,
}

impl MemberFilter {
    /// Query parameters for `members/list`.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if self.proxy_only {
            query.push(("proxy_only".to_string(), "true".to_string()));
        }
        if let Some(role) = &self.role {
            query.push(("role".to_string(), role.clone()));
        }
        query
    }
}

/// A portal user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login email.
    pub email: String,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Whether the account is active.
    #[serde(default)]
    pub is_active: bool,
    /// Registration code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_member_filter_query() {
        assert!(MemberFilter::default().query().is_empty());

        let filter = MemberFilter {
            proxy_only: true,
            role: Some("board".to_string()),
        };
        assert_eq!(
            filter.query(),
            vec![
                ("proxy_only".to_string(), "true".to_string()),
                ("role".to_string(), "board".to_string()),
            ]
        );
    }
}
