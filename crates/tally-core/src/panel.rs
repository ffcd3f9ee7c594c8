//! Panel endpoint addressing shared by the identity source and the traffic sink.

/// Where and as whom a node talks to the billing panel.
///
/// Every panel request carries the node token, node id and node type as
/// query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEndpoint {
    base: String,
    token: String,
    node_id: u32,
    node_type: String,
}

impl PanelEndpoint {
    /// Create an endpoint. Trailing slashes on `base` are ignored.
    pub fn new(
        base: impl Into<String>,
        token: impl Into<String>,
        node_id: u32,
        node_type: impl Into<String>,
    ) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            token: token.into(),
            node_id,
            node_type: node_type.into(),
        }
    }

    /// Full URL for a panel path such as [`USER_LIST_PATH`](crate::USER_LIST_PATH).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Query parameters identifying this node.
    pub fn query(&self) -> [(&'static str, String); 3] {
        [
            ("token", self.token.clone()),
            ("node_id", self.node_id.to_string()),
            ("node_type", self.node_type.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_strips_trailing_slash() {
        let ep = PanelEndpoint::new("https://panel.example.com/", "t", 3, "hysteria");
        assert_eq!(
            ep.url(crate::USER_LIST_PATH),
            "https://panel.example.com/api/v1/server/UniProxy/user"
        );
    }

    #[test]
    fn query_carries_node_identity() {
        let ep = PanelEndpoint::new("https://p", "secret", 12, "hysteria");
        let q = ep.query();
        assert_eq!(q[0], ("token", "secret".to_string()));
        assert_eq!(q[1], ("node_id", "12".to_string()));
        assert_eq!(q[2], ("node_type", "hysteria".to_string()));
    }
}
