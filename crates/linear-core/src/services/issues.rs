use crate::graphql::{GraphqlResult, IssueDetail, LinearGraphqlClient};

/// Provides higher-level helpers around Linear issues.
#[derive(Clone)]
pub struct IssueService {
    client: LinearGraphqlClient,
}

impl IssueService {
    pub fn new(client: LinearGraphqlClient) -> Self {
        Self { client }
    }

    /// Full issue record, comments included.
    pub async fn get(&self, issue_id: &str) -> GraphqlResult<IssueDetail> {
        self.client.issue(issue_id).await
    }
}
