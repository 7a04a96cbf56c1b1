use crate::graphql::{GraphqlResult, IssueSummary, LinearGraphqlClient, TeamSummary};

/// Team listing and per-team issue lookups.
#[derive(Clone)]
pub struct TeamService {
    client: LinearGraphqlClient,
}

impl TeamService {
    pub fn new(client: LinearGraphqlClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> GraphqlResult<Vec<TeamSummary>> {
        self.client.teams().await
    }

    /// Issues of one team in display order.
    pub async fn issues(&self, team_id: &str) -> GraphqlResult<Vec<IssueSummary>> {
        let mut issues = self.client.team_issues(team_id).await?;
        sort_for_display(&mut issues);
        Ok(issues)
    }
}

/// Order issues by their sort key; ties keep the order the API returned.
pub fn sort_for_display(issues: &mut [IssueSummary]) {
    issues.sort_by(|a, b| a.sort_order.total_cmp(&b.sort_order));
}
