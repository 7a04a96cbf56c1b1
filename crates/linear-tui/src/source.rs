use std::future::Future;

use anyhow::{Context, Result};
use linear_core::graphql::{IssueDetail, IssueSummary, LinearGraphqlClient, TeamSummary};
use linear_core::services::issues::IssueService;
use linear_core::services::teams::TeamService;

/// Read-only access to the data the panels display.
pub trait DataSource: Send + Sync + 'static {
    fn fetch_teams(&self) -> impl Future<Output = Result<Vec<TeamSummary>>> + Send;

    fn fetch_team_issues(
        &self,
        team_id: &str,
    ) -> impl Future<Output = Result<Vec<IssueSummary>>> + Send;

    fn fetch_issue_detail(&self, issue_id: &str)
        -> impl Future<Output = Result<IssueDetail>> + Send;
}

/// `DataSource` backed by the Linear GraphQL API.
#[derive(Clone)]
pub struct LinearSource {
    teams: TeamService,
    issues: IssueService,
}

impl LinearSource {
    pub fn new(client: LinearGraphqlClient) -> Self {
        Self {
            teams: TeamService::new(client.clone()),
            issues: IssueService::new(client),
        }
    }
}

impl DataSource for LinearSource {
    async fn fetch_teams(&self) -> Result<Vec<TeamSummary>> {
        self.teams.list().await.context("failed to fetch teams")
    }

    async fn fetch_team_issues(&self, team_id: &str) -> Result<Vec<IssueSummary>> {
        self.teams
            .issues(team_id)
            .await
            .with_context(|| format!("failed to fetch issues for team {team_id}"))
    }

    async fn fetch_issue_detail(&self, issue_id: &str) -> Result<IssueDetail> {
        self.issues
            .get(issue_id)
            .await
            .with_context(|| format!("failed to fetch issue {issue_id}"))
    }
}
