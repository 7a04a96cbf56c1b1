use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::auth::AuthSession;

const USER_AGENT: &str = concat!("linear-tui/", env!("CARGO_PKG_VERSION"));
const TEAM_ISSUES_PAGE: i64 = 50;
const COMMENTS_PAGE: i64 = 50;

/// Errors returned by the GraphQL client.
#[derive(Debug, Error)]
pub enum GraphqlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} body: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("invalid GraphQL endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("GraphQL returned errors: {}", join_messages(.0))]
    ResponseErrors(Vec<GraphqlResponseError>),
    #[error("failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("requested resource not found")]
    NotFound,
}

pub type GraphqlResult<T> = Result<T, GraphqlError>;

fn join_messages(errors: &[GraphqlResponseError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Minimal GraphQL client for interacting with Linear.
#[derive(Debug, Clone)]
pub struct LinearGraphqlClient {
    http: Client,
    endpoint: Url,
    auth_header: String,
}

impl LinearGraphqlClient {
    /// Build a client posting to `endpoint` with the session's credential.
    pub fn with_endpoint(session: &AuthSession, endpoint: &str) -> GraphqlResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            endpoint,
            auth_header: session.authorization_header(),
        })
    }

    /// Fetch every team visible to the credential.
    pub async fn teams(&self) -> GraphqlResult<Vec<TeamSummary>> {
        #[derive(Deserialize)]
        struct TeamsEnvelope {
            teams: Connection<TeamSummary>,
        }

        const QUERY: &str = r#"
            query Teams {
                teams {
                    nodes {
                        id
                        key
                        name
                        issueCount
                    }
                }
            }
        "#;

        let data: TeamsEnvelope = self.query(QUERY, ()).await?;
        Ok(data.teams.nodes)
    }

    /// Fetch the issues belonging to one team.
    pub async fn team_issues(&self, team_id: &str) -> GraphqlResult<Vec<IssueSummary>> {
        #[derive(Serialize)]
        struct Variables<'a> {
            id: &'a str,
            first: i64,
        }

        #[derive(Deserialize)]
        struct TeamEnvelope {
            team: Option<TeamIssues>,
        }

        #[derive(Deserialize)]
        struct TeamIssues {
            issues: Connection<IssueSummary>,
        }

        const QUERY: &str = r#"
            query TeamIssues($id: String!, $first: Int!) {
                team(id: $id) {
                    issues(first: $first) {
                        nodes {
                            id
                            identifier
                            title
                            description
                            sortOrder
                        }
                    }
                }
            }
        "#;

        let data: TeamEnvelope = self
            .query(
                QUERY,
                Variables {
                    id: team_id,
                    first: TEAM_ISSUES_PAGE,
                },
            )
            .await?;

        let team = data.team.ok_or(GraphqlError::NotFound)?;
        Ok(team.issues.nodes)
    }

    /// Fetch a single issue, including its comments, by id.
    pub async fn issue(&self, issue_id: &str) -> GraphqlResult<IssueDetail> {
        #[derive(Serialize)]
        struct Variables<'a> {
            id: &'a str,
            comments: i64,
        }

        #[derive(Deserialize)]
        struct IssueEnvelope {
            issue: Option<RawIssueDetail>,
        }

        const QUERY: &str = r#"
            query Issue($id: String!, $comments: Int!) {
                issue(id: $id) {
                    id
                    identifier
                    title
                    description
                    url
                    createdAt
                    updatedAt
                    state { name }
                    comments(first: $comments) {
                        nodes {
                            body
                            createdAt
                            user { name displayName }
                        }
                    }
                }
            }
        "#;

        let data: IssueEnvelope = self
            .query(
                QUERY,
                Variables {
                    id: issue_id,
                    comments: COMMENTS_PAGE,
                },
            )
            .await?;

        data.issue
            .map(IssueDetail::from)
            .ok_or(GraphqlError::NotFound)
    }

    async fn query<V, R>(&self, query: &str, variables: V) -> GraphqlResult<R>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        #[derive(Serialize)]
        struct Request<'a, V> {
            query: &'a str,
            variables: V,
        }

        let response: GraphqlEnvelope<R> = self.post(Request { query, variables }).await?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            return Err(GraphqlError::ResponseErrors(errors));
        }

        response.data.ok_or(GraphqlError::NotFound)
    }

    async fn post<T, R>(&self, body: T) -> GraphqlResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, "GraphQL request rejected");
            return Err(GraphqlError::HttpStatus { status, body: text });
        }

        let payload = serde_json::from_str::<R>(&text)?;
        Ok(payload)
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlResponseError>>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

/// A team as listed in the teams panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub id: String,
    pub key: String,
    pub name: String,
    pub issue_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    /// Position of the issue within its team; only comparable inside one team.
    pub sort_order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDetail {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<IssueComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueComment {
    pub body: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponseError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssueDetail {
    id: String,
    identifier: String,
    title: String,
    description: Option<String>,
    url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    state: Option<RawState>,
    comments: Connection<RawComment>,
}

#[derive(Debug, Deserialize)]
struct RawState {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComment {
    body: String,
    created_at: DateTime<Utc>,
    user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    name: Option<String>,
    display_name: Option<String>,
}

impl From<RawIssueDetail> for IssueDetail {
    fn from(raw: RawIssueDetail) -> Self {
        let comments = raw
            .comments
            .nodes
            .into_iter()
            .map(|comment| IssueComment {
                body: comment.body,
                author: comment
                    .user
                    .and_then(|user| user.display_name.or(user.name)),
                created_at: comment.created_at,
            })
            .collect();

        Self {
            id: raw.id,
            identifier: raw.identifier,
            title: raw.title,
            description: raw.description,
            url: raw.url,
            state: raw.state.map(|state| state.name),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> LinearGraphqlClient {
        LinearGraphqlClient::with_endpoint(
            &AuthSession::new_api_key("test-key".into()),
            &format!("{}{}", server.base_url(), "/graphql"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn teams_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("Authorization", "test-key");
            then.status(200).json_body_obj(&serde_json::json!({
                "data": {
                    "teams": {
                        "nodes": [
                            { "id": "team-a", "key": "A", "name": "Alpha", "issueCount": 5 },
                            { "id": "team-b", "key": "B", "name": "Beta", "issueCount": 0 }
                        ]
                    }
                }
            }));
        });

        let teams = client_for(&server).teams().await.unwrap();
        mock.assert();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Alpha");
        assert_eq!(teams[0].issue_count, 5);
        assert_eq!(teams[1].key, "B");
    }

    #[tokio::test]
    async fn team_issues_sends_team_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql")
                .json_body_partial(r#"{ "variables": { "id": "team-a" } }"#);
            then.status(200).json_body_obj(&serde_json::json!({
                "data": {
                    "team": {
                        "issues": {
                            "nodes": [
                                {
                                    "id": "issue-1",
                                    "identifier": "A-1",
                                    "title": "Fix login bug",
                                    "description": null,
                                    "sortOrder": -12.5
                                }
                            ]
                        }
                    }
                }
            }));
        });

        let issues = client_for(&server).team_issues("team-a").await.unwrap();
        mock.assert();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].identifier, "A-1");
        assert_eq!(issues[0].sort_order, -12.5);
        assert!(issues[0].description.is_none());
    }

    #[tokio::test]
    async fn team_issues_missing_team_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200)
                .json_body_obj(&serde_json::json!({ "data": { "team": null } }));
        });

        let err = client_for(&server).team_issues("gone").await.unwrap_err();
        assert!(matches!(err, GraphqlError::NotFound));
    }

    #[tokio::test]
    async fn issue_includes_comments_in_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body_obj(&serde_json::json!({
                "data": {
                    "issue": {
                        "id": "issue-1",
                        "identifier": "A-1",
                        "title": "Fix login bug",
                        "description": "Users cannot log in",
                        "url": "https://linear.app/a/issue/A-1",
                        "createdAt": "2024-07-01T12:00:00.000Z",
                        "updatedAt": "2024-07-02T12:00:00.000Z",
                        "state": { "name": "In Progress" },
                        "comments": {
                            "nodes": [
                                {
                                    "body": "first",
                                    "createdAt": "2024-07-01T13:00:00.000Z",
                                    "user": { "name": "Ada Lovelace", "displayName": "ada" }
                                },
                                {
                                    "body": "second",
                                    "createdAt": "2024-07-01T14:00:00.000Z",
                                    "user": null
                                }
                            ]
                        }
                    }
                }
            }));
        });

        let issue = client_for(&server).issue("issue-1").await.unwrap();
        assert_eq!(issue.state.as_deref(), Some("In Progress"));
        let bodies: Vec<_> = issue.comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, ["first", "second"]);
        assert_eq!(issue.comments[0].author.as_deref(), Some("ada"));
        assert!(issue.comments[1].author.is_none());
    }

    #[tokio::test]
    async fn response_errors_are_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body_obj(&serde_json::json!({
                "data": null,
                "errors": [{ "message": "Entity not found", "path": ["issue"] }]
            }));
        });

        let err = client_for(&server).issue("missing").await.unwrap_err();
        assert!(matches!(err, GraphqlError::ResponseErrors(_)));
        assert_eq!(err.to_string(), "GraphQL returned errors: Entity not found");
    }

    #[tokio::test]
    async fn extra_error_fields_are_ignored() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body_obj(&serde_json::json!({
                "data": null,
                "errors": [
                    {
                        "message": "Rate limited",
                        "path": ["teams", 0],
                        "locations": [{ "line": 1, "column": 3 }],
                        "extensions": { "code": "RATELIMITED" }
                    },
                    { "message": "Try again later" }
                ]
            }));
        });

        let err = client_for(&server).teams().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "GraphQL returned errors: Rate limited; Try again later"
        );
    }

    #[tokio::test]
    async fn http_status_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(401).body("unauthorized");
        });

        let err = client_for(&server).teams().await.unwrap_err();
        match err {
            GraphqlError::HttpStatus { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).body("not json");
        });

        let err = client_for(&server).teams().await.unwrap_err();
        assert!(matches!(err, GraphqlError::Deserialize(_)));
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let err = LinearGraphqlClient::with_endpoint(
            &AuthSession::new_api_key("k".into()),
            "not a url",
        )
        .unwrap_err();
        assert!(matches!(err, GraphqlError::InvalidEndpoint(_)));
    }
}
