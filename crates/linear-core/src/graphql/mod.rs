mod client;

pub use client::{
    GraphqlError, GraphqlResponseError, GraphqlResult, IssueComment, IssueDetail, IssueSummary,
    LinearGraphqlClient, TeamSummary,
};
