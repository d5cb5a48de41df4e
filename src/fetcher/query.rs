//! GraphQL query text and wire types for the posts feed.

use crate::Post;
use serde::{Deserialize, Serialize};

/// Posts requested per page. The Product Hunt API caps `first` at 50.
pub const PAGE_SIZE: u32 = 50;

/// The posts feed query. Ordered newest-first, which is what the early-stop
/// heuristic in the pipeline relies on.
pub const POSTS_QUERY: &str = r#"
query Posts($first: Int!, $after: String) {
  posts(first: $first, after: $after, order: NEWEST) {
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      node {
        id
        name
        tagline
        url
        description
        website
        votesCount
        createdAt
        featuredAt
        makers {
          name
          username
        }
        user {
          name
          username
        }
      }
    }
  }
}
"#;

/// Request body: `{query, variables: {first, after}}`.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest {
    /// Query document
    pub query: &'static str,
    /// Pagination variables
    pub variables: PostsVariables,
}

/// Variables for [`POSTS_QUERY`].
#[derive(Debug, Serialize)]
pub struct PostsVariables {
    /// Page size
    pub first: u32,
    /// Resume cursor, `null` on the first page
    pub after: Option<String>,
}

impl GraphQlRequest {
    /// Build a posts request for one page.
    pub fn posts_page(after: Option<&str>) -> Self {
        Self {
            query: POSTS_QUERY,
            variables: PostsVariables {
                first: PAGE_SIZE,
                after: after.map(str::to_string),
            },
        }
    }
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    /// Payload, absent when the request failed outright
    pub data: Option<ResponseData>,
    /// GraphQL-level errors, if any
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// One GraphQL-level error.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    /// Human-readable message
    pub message: String,
}

/// `data` payload.
#[derive(Debug, Deserialize)]
pub struct ResponseData {
    /// Posts connection
    pub posts: PostsConnection,
}

/// `data.posts` connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsConnection {
    /// Pagination state
    pub page_info: PageInfo,
    /// Post edges in upstream order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// `pageInfo` block.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page exists
    pub has_next_page: bool,
    /// Cursor identifying where the next page resumes
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One edge wrapping a post node.
#[derive(Debug, Deserialize)]
pub struct Edge {
    /// The post itself
    pub node: Post,
}
