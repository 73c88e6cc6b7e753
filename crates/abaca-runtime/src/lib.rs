// Runtime layer - view controllers and the collaborators they drive
// (list fetching, mutations, auth) plus on-disk configuration

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod http;
pub mod mutation;

pub use auth::{AuthContext, Role};
pub use config::{ApiConfig, Config, ROLE_ENV, TOKEN_ENV, resolve_workspace_path};
pub use controller::{FetchTicket, Notice, Phase, ViewController};
pub use error::{Error, Result};
pub use fetch::{FileFetcher, ListFetcher, QueryParams};
pub use http::HttpClient;
pub use mutation::{Mutation, RecordMutator};
