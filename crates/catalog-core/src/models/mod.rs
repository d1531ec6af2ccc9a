//! Data models for catalog entities.
//!
//! This module contains the structures returned by the catalog backend:
//!
//! - `Author`, `Article`, `Institution`, `Award`: catalog records
//! - `CatalogSummary`: dashboard figures derived from the four lists
//! - `SignInRequest`, `SignUpRequest`: account endpoint payloads

pub mod account;
pub mod article;
pub mod author;
pub mod award;
mod de;
pub mod institution;
pub mod summary;

pub use account::{SignInRequest, SignInResponse, SignUpRequest};
pub use article::Article;
pub use author::{ArticleRef, Author, AuthorArticles, AwardRef};
pub use award::Award;
pub use institution::Institution;
pub use summary::{AuthorArticleCount, CatalogSummary};
