//! CLI command implementations.

pub mod article;
pub mod browse;
pub mod categories;
pub mod init;
pub mod slug;

pub use article::{delete_article, edit_article, new_article, show_article, ArticleFields};
pub use browse::{browse_articles, show_category, BrowseOptions};
pub use categories::{add_category, list_categories};
pub use init::init_wiki;
pub use slug::show_slug;
