//! Set list client
//!
//! - **set_list**: the `SetList` component (fetch once on mount, render rows)
//! - **source**: where records come from (`HttpSetSource`, `StoreSetSource`)
//! - **render**: HTML and text output
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use training_notebook::client::{HttpSetSource, SetList};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSetSource::new("http://localhost:8080")?;
//!     let list = SetList::new(Arc::new(source));
//!
//!     list.mount().await;
//!     print!("{}", list.render_text().await);
//!
//!     Ok(())
//! }
//! ```

pub mod render;
pub mod set_list;
pub mod source;

pub use set_list::{SetList, SetListState};
pub use source::{sets_url, FetchError, HttpSetSource, SetSource, StoreSetSource, SETS_PATH};
