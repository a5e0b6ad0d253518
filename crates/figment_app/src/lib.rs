//! Figment Application
//!
//! Everything above the data model: configuration, logging, the drawable
//! cache, the compositor, async ingestion of dropped images and the
//! [`Session`] facade that ties them together.
//!
//! # Example
//!
//! ```ignore
//! use figment_app::{DropItem, FigmentConfig, Session, ViewState};
//! use figment_core::MemoryStore;
//! use figment_paint::Size;
//!
//! let mut session = Session::new(MemoryStore::new(), FigmentConfig::default());
//! let scenario = session.add_scenario()?;
//! session
//!     .drop_items(scenario, vec![DropItem::new("before.png"), DropItem::new("after.png")])
//!     .await?;
//!
//! let frame = session.render(scenario, Size::new(800.0, 600.0), ViewState::default());
//! ```

pub mod cache;
pub mod compositor;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod session;

pub use cache::{CacheKey, CacheStats, DrawableCache};
pub use compositor::{Compositor, Frame, FrameMode, ViewState};
pub use config::FigmentConfig;
pub use ingest::{
    Committed, DecodedPayload, DropItem, IngestError, Ingestion, PayloadError, PayloadLoader,
    SourceLoader,
};
pub use session::Session;
