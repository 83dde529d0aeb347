//! # Livemarket Core
//!
//! Reactive data orchestration for the livemarket dashboard.
//!
//! ## Overview
//!
//! The dashboard shows an index's constituents, the price summary of a
//! selected instrument and that instrument's historical series. This crate
//! owns the data side of it:
//!
//! - **Remote resources** wrapping one URL into a `data` / `error` / `loading` cell
//! - **State containers** for the selection, constituents, summary and history
//! - **Dashboard wiring** reloading dependent containers when the selection changes
//! - **Period filtering** of the historical series
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Deployment detection and URL templates |
//! | [`dashboard`] | Composition root and selection wiring |
//! | [`domain`] | Wire models for the three data files |
//! | [`error`] | Core error types |
//! | [`format`] | Price, percentage and color-class helpers |
//! | [`http_client`] | HTTP client abstraction |
//! | [`period`] | Period tokens, year ranges and window stats |
//! | [`resource`] | Generic remote fetch primitive |
//! | [`state`] | Per-domain state containers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use livemarket_core::{Dashboard, DashboardConfig, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::for_origin("http://localhost:5173")?;
//!     let dashboard = Dashboard::new(Arc::new(ReqwestHttpClient::new()), config);
//!
//!     let _wiring = dashboard.start()?;
//!     dashboard.load_selected().await;
//!     dashboard.select("AGUAS-A");
//!
//!     let snapshot = dashboard.wait_settled().await;
//!     println!("{} points", snapshot.history_view.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod format;
pub mod http_client;
pub mod period;
pub mod resource;
pub mod state;

pub use config::{DashboardConfig, Deployment, DEFAULT_INSTRUMENT, PRODUCTION_BASE_PATH};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use domain::{
    ApiResponse, Constituent, ConstituentsData, ConstituentsResponse, HistoryData, HistoryPoint,
    HistoryResponse, InstrumentInfo, SummaryData, SummaryInfo, SummaryPrice, SummaryResponse,
    Trend,
};
pub use error::{CoreError, FetchError, ValidationError};
pub use format::{color_class, percent_format, price_format, ColorClass, ColorPalette};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};
pub use period::{Period, PeriodFilter, PeriodSelection, WindowStats, YearRange};
pub use resource::{FetchOptions, Payload, RemoteResource, RemoteResult};
pub use state::{
    filter_constituents, ConstituentsState, FilteredConstituents, HistoryState,
    InstrumentEndpoint, InstrumentState, SelectionState, SummaryState,
};
