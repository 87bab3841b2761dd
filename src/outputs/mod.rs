//! Output generation for the dashboard.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders a [`crate::models::Dashboard`] as a Markdown report
//! - [`json`]: Writes the same snapshot as JSON for other consumers
//!
//! # Output Structure
//!
//! ```text
//! report.md                      # --markdown-output, or stdout
//! json_output_dir/
//! └── 2025-05-06/
//!     └── 081502.json
//! audio_output_dir/
//! └── <title-slug>.mp3           # one per spoken summary
//! ```

pub mod json;
pub mod markdown;
