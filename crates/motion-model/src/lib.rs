//! Stabkit Motion Model
//!
//! Defines the data contracts shared by the stabilizer and its hosts:
//! - **Motion:** Per-frame rigid motion samples, cumulative trajectories,
//!   and the corrective transform derived from them
//! - **Affine:** The 2×3 rigid matrix exchanged with estimators and warpers
//! - **Frame:** Frame dimensions and the fixed border crop window
//! - **Log:** The JSONL motion log format recorded from an estimator
//!
//! Translations are in pixels of the source frame; angles are in radians
//! and are never wrapped.

pub mod affine;
pub mod frame;
pub mod log;
pub mod motion;

pub use affine::*;
pub use frame::*;
pub use log::*;
pub use motion::*;
