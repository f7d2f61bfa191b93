//! Reshaping of price series for charting: bounded downsampling of the
//! trading history, the actual/predicted forecast merge, and the value
//! domains each chart uses.

pub mod domain;
pub mod downsample;
pub mod forecast;
pub mod locale;
pub mod table;

pub use domain::*;
pub use downsample::*;
pub use forecast::*;
pub use locale::*;
pub use table::*;
