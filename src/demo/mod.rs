//! Demo algorithm plugins
//!
//! [`bubble_sort`] is a complete client of the runtime environment: step logic with pacing
//! sleeps, state capture for stepping backward, a view model that honors repaint
//! suppression, and exercises for exercise mode.

pub mod bubble_sort;

pub use bubble_sort::{BubbleSort, SortModel, SortSnapshot, PLUGIN_NAME};
