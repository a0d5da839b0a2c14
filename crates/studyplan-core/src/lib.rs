//! # studyplan-core
//!
//! Core scheduling engine for an ADHD-aware exam study planner. Given a
//! typed description of subjects, exams, and per-exam difficulty
//! indicators, it derives a workload, computes free time around exams,
//! tuition, and a daily supper break, and greedily places study sessions
//! and mandatory breaks into an ordered `Plan`.
//!
//! ## Architecture
//!
//! - **Input model** ([`model`]): typed records for `Metadata`, `Subject`,
//!   `Exam`, `TuitionBlock`, loaded once and read-only thereafter.
//! - **Workload deriver** ([`task`]): turns an `Exam` into an ordered list
//!   of `Task`s.
//! - **Occupancy map** ([`occupancy`]): the immovable intervals a day
//!   cannot be scheduled over.
//! - **Free-interval computer** ([`freeintervals`]): candidate slots left
//!   after subtracting occupancy from a day's window.
//! - **Placer** ([`placer`]): the greedy first-fit engine; the crate's
//!   public entry point is [`placer::build_plan`].
//! - **Reservation** ([`reservation`]): day-before priority reservation,
//!   run ahead of forward placement.
//! - **Verifier** ([`verifier`]): scans a finished plan and raises
//!   warnings for any invariant it finds violated.
//! - **Loader** ([`loader`]): JSON deserialization into a `PlanInput`.

pub mod error;
pub mod freeintervals;
pub mod item;
pub mod loader;
pub mod model;
pub mod occupancy;
pub mod placer;
pub mod reservation;
pub mod task;
pub mod verifier;

pub use error::{ConfigError, InputError, PlannerError, Result};
pub use freeintervals::{free_slots, ordered_for_placement, FreeSlot};
pub use item::{Item, Plan};
pub use loader::{load_from_path, load_from_str};
pub use model::{Exam, ExamLabels, Level, Metadata, PlanInput, Subject, TuitionBlock};
pub use occupancy::{clamp_day_window, Interval, OccupancyKind, OccupancyMap};
pub use placer::build_plan;
pub use task::{derive_tasks, Task, TaskKind};
