#![forbid(unsafe_code)]

//! Core: signed pixel geometry shared by the timetable layout crates.

pub mod geometry;
