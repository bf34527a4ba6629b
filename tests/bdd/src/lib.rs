// BDD test support library for TimeXP
//
// World state and step definitions for the daily mission log scenarios.

pub mod steps;
pub mod world;

pub use world::DailyLogWorld;
