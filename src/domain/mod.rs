//! Domain model: branches, ATMs, their weekly schedules, search criteria,
//! partial updates and the ports through which the application reaches
//! storage and the clock.

pub mod catalog;
pub mod criteria;
pub mod ports;
pub mod predicate;
pub mod schedule;
pub mod update;
