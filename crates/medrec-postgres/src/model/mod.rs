//! Database models for the patients registry.

pub mod patient;

pub use patient::{NewPatient, Patient, UpdatePatient};
