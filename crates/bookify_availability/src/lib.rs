// --- File: crates/bookify_availability/src/lib.rs ---
// Pure scheduling logic: no I/O, no shared state.
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod policy;
pub mod validator;
#[cfg(test)]
mod validator_test;

pub use logic::{compute_slots, compute_slots_per_resource, AvailabilityError, Slot, SlotQuery};
pub use policy::{
    BookingHorizon, PolicyError, Resource, ResourceSelector, ResourceWindow, SchedulingPolicy, UnknownResource,
    WeeklyHours, WorkingWindow,
};
pub use validator::{
    ensure_slot_free, validate_and_reserve, validate_and_reserve_with, validate_booking, BookingRequest, ContactDetails,
    Rejection, ValidatedBooking, Verdict,
};
