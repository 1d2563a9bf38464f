//! Song-time sources for the dico engine.
//!
//! - [`TimeProvider`]: wall-clock abstraction with a mock for tests
//! - [`MusicTransport`]: the audio side the clock follows when available
//! - [`Clock`]: hybrid song clock that prefers the transport and falls back
//!   to wall-clock extrapolation while audio is stalled or absent

mod clock;
mod time;
mod transport;

pub use clock::{Clock, STALL_EPSILON, STALL_EXTRAPOLATION_CAP, duration_guess, format_time};
pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};
pub use transport::{MusicTransport, PlayRequest, Silent};
