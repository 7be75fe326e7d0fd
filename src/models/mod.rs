pub mod dialog_state;
pub mod session;
pub mod trip;
pub mod user;

pub use dialog_state::DialogState;
pub use session::Session;
pub use trip::{NewTrip, Trip, TripId, TripPatch};
pub use user::User;
