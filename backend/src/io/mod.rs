//! Input and output surfaces: form values, the geolocation collaborator and
//! the console summary.

pub mod console;
pub mod form;
pub mod geolocation;

pub use form::{FieldPolicy, FormValues};
pub use geolocation::{GeolocationService, Locator, StaticLocator, UnavailableLocator};
