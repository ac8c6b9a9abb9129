pub mod clock;
pub mod serde;
pub mod telemetry;
pub mod timeout;

pub use clock::*;
pub use self::serde::*;
pub use telemetry::*;
pub use timeout::*;
