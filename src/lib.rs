pub mod modules;
pub mod utilities;

pub use modules::controller::CarController;
pub use modules::dispatcher::{CarHandle, ElevatorSystem};
pub use utilities::car_status::{CarId, CarStatus, OperationalState};
pub use utilities::direction::Direction;
pub use utilities::error::{ConfigError, ElevatorError, ObserverFailure};
pub use utilities::events::{CarEvent, Observer, SubscriberId};
pub use utilities::request::Request;
