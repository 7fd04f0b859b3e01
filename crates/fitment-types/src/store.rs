use crate::errors::StoreError;
use crate::ids::{TireId, WheelId};
use crate::tire::TireSpec;
use crate::wheel::WheelSpec;

/// Read-only access to wheel and tire records.
///
/// The engine never writes back to a store; results flow to the caller.
pub trait SpecStore {
    fn get_wheel_spec(&self, id: WheelId) -> Result<WheelSpec, StoreError>;

    fn get_tire_spec(&self, id: TireId) -> Result<TireSpec, StoreError>;

    /// All wheels, in a stable order.
    fn list_wheel_specs(&self) -> Vec<(WheelId, WheelSpec)>;
}
