//! Gate configuration and the state trait the middleware is generic over.

use std::sync::Arc;

use super::gate::Gate;
use super::service::ServiceStrategy;
use crate::secrets::Secrets;

/// Read-only configuration the gate is built from.
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    pub secrets: Secrets,
    pub service_strategy: ServiceStrategy,
}

/// Trait for state types that carry a [`Gate`].
pub trait HasGate {
    fn gate(&self) -> &Gate;
}

impl HasGate for Arc<Gate> {
    fn gate(&self) -> &Gate {
        self
    }
}

/// Macro to implement `HasGate` for state structs with a `gate: Arc<Gate>` field.
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// pub struct StudentsState {
///     pub gate: Arc<Gate>,
///     // ... other fields
/// }
///
/// campus_gate::impl_has_gate!(StudentsState);
/// ```
#[macro_export]
macro_rules! impl_has_gate {
    ($state_type:ty) => {
        impl $crate::auth::HasGate for $state_type {
            fn gate(&self) -> &$crate::auth::Gate {
                &self.gate
            }
        }
    };
}
