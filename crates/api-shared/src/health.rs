use crate::types::HealthRes;

/// Simple health service shared by every API surface
///
/// This service provides a standardised way to check the health status of the portal.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Clinic portal is alive".into(),
        }
    }
}
