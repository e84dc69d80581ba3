//! Resolve the user's preferred device by name.

use std::sync::Arc;

use tracing::{debug, warn};

use super::device::{AudioError, DeviceRole, Direction};
use super::endpoint::{AudioSystem, Endpoint};
use super::handle::DeviceHandle;

/// Largest edit distance accepted between a device name and the preferred
/// name.
pub const MAX_NAME_DISTANCE: usize = 20;

/// Finds endpoints through an [`AudioSystem`].
#[derive(Clone)]
pub struct DeviceLocator {
    system: Arc<dyn AudioSystem>,
}

impl DeviceLocator {
    pub fn new(system: Arc<dyn AudioSystem>) -> Self {
        Self { system }
    }

    /// Select the active endpoint whose friendly name is closest to
    /// `preferred_name`.
    ///
    /// Ties go to the endpoint enumerated first. Candidates that are not
    /// selected are released before this returns.
    pub fn find_best_match(&self, preferred_name: &str, direction: Direction) -> Option<DeviceHandle> {
        let endpoints = match self.system.active_endpoints(direction) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(%direction, "Failed to enumerate devices: {e}");
                return None;
            }
        };

        let mut best: Option<(usize, String, Box<dyn Endpoint>)> = None;

        for endpoint in endpoints {
            let name = match endpoint.friendly_name() {
                Ok(name) => name,
                Err(e) => {
                    debug!("Skipping device without a name: {e}");
                    continue;
                }
            };

            let distance = levenshtein(&name, preferred_name);
            debug!(device = %name, distance, "Candidate device");

            if distance > MAX_NAME_DISTANCE {
                continue;
            }
            if best.as_ref().is_some_and(|(score, ..)| *score <= distance) {
                continue;
            }

            // Replacing the previous best drops it here.
            best = Some((distance, name, endpoint));
        }

        best.map(|(_, name, endpoint)| {
            DeviceHandle::new(self.system.clone(), direction, name, endpoint)
        })
    }

    /// Like [`find_best_match`](Self::find_best_match), reporting a miss as
    /// [`AudioError::NotFound`].
    pub fn require_match(&self, preferred_name: &str, direction: Direction) -> Result<DeviceHandle, AudioError> {
        self.find_best_match(preferred_name, direction)
            .ok_or_else(|| AudioError::NotFound {
                name: preferred_name.to_string(),
            })
    }

    /// The OS default endpoint for `direction` and `role`.
    pub fn get_os_default(&self, direction: Direction, role: DeviceRole) -> Option<DeviceHandle> {
        let endpoint = match self.system.default_endpoint(direction, role) {
            Ok(Some(endpoint)) => endpoint,
            Ok(None) => return None,
            Err(e) => {
                warn!(%direction, ?role, "Failed to get the default device: {e}");
                return None;
            }
        };

        let name = endpoint.friendly_name().unwrap_or_else(|_| "Unknown".to_string());
        Some(DeviceHandle::new(self.system.clone(), direction, name, endpoint))
    }
}

/// Levenshtein edit distance between two strings, counted in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
