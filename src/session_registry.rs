use crate::camera_session::CameraSession;
use crate::config::AlertConfig;
use crate::device_camera::interface::{CameraId, DeviceCamera, DeviceInfo};
use crate::error::Error;
use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Live camera sessions in selection order. The scheduler only ever reads
/// it through [`snapshot`](Self::snapshot), so edits land on the next cycle.
pub struct SessionRegistry {
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    sessions: Mutex<Vec<Arc<CameraSession>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl SessionRegistry {
    pub fn new(
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device_camera,
            sessions: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Returns the existing session for `device`, or opens a new one.
    pub fn upsert(
        &self,
        device: &DeviceInfo,
        config: &AlertConfig,
    ) -> Result<Arc<CameraSession>, Error> {
        if let Some(existing) = self.get(&device.id) {
            return Ok(existing);
        }

        let session = Arc::new(CameraSession::new(
            device,
            config,
            self.device_camera.clone(),
            self.logger.clone(),
        ));
        session.activate()?;

        let mut sessions = self.sessions();
        if let Some(existing) = sessions.iter().find(|s| s.id() == &device.id) {
            // Lost a race with another upsert for the same camera.
            session.deactivate();
            return Ok(existing.clone());
        }
        sessions.push(session.clone());
        drop(sessions);

        let _ = self
            .logger
            .info(&format!("Added camera {} ({})", device.label, device.id));
        Ok(session)
    }

    /// Deactivates and drops every session whose id matches. Returns how
    /// many were removed.
    pub fn remove<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CameraId) -> bool,
    {
        let removed: Vec<Arc<CameraSession>> = {
            let mut sessions = self.sessions();
            let (removed, kept): (Vec<_>, Vec<_>) =
                sessions.drain(..).partition(|s| predicate(s.id()));
            *sessions = kept;
            removed
        };

        for session in &removed {
            session.deactivate();
            let _ = self.logger.info(&format!(
                "Removed camera {} ({})",
                session.label(),
                session.id()
            ));
        }
        removed.len()
    }

    pub fn remove_all(&self) -> usize {
        self.remove(|_| true)
    }

    /// Point-in-time copy of the sessions, in selection order.
    pub fn snapshot(&self) -> Vec<Arc<CameraSession>> {
        self.sessions().clone()
    }

    pub fn get(&self, id: &CameraId) -> Option<Arc<CameraSession>> {
        self.sessions().iter().find(|s| s.id() == id).cloned()
    }

    pub fn ids(&self) -> Vec<CameraId> {
        self.sessions().iter().map(|s| s.id().clone()).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }

    /// Drops sessions whose device is no longer connected.
    pub fn reconcile(&self, connected: &[DeviceInfo]) -> usize {
        if connected.is_empty() {
            return self.remove_all();
        }
        self.remove(|id| !connected.iter().any(|d| &d.id == id))
    }

    /// Makes the registry match `selected`: unselected sessions are removed,
    /// then each selected camera is added in order. Cameras that cannot be
    /// opened are skipped and returned as errors.
    pub fn apply_selection(&self, selected: &[DeviceInfo], config: &AlertConfig) -> Vec<Error> {
        self.remove(|id| !selected.iter().any(|d| &d.id == id));

        selected
            .iter()
            .filter_map(|device| match self.upsert(device, config) {
                Ok(_) => None,
                Err(e) => {
                    let _ = self
                        .logger
                        .error(&format!("Could not add camera {}: {}", device.label, e));
                    Some(e)
                }
            })
            .collect()
    }

    fn sessions(&self) -> MutexGuard<'_, Vec<Arc<CameraSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
