use std::sync::Arc;

use crate::academy::Academy;
use crate::model::ModelManager;

#[derive(Debug, Clone)]
pub struct AppState {
    academy: Arc<Academy>,
}

impl AppState {
    pub fn new(academy: Academy) -> Self {
        Self {
            academy: Arc::new(academy),
        }
    }

    pub fn academy(&self) -> &Academy {
        &self.academy
    }

    pub fn mm(&self) -> &ModelManager {
        self.academy.mm()
    }
}
