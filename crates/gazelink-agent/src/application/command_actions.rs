//! Wires the core command protocol to the pointer actuator and the
//! calibration indicator.

use std::sync::Arc;

use gazelink_core::{CommandActions, PointerError, PointerTarget, SpeedTier};

use super::actuate_pointer::PointerActuator;

/// Something that can show and hide the on-screen calibration dot.
pub trait CalibrationIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// [`CommandActions`] backed by a [`PointerActuator`] and a
/// [`CalibrationIndicator`].
pub struct PointerActions {
    actuator: Arc<PointerActuator>,
    indicator: Arc<dyn CalibrationIndicator>,
}

impl PointerActions {
    pub fn new(actuator: Arc<PointerActuator>, indicator: Arc<dyn CalibrationIndicator>) -> Self {
        Self {
            actuator,
            indicator,
        }
    }
}

impl CommandActions for PointerActions {
    fn move_pointer(
        &self,
        x_input: &str,
        y_input: &str,
        tier: SpeedTier,
    ) -> Result<PointerTarget, PointerError> {
        self.actuator.move_to(x_input, y_input, tier)
    }

    fn show_calibration(&self) {
        self.indicator.show();
    }

    fn hide_calibration(&self) {
        self.indicator.hide();
    }
}
