//! PointerActuator: the single place where pointer moves are validated.
//!
//! This use case sits at the application layer and delegates to a
//! [`PointerDriver`] trait object for the OS-level move.  The platform
//! implementations are in the infrastructure layer.
//!
//! The screen size is queried from the driver on *every* call, so a display
//! that is resized or swapped while the agent runs is picked up immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gazelink_core::{PointerError, PointerTarget, ScreenSize, SpeedTier, SpeedTiers};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, warn};

/// Platform-agnostic pointer driver.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait PointerDriver: Send + Sync {
    /// Returns the current size of the primary screen.
    fn screen_size(&self) -> Result<ScreenSize, PointerError>;

    /// Glides the pointer to `(x, y)` over `duration`.
    ///
    /// A zero duration jumps straight to the target.
    fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError>;
}

/// Validates pointer targets and forwards them to the driver.
pub struct PointerActuator {
    driver: Arc<dyn PointerDriver>,
    speeds: SpeedTiers,
    rng: Mutex<StdRng>,
}

impl PointerActuator {
    /// Creates an actuator with default speed tiers and an entropy-seeded RNG.
    pub fn new(driver: Arc<dyn PointerDriver>) -> Self {
        Self {
            driver,
            speeds: SpeedTiers::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates an actuator whose random moves are reproducible.
    pub fn with_seed(driver: Arc<dyn PointerDriver>, seed: u64) -> Self {
        Self {
            driver,
            speeds: SpeedTiers::default(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Replaces the glide durations used for each tier.
    pub fn with_speeds(mut self, speeds: SpeedTiers) -> Self {
        self.speeds = speeds;
        self
    }

    pub fn speeds(&self) -> SpeedTiers {
        self.speeds
    }

    /// Parses, validates and executes a move from textual coordinates.
    ///
    /// # Errors
    ///
    /// - [`PointerError::InvalidCoordinate`] if either input is not an
    ///   integer, is negative, or exceeds the current screen size.
    /// - [`PointerError::Platform`] if the driver fails.
    pub fn move_to(
        &self,
        x_input: &str,
        y_input: &str,
        tier: SpeedTier,
    ) -> Result<PointerTarget, PointerError> {
        let screen = self.driver.screen_size()?;
        let target = PointerTarget::parse(x_input, y_input, screen).map_err(reject)?;
        self.execute(target, tier)
    }

    /// Validates and executes a move from numeric coordinates.
    ///
    /// # Errors
    ///
    /// Same as [`PointerActuator::move_to`], minus the parse failure.
    pub fn move_to_point(
        &self,
        x: i64,
        y: i64,
        tier: SpeedTier,
    ) -> Result<PointerTarget, PointerError> {
        let screen = self.driver.screen_size()?;
        let target = PointerTarget::validate(x, y, screen).map_err(reject)?;
        self.execute(target, tier)
    }

    /// Moves to a uniformly random point with `x` in `[0, width-1]` and `y`
    /// in `[0, height-1]`.
    ///
    /// # Errors
    ///
    /// Returns [`PointerError::Platform`] if the screen has no area or the
    /// driver fails.
    pub fn move_random(&self, tier: SpeedTier) -> Result<PointerTarget, PointerError> {
        let screen = self.driver.screen_size()?;
        if screen.width == 0 || screen.height == 0 {
            return Err(PointerError::Platform(format!(
                "screen has no area: {}x{}",
                screen.width, screen.height
            )));
        }
        let (x, y) = {
            let mut rng = self.rng.lock();
            (rng.gen_range(0..screen.width), rng.gen_range(0..screen.height))
        };
        self.move_to_point(i64::from(x), i64::from(y), tier)
    }

    fn execute(&self, target: PointerTarget, tier: SpeedTier) -> Result<PointerTarget, PointerError> {
        let duration = self.speeds.duration(tier);
        debug!(x = target.x(), y = target.y(), ?tier, "moving pointer");
        self.driver.move_to(target.x(), target.y(), duration)?;
        Ok(target)
    }
}

fn reject(e: gazelink_core::TargetError) -> PointerError {
    error!("{e}");
    PointerError::InvalidCoordinate(e)
}

// ── Random movement ───────────────────────────────────────────────────────────

/// Start/stop flag for continuous random pointer movement.
///
/// [`RandomMovement::run`] blocks its caller, so run it on its own thread.
/// Only one run per flag is meaningful; starting a second run while the first
/// is active is the caller's responsibility to avoid.
#[derive(Debug, Default)]
pub struct RandomMovement {
    active: AtomicBool,
}

impl RandomMovement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and moves the pointer randomly until [`stop`] clears it.
    ///
    /// Each move uses the [`SpeedTier::Random`] glide.  Driver failures are
    /// logged and followed by one glide-length pause.
    ///
    /// [`stop`]: RandomMovement::stop
    pub fn run(&self, actuator: &PointerActuator) {
        self.active.store(true, Ordering::SeqCst);
        while self.active.load(Ordering::SeqCst) {
            if let Err(e) = actuator.move_random(SpeedTier::Random) {
                warn!("random move failed: {e}");
                std::thread::sleep(actuator.speeds().random);
            }
        }
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // ── Mock driver ───────────────────────────────────────────────────────────

    struct RecordingDriver {
        screen: StdMutex<ScreenSize>,
        moves: StdMutex<Vec<(u32, u32, Duration)>>,
        should_fail: bool,
    }

    impl RecordingDriver {
        fn new(width: u32, height: u32) -> Self {
            Self {
                screen: StdMutex::new(ScreenSize::new(width, height)),
                moves: StdMutex::new(Vec::new()),
                should_fail: false,
            }
        }
    }

    impl PointerDriver for RecordingDriver {
        fn screen_size(&self) -> Result<ScreenSize, PointerError> {
            Ok(*self.screen.lock().unwrap())
        }

        fn move_to(&self, x: u32, y: u32, duration: Duration) -> Result<(), PointerError> {
            if self.should_fail {
                return Err(PointerError::Platform("injected failure".to_string()));
            }
            self.moves.lock().unwrap().push((x, y, duration));
            Ok(())
        }
    }

    fn make_actuator(width: u32, height: u32) -> (PointerActuator, Arc<RecordingDriver>) {
        let driver = Arc::new(RecordingDriver::new(width, height));
        let actuator =
            PointerActuator::with_seed(Arc::clone(&driver) as Arc<dyn PointerDriver>, 42);
        (actuator, driver)
    }

    // ── move_to ───────────────────────────────────────────────────────────────

    #[test]
    fn test_move_to_forwards_exact_coordinates_and_tier_duration() {
        // Arrange
        let (actuator, driver) = make_actuator(1920, 1080);

        // Act
        actuator.move_to("100", "200", SpeedTier::Serial).unwrap();

        // Assert
        assert_eq!(
            *driver.moves.lock().unwrap(),
            vec![(100, 200, Duration::from_millis(200))]
        );
    }

    #[test]
    fn test_move_to_rejects_negative_x() {
        let (actuator, driver) = make_actuator(1920, 1080);

        let err = actuator.move_to("-1", "0", SpeedTier::Interactive).unwrap_err();

        assert!(matches!(err, PointerError::InvalidCoordinate(_)));
        assert!(driver.moves.lock().unwrap().is_empty());
    }

    #[test]
    fn test_move_to_rejects_unparseable_input() {
        let (actuator, driver) = make_actuator(1920, 1080);

        let err = actuator.move_to("abc", "1", SpeedTier::Interactive).unwrap_err();

        assert!(matches!(err, PointerError::InvalidCoordinate(_)));
        assert!(driver.moves.lock().unwrap().is_empty());
    }

    #[test]
    fn test_move_to_point_accepts_full_width_and_rejects_one_past() {
        // Arrange
        let (actuator, driver) = make_actuator(800, 600);

        // Act
        let at_edge = actuator.move_to_point(800, 0, SpeedTier::Interactive);
        let past_edge = actuator.move_to_point(801, 0, SpeedTier::Interactive);

        // Assert
        assert!(at_edge.is_ok());
        assert!(matches!(past_edge, Err(PointerError::InvalidCoordinate(_))));
        assert_eq!(driver.moves.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_bounds_follow_live_screen_size() {
        // Arrange
        let (actuator, driver) = make_actuator(800, 600);
        assert!(actuator.move_to_point(1000, 10, SpeedTier::Interactive).is_err());

        // Act – the display grows while the agent is running
        *driver.screen.lock().unwrap() = ScreenSize::new(1920, 1080);

        // Assert
        assert!(actuator.move_to_point(1000, 10, SpeedTier::Interactive).is_ok());
    }

    #[test]
    fn test_driver_failure_surfaces_as_platform_error() {
        let driver = Arc::new(RecordingDriver {
            should_fail: true,
            ..RecordingDriver::new(100, 100)
        });
        let actuator = PointerActuator::new(driver);

        let err = actuator.move_to_point(1, 1, SpeedTier::Interactive).unwrap_err();

        assert!(matches!(err, PointerError::Platform(_)));
    }

    #[test]
    fn test_custom_speed_tiers_are_used() {
        let (actuator, driver) = make_actuator(100, 100);
        let actuator = actuator.with_speeds(SpeedTiers {
            interactive: Duration::from_millis(1),
            serial: Duration::from_millis(2),
            random: Duration::from_millis(3),
        });

        actuator.move_to_point(5, 5, SpeedTier::Interactive).unwrap();

        assert_eq!(driver.moves.lock().unwrap()[0].2, Duration::from_millis(1));
    }

    // ── move_random ───────────────────────────────────────────────────────────

    #[test]
    fn test_move_random_stays_strictly_inside_screen() {
        let (actuator, driver) = make_actuator(3, 2);

        for _ in 0..200 {
            actuator.move_random(SpeedTier::Random).unwrap();
        }

        for (x, y, _) in driver.moves.lock().unwrap().iter() {
            assert!(*x < 3 && *y < 2, "({x}, {y}) escaped the screen");
        }
    }

    #[test]
    fn test_move_random_is_reproducible_with_same_seed() {
        // Arrange
        let (a, driver_a) = make_actuator(1920, 1080);
        let (b, driver_b) = make_actuator(1920, 1080);

        // Act
        for _ in 0..10 {
            a.move_random(SpeedTier::Random).unwrap();
            b.move_random(SpeedTier::Random).unwrap();
        }

        // Assert
        assert_eq!(*driver_a.moves.lock().unwrap(), *driver_b.moves.lock().unwrap());
    }

    #[test]
    fn test_move_random_on_empty_screen_fails() {
        let (actuator, _driver) = make_actuator(0, 1080);
        assert!(matches!(
            actuator.move_random(SpeedTier::Random),
            Err(PointerError::Platform(_))
        ));
    }

    // ── RandomMovement ────────────────────────────────────────────────────────

    #[test]
    fn test_random_movement_runs_until_stopped() {
        // Arrange
        let (actuator, driver) = make_actuator(1920, 1080);
        let actuator = Arc::new(actuator);
        let movement = Arc::new(RandomMovement::new());

        // Act
        let worker = {
            let actuator = Arc::clone(&actuator);
            let movement = Arc::clone(&movement);
            std::thread::spawn(move || movement.run(&actuator))
        };
        while driver.moves.lock().unwrap().len() < 5 {
            std::thread::yield_now();
        }
        movement.stop();
        worker.join().unwrap();

        // Assert
        assert!(!movement.is_active());
        let moves = driver.moves.lock().unwrap();
        assert!(moves.len() >= 5);
        assert!(moves.iter().all(|m| m.2 == Duration::from_millis(120)));
    }
}
