//! Settings shared by the circuit driver, the protocol sweep, and the
//! binaries.

use rand::{ rngs::StdRng, SeedableRng };
use crate::{
    error::{ TableauError, TableauResult },
    storage::StorageKind,
};

// odd constant for spreading trial indices over the seed space
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Base seed for all random number generators; `None` draws fresh entropy
    /// for every generator.
    pub seed: Option<u64>,
    /// Number of independent trials per configuration.
    pub trials: usize,
    /// Backing storage for every tableau.
    pub storage: StorageKind,
    /// Probability with which each qubit is measured in each layer of a random
    /// circuit.
    pub p_meas: f32,
    /// Number of layers in a random circuit.
    pub depth: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            trials: 100,
            storage: StorageKind::default(),
            p_meas: 0.25,
            depth: 16,
        }
    }
}

impl SimConfig {
    /// Check that every setting is in range.
    pub fn validate(&self) -> TableauResult<()> {
        if !(0.0..=1.0).contains(&self.p_meas) {
            return Err(TableauError::InvalidConfig(
                format!("measurement rate {} is not a probability", self.p_meas)
            ));
        }
        if self.trials == 0 {
            return Err(TableauError::InvalidConfig(
                "number of trials must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    /// Construct the generator for the `stream`-th independent run.
    ///
    /// With a fixed base seed, the same `stream` always gives the same
    /// generator, regardless of the order in which streams are created.
    pub fn rng(&self, stream: u64) -> StdRng {
        self.seed
            .map(|s| StdRng::seed_from_u64(s ^ stream.wrapping_mul(SEED_STRIDE)))
            .unwrap_or_else(StdRng::from_entropy)
    }
}
