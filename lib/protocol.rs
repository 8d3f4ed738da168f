//! A small error-correction round on the 3-qubit repetition code, used as an
//! end-to-end check of gates and measurement.
//!
//! Qubits 0–2 hold the code and qubits 3 and 4 are syndrome ancillas. A
//! single-qubit ∣+i⟩ state on qubit 0 is encoded, hit with a chosen set of
//! bit-flip errors, corrected from the measured syndrome, and then decoded by
//! measuring out qubits 1 and 2 in the X-basis. Because every error pattern is
//! applied deterministically, the outcome category of a trial depends only on
//! the error pattern and never on the sampled measurement outcomes.

use std::fmt;
use itertools::Itertools;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;
use crate::{
    config::SimConfig,
    error::{ TableauError, TableauResult },
    storage::{ Dense, Packed, Storage, StorageKind },
    tableau::{ MeasureResult, Tableau },
};

/// Total number of qubits used by the protocol.
pub const NUM_QUBITS: usize = 5;

/// Indices of the code qubits.
pub const DATA: [usize; 3] = [0, 1, 2];

/// Indices of the syndrome ancillas.
pub const ANCILLAS: [usize; 2] = [3, 4];

/// Classification of a single trial.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Trivial syndrome, logical state intact.
    Accepted,
    /// Non-trivial syndrome, logical state intact after correction.
    Corrected,
    /// Non-trivial syndrome, correction produced a logical error.
    Miscorrected,
    /// Trivial syndrome, but the logical state was flipped.
    Undetected,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accepted => "accepted",
            Self::Corrected => "corrected",
            Self::Miscorrected => "miscorrected",
            Self::Undetected => "undetected",
        };
        f.pad(name)
    }
}

impl Category {
    pub const ALL: [Self; 4]
        = [Self::Accepted, Self::Corrected, Self::Miscorrected, Self::Undetected];

    /// Classify a trial from whether its syndrome was trivial and whether the
    /// final logical state was the intended one.
    pub fn classify(trivial_syndrome: bool, correct: bool) -> Self {
        match (trivial_syndrome, correct) {
            (true,  true ) => Self::Accepted,
            (false, true ) => Self::Corrected,
            (false, false) => Self::Miscorrected,
            (true,  false) => Self::Undetected,
        }
    }

    /// Return `true` if the logical state survived.
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Accepted | Self::Corrected)
    }

    fn index(self) -> usize {
        match self {
            Self::Accepted => 0,
            Self::Corrected => 1,
            Self::Miscorrected => 2,
            Self::Undetected => 3,
        }
    }
}

/// Everything measured during one trial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trial {
    /// Data qubits that received an X error.
    pub errors: Vec<usize>,
    /// Ancilla readouts, in the order of [`ANCILLAS`].
    pub syndrome: [MeasureResult; 2],
    /// X-basis readouts of data qubits 2 and 1.
    pub decode: [MeasureResult; 2],
    /// Final readout of data qubit 0; ∣0⟩ if the logical state survived.
    pub verify: MeasureResult,
    pub category: Category,
}

/// Run a single trial of the protocol with X errors on each of the data
/// qubits in `errors`.
pub fn run_trial<S, R>(errors: &[usize], rng: &mut R) -> TableauResult<Trial>
where
    S: Storage,
    R: Rng + ?Sized,
{
    if let Some(&k) = errors.iter().find(|k| !DATA.contains(k)) {
        return Err(TableauError::QubitOutOfRange { index: k, n: DATA.len() });
    }
    let mut state: Tableau<S> = Tableau::new(NUM_QUBITS);

    // encode ∣+i⟩ in the repetition code
    state.apply_h(0)?.apply_s(0)?.apply_cnot(0, 1)?.apply_cnot(0, 2)?;

    for &k in errors.iter() {
        state.apply_x(k)?;
    }

    // Z0 Z1 and Z1 Z2 parities onto the ancillas
    state
        .apply_cnot(0, 3)?
        .apply_cnot(1, 3)?
        .apply_cnot(1, 4)?
        .apply_cnot(2, 4)?;
    let s0 = state.measure(ANCILLAS[0], rng)?;
    let s1 = state.measure(ANCILLAS[1], rng)?;
    match (s0.value, s1.value) {
        (true,  false) => { state.apply_x(0)?; },
        (true,  true ) => { state.apply_x(1)?; },
        (false, true ) => { state.apply_x(2)?; },
        (false, false) => { },
    }

    let d2 = state.apply_h(2)?.measure(2, rng)?;
    let d1 = state.apply_h(1)?.measure(1, rng)?;
    if d1.value ^ d2.value { state.apply_z(0)?; }

    let verify = state.apply_sinv(0)?.apply_h(0)?.measure(0, rng)?;
    let category = Category::classify(!(s0.value || s1.value), !verify.value);
    debug!(
        ?errors,
        s0 = s0.value,
        s1 = s1.value,
        %category,
        "protocol trial",
    );
    Ok(Trial {
        errors: errors.to_vec(),
        syndrome: [s0, s1],
        decode: [d2, d1],
        verify,
        category,
    })
}

/// Counts of trial outcomes by [`Category`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Distribution([usize; 4]);

impl Distribution {
    /// Build from counts in the order of [`Category::ALL`].
    pub fn from_counts(counts: [usize; 4]) -> Self { Self(counts) }

    pub fn add(&mut self, category: Category) { self.0[category.index()] += 1; }

    pub fn get(&self, category: Category) -> usize { self.0[category.index()] }

    pub fn total(&self) -> usize { self.0.iter().sum() }

    /// Return the only category with a nonzero count, if there is exactly one.
    pub fn unanimous(&self) -> Option<Category> {
        Category::ALL.into_iter()
            .filter(|c| self.get(*c) > 0)
            .exactly_one()
            .ok()
    }
}

impl FromIterator<Category> for Distribution {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Category>
    {
        let mut dist = Self::default();
        iter.into_iter().for_each(|c| dist.add(c));
        dist
    }
}

impl std::ops::AddAssign for Distribution {
    fn add_assign(&mut self, rhs: Self) {
        self.0.iter_mut().zip(rhs.0).for_each(|(a, b)| *a += b);
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = Category::ALL.len();
        for (k, c) in Category::ALL.into_iter().enumerate() {
            write!(f, "{}: {}", c, self.get(c))?;
            if k + 1 < n { write!(f, ", ")?; }
        }
        Ok(())
    }
}

/// Outcomes of all trials for one error pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubsetOutcome {
    pub errors: Vec<usize>,
    pub tally: Distribution,
}

/// Outcomes for every error pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sweep(pub Vec<SubsetOutcome>);

impl Sweep {
    /// Count error patterns by category, where a pattern counts only if all
    /// of its trials agree.
    pub fn by_subset(&self) -> Distribution {
        self.0.iter()
            .filter_map(|outcome| outcome.tally.unanimous())
            .collect()
    }

    /// Sum of all trial tallies.
    pub fn total(&self) -> Distribution {
        let mut total = Distribution::default();
        self.0.iter().for_each(|outcome| { total += outcome.tally; });
        total
    }
}

/// Iterate over every subset of [`DATA`], starting with the empty one.
pub fn error_subsets() -> impl Iterator<Item = Vec<usize>> {
    DATA.into_iter().powerset()
}

/// Run `config.trials` trials for every error pattern, in parallel, using
/// the backend named by `config.storage`.
pub fn sweep(config: &SimConfig) -> TableauResult<Sweep> {
    match config.storage {
        StorageKind::Dense => sweep_with::<Dense>(config),
        StorageKind::Packed => sweep_with::<Packed>(config),
    }
}

/// Like [`sweep`], but with the backend fixed by `S`.
///
/// Trial `t` of the `s`-th error pattern draws from generator stream
/// `s * trials + t`, so results with a fixed seed don't depend on thread
/// scheduling.
pub fn sweep_with<S: Storage>(config: &SimConfig) -> TableauResult<Sweep> {
    config.validate()?;
    let trials = config.trials;
    let outcomes: Vec<SubsetOutcome>
        = error_subsets()
        .enumerate()
        .map(|(s, errors)| {
            let tally: Distribution
                = (0..trials).into_par_iter()
                .map(|t| {
                    let mut rng = config.rng((s * trials + t) as u64);
                    run_trial::<S, _>(&errors, &mut rng)
                        .map(|trial| trial.category)
                })
                .collect::<TableauResult<Vec<Category>>>()?
                .into_iter()
                .collect();
            debug!(?errors, %tally, "finished error pattern");
            Ok(SubsetOutcome { errors, tally })
        })
        .collect::<TableauResult<_>>()?;
    Ok(Sweep(outcomes))
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{ rngs::StdRng, SeedableRng };

    #[test]
    fn no_errors_accepted() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trial = run_trial::<Packed, _>(&[], &mut rng).unwrap();
            assert_eq!(trial.category, Category::Accepted);
            assert!(trial.syndrome.iter().all(|m| m.determined && !m.value));
            assert!(trial.decode.iter().all(|m| !m.determined));
            assert!(trial.verify.determined);
        }
    }

    #[test]
    fn single_errors_corrected() {
        let mut rng = StdRng::seed_from_u64(10546);
        let expected = [(true, false), (true, true), (false, true)];
        for (k, syn) in expected.into_iter().enumerate() {
            let trial = run_trial::<Dense, _>(&[k], &mut rng).unwrap();
            assert_eq!(trial.category, Category::Corrected);
            assert_eq!((trial.syndrome[0].value, trial.syndrome[1].value), syn);
        }
    }

    #[test]
    fn double_and_triple_errors() {
        let mut rng = StdRng::seed_from_u64(10546);
        for errors in [vec![0, 1], vec![0, 2], vec![1, 2]] {
            let trial = run_trial::<Packed, _>(&errors, &mut rng).unwrap();
            assert_eq!(trial.category, Category::Miscorrected);
        }
        let trial = run_trial::<Packed, _>(&[0, 1, 2], &mut rng).unwrap();
        assert_eq!(trial.category, Category::Undetected);
    }

    #[test]
    fn bad_error_index() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            run_trial::<Packed, _>(&[3], &mut rng),
            Err(TableauError::QubitOutOfRange { index: 3, n: 3 }),
        );
    }

    #[test]
    fn sweep_distribution() {
        for storage in [StorageKind::Dense, StorageKind::Packed] {
            let config = SimConfig {
                seed: Some(10546),
                trials: 8,
                storage,
                ..SimConfig::default()
            };
            let result = sweep(&config).unwrap();
            assert_eq!(result.0.len(), 8);
            assert!(result.0[0].errors.is_empty());
            assert_eq!(result.0[0].tally.unanimous(), Some(Category::Accepted));
            assert_eq!(result.by_subset(), Distribution::from_counts([1, 3, 3, 1]));
            assert_eq!(result.total(), Distribution::from_counts([8, 24, 24, 8]));
        }
    }

    #[test]
    fn distribution_display() {
        let dist: Distribution
            = [Category::Corrected, Category::Accepted, Category::Corrected]
            .into_iter()
            .collect();
        assert_eq!(
            dist.to_string(),
            "accepted: 1, corrected: 2, miscorrected: 0, undetected: 0",
        );
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.unanimous(), None);
    }
}
