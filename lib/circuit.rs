//! Abstractions for driving Clifford circuits interleaved with measurements.

use std::fmt;
use rand::{ rngs::StdRng, Rng };
use tracing::debug;
use crate::{
    config::SimConfig,
    error::{ TableauError, TableauResult },
    gate::Gate,
    storage::{ Packed, Storage },
    tableau::{ MeasureResult, Tableau },
};

/// A single circuit element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Apply a gate.
    Gate(Gate),
    /// Measure a qubit in the Z-basis.
    Measure(usize),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gate(g) => g.fmt(f),
            Self::Measure(k) => write!(f, "M({})", k),
        }
    }
}

impl From<Gate> for Op {
    fn from(gate: Gate) -> Self { Self::Gate(gate) }
}

/// A fixed sequence of gates and measurements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Circuit(Vec<Op>);

impl FromIterator<Op> for Circuit {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Op>
    {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0.len();
        for (k, op) in self.0.iter().enumerate() {
            op.fmt(f)?;
            if k + 1 < n { write!(f, " ")?; }
        }
        Ok(())
    }
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self { Self::default() }

    /// Append a gate.
    pub fn gate(&mut self, gate: Gate) -> &mut Self {
        self.0.push(Op::Gate(gate));
        self
    }

    /// Append a measurement of qubit `k`.
    pub fn measure(&mut self, k: usize) -> &mut Self {
        self.0.push(Op::Measure(k));
        self
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Return the largest qubit index referenced, if any.
    pub fn max_qubit(&self) -> Option<usize> {
        self.0.iter()
            .map(|op| {
                match op {
                    Op::Gate(g) => {
                        let (a, b) = g.qubits();
                        b.map(|b| a.max(b)).unwrap_or(a)
                    },
                    Op::Measure(k) => *k,
                }
            })
            .max()
    }

    /// Run on `state`, returning every measurement outcome in order.
    ///
    /// The whole circuit is validated against `state` first, so an invalid
    /// operation anywhere leaves the state untouched.
    pub fn run<S, R>(&self, state: &mut Tableau<S>, rng: &mut R)
        -> TableauResult<Vec<MeasureResult>>
    where
        S: Storage,
        R: Rng + ?Sized,
    {
        for op in self.0.iter() {
            match op {
                Op::Gate(g) => state.check_gate(g)?,
                Op::Measure(k) => state.check_qubit(*k)?,
            }
        }
        let mut outcomes: Vec<MeasureResult> = Vec::new();
        for op in self.0.iter() {
            match op {
                Op::Gate(g) => { state.apply_gate(*g)?; },
                Op::Measure(k) => { outcomes.push(state.measure(*k, rng)?); },
            }
        }
        Ok(outcomes)
    }
}

/// Main driver for running circuits of alternating unitary evolution and
/// measurement on a 1D chain of qubits.
#[derive(Clone, Debug)]
pub struct CircuitRunner<S: Storage = Packed> {
    pub state: Tableau<S>,
    pub outcomes: Vec<Vec<Option<MeasureResult>>>,
    pub p_meas: f32,
    /// Number of layers run by [`Self::run_configured`].
    pub depth: usize,
    pub rng: StdRng,
}

impl<S: Storage> CircuitRunner<S> {
    /// Create a new `CircuitRunner` for a chain of `n` qubits, with state
    /// initialized to ∣0...0⟩ and no recorded outcomes.
    ///
    /// `p_meas` is the probability with which qubits are measured in the
    /// Z-basis at each layer of a random circuit, and `depth` is the number of
    /// layers run by [`Self::run_configured`]; both are taken from `config`,
    /// along with the random number generator (stream 0).
    pub fn new(n: usize, config: &SimConfig) -> TableauResult<Self> {
        config.validate()?;
        Ok(Self {
            state: Tableau::new(n),
            outcomes: Vec::new(),
            p_meas: config.p_meas,
            depth: config.depth,
            rng: config.rng(0),
        })
    }

    /// Like [`Self::new`], but using an explicit generator and the default
    /// depth.
    pub fn with_rng(n: usize, p_meas: f32, rng: StdRng)
        -> TableauResult<Self>
    {
        if !(0.0..=1.0).contains(&p_meas) {
            return Err(TableauError::InvalidConfig(
                format!("measurement rate {} is not a probability", p_meas)
            ));
        }
        Ok(Self {
            state: Tableau::new(n),
            outcomes: Vec::new(),
            p_meas,
            depth: SimConfig::default().depth,
            rng,
        })
    }

    /// Run a fixed circuit on the current state, recording its outcomes as a
    /// single layer.
    pub fn run(&mut self, circuit: &Circuit) -> TableauResult<Vec<MeasureResult>> {
        let outcomes = circuit.run(&mut self.state, &mut self.rng)?;
        self.outcomes.push(outcomes.iter().copied().map(Some).collect());
        Ok(outcomes)
    }

    fn gates_simple(&mut self, cnot_offs: bool, buf: &mut Vec<Gate>) {
        let n = self.state.num_qubits();
        (0..n).for_each(|k| {
            buf.push(Gate::sample_single(k, &mut self.rng));
        });
        CNots::new(cnot_offs, n).for_each(|cx| { buf.push(cx); });
    }

    fn measure(&mut self, buf: &mut [Option<MeasureResult>])
        -> TableauResult<()>
    {
        for (k, ok) in buf.iter_mut().enumerate() {
            if self.rng.gen::<f32>() < self.p_meas {
                *ok = Some(self.state.measure(k, &mut self.rng)?);
            } else {
                *ok = None;
            }
        }
        Ok(())
    }

    /// Run `depth` layers of a simple random circuit.
    ///
    /// This procedure consists of the following at each layer in the circuit:
    /// 1. Apply a random single-qubit gate (*H*, *S*, *X*, *Y*, *Z*) to each
    /// qubit
    /// 1. Apply a CNOT to adjacent pairs of qubits, alternating between left
    /// and right neighbors on each layer
    /// 1. Perform a projective measurement on qubits with probability
    /// `self.p_meas`
    ///
    /// Returns the number of randomly determined outcomes in each layer.
    pub fn run_simple(&mut self, depth: usize) -> TableauResult<Vec<usize>> {
        let n = self.state.num_qubits();
        let mut gates: Vec<Gate> = Vec::new();
        let mut outcomes: Vec<Option<MeasureResult>> = vec![None; n];
        let mut random: Vec<usize> = Vec::with_capacity(depth);
        for d in 0..depth {
            self.gates_simple(d % 2 == 1, &mut gates);
            self.state.apply_circuit(&gates)?;
            gates.clear();

            self.measure(&mut outcomes)?;
            random.push(
                outcomes.iter().flatten().filter(|o| !o.determined).count()
            );
            self.outcomes.push(outcomes.clone());
        }
        debug!(n, depth, p_meas = self.p_meas, "finished random circuit");
        Ok(random)
    }

    /// Run [`Self::run_simple`] for `self.depth` layers.
    pub fn run_configured(&mut self) -> TableauResult<Vec<usize>> {
        self.run_simple(self.depth)
    }
}

struct CNots {
    iter: std::ops::Range<usize>
}

impl CNots {
    fn new(offs: bool, stop: usize) -> Self {
        Self { iter: if offs { 1 } else { 0 } .. stop }
    }
}

impl Iterator for CNots {
    type Item = Gate;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
            .zip(self.iter.next())
            .map(|(a, b)| Gate::CX(a, b))
    }
}
