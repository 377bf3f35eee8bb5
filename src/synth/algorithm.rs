use super::OPERATOR_COUNT;

// --- Algorithm ---

/// A fixed connection pattern between the four operators of a voice.
///
/// `targets[i]` is a bitmask of the operators that operator `i` phase-modulates.
/// Operators only ever modulate lower indices, so evaluating them from 3 down
/// to 0 resolves every connection within a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Algorithm {
    pub name: &'static str,
    pub targets: [u8; OPERATOR_COUNT],
    pub modulator_flags: [bool; OPERATOR_COUNT],
}

impl Algorithm {
    const fn new(name: &'static str, targets: [u8; OPERATOR_COUNT]) -> Self {
        Self {
            name,
            targets,
            modulator_flags: [
                targets[0] != 0,
                targets[1] != 0,
                targets[2] != 0,
                targets[3] != 0,
            ],
        }
    }

    pub fn is_modulator(&self, op_index: usize) -> bool {
        self.modulator_flags[op_index]
    }

    /// True if operator `source` feeds the phase input of operator `target`.
    pub fn modulates(&self, source: usize, target: usize) -> bool {
        self.targets[source] & (1 << target) != 0
    }

    pub fn carrier_count(&self) -> usize {
        self.modulator_flags.iter().filter(|m| !**m).count()
    }
}

const OP0: u8 = 1 << 0;
const OP1: u8 = 1 << 1;
const OP2: u8 = 1 << 2;

pub const ALGORITHM_COUNT: usize = 11;

/// The algorithm table, indexed by algorithm id.
pub static ALGORITHMS: [Algorithm; ALGORITHM_COUNT] = [
    Algorithm::new("3>2>1>0", [0, OP0, OP1, OP2]),
    Algorithm::new("3+2>1>0", [0, OP0, OP1, OP1]),
    Algorithm::new("3>2>0, 1>0", [0, OP0, OP0, OP2]),
    Algorithm::new("3>0, 2>1>0", [0, OP0, OP1, OP0]),
    Algorithm::new("3>(2,1,0)", [0, 0, 0, OP0 | OP1 | OP2]),
    Algorithm::new("3>2, 1>0", [0, OP0, 0, OP2]),
    Algorithm::new("3>2>1, 0", [0, 0, OP1, OP2]),
    Algorithm::new("3>2, 1, 0", [0, 0, 0, OP2]),
    Algorithm::new("(3,2,1)>0", [0, OP0, OP0, OP0]),
    Algorithm::new("(3,2)>0, 1", [0, 0, OP0, OP0]),
    Algorithm::new("3, 2, 1, 0", [0, 0, 0, 0]),
];
